//! Policy parameters — every tunable value of the protocol, named.
//!
//! Thresholds and weights are policy constants, not derived values. Every
//! node and the Trust Authority carry the same `PolicyParams`; a deployment
//! changes behavior by shipping different parameters, not different code.

use serde::{Deserialize, Serialize};

/// All policy parameters consulted by the registry, validators, propagator,
/// and classifier.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PolicyParams {
    // ── Identity ─────────────────────────────────────────────────────────
    /// Seconds without a committed submission before a participant is
    /// lazily flipped to `Inactive`. Default: 24 hours.
    pub staleness_window_secs: u64,

    // ── Consensus ────────────────────────────────────────────────────────
    /// Fraction of total known validators whose approval commits a
    /// submission. Default: 0.51 (simple majority).
    pub consensus_threshold: f64,

    // ── Propagation ──────────────────────────────────────────────────────
    /// Number of infection categories in every status vector.
    pub num_categories: usize,

    /// Maximum BFS depth when accumulating exposure.
    pub max_hops: u32,

    /// Initial per-category score floor representing inherent background
    /// risk, applied before traversal.
    pub base_score: f64,

    /// Per-category severity factors; a neighbor at distance `d`
    /// contributes `1 / severity[i]^d` for category `i`.
    pub severity_factors: Vec<f64>,

    // ── Classification ───────────────────────────────────────────────────
    /// Per-category weights applied to produce the overall weighted score.
    /// Must sum to 1.
    pub category_weights: Vec<f64>,

    /// Scores strictly below this are `Safe`.
    pub safe_max: f64,

    /// Scores strictly below this (and ≥ `safe_max`) are `Caution`;
    /// everything else is `HighRisk`.
    pub caution_max: f64,
}

impl PolicyParams {
    /// IVS defaults — the intended configuration for a live deployment.
    pub fn ivs_defaults() -> Self {
        Self {
            staleness_window_secs: 24 * 3600, // 24 hours

            consensus_threshold: 0.51,

            num_categories: 5,
            max_hops: 5,
            base_score: 5.0,
            severity_factors: vec![1.2, 1.0, 0.8, 1.5, 0.6],

            category_weights: vec![0.30, 0.25, 0.20, 0.15, 0.10],
            safe_max: 800.0,
            caution_max: 1200.0,
        }
    }

    /// Whether the vector-shaped parameters agree with `num_categories`.
    pub fn is_consistent(&self) -> bool {
        self.severity_factors.len() == self.num_categories
            && self.category_weights.len() == self.num_categories
    }
}

/// Default is the IVS deployment configuration.
impl Default for PolicyParams {
    fn default() -> Self {
        Self::ivs_defaults()
    }
}
