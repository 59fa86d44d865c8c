//! Exact noise cancellation over a raw propagation result.

use ivs_graph::RawScore;
use ivs_masking::POSITIVE_THRESHOLD;
use tracing::warn;

use crate::vault::NoiseVault;

/// Per-category scores with the masking noise removed, clamped at zero.
#[derive(Clone, Debug, PartialEq)]
pub struct CorrectedScore(pub Vec<f64>);

impl CorrectedScore {
    pub fn per_category(&self) -> &[f64] {
        &self.0
    }
}

/// Remove the injected masking noise from a raw score.
///
/// For every recorded contribution, the raw accumulator holds
/// `factor x amount` (positive mask) — the true contribution is
/// `1 x amount`, so `(factor - 1) x amount` is subtracted. A factor below
/// the threshold identifies a negative mask whose entire `factor x amount`
/// is noise. The two factor ranges are disjoint, which is what lets the
/// vault stand in for knowledge of the true bit.
///
/// A contribution with no vault record degrades gracefully: it is treated
/// as zero-noise, logged, and the score keeps the uncancelled raw
/// contribution. Each corrected category is clamped to be non-negative.
pub fn cancel_noise(raw: &RawScore, vault: &NoiseVault) -> CorrectedScore {
    let mut corrected = raw.per_category.clone();

    for contribution in &raw.contributions {
        match vault.factor(&contribution.neighbor, contribution.category) {
            Some(factor) => {
                let noise = if factor > POSITIVE_THRESHOLD {
                    (factor - 1.0) * contribution.amount
                } else {
                    factor * contribution.amount
                };
                corrected[contribution.category] -= noise;
            }
            None => {
                warn!(
                    neighbor = %contribution.neighbor,
                    category = contribution.category,
                    "noise record missing, keeping raw contribution"
                );
            }
        }
    }

    for score in &mut corrected {
        *score = score.max(0.0);
    }
    CorrectedScore(corrected)
}
