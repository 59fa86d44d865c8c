//! Bounded breadth-first exposure accumulation.

use ivs_masking::POSITIVE_THRESHOLD;
use ivs_types::{Contribution, ParticipantId};
use std::collections::VecDeque;
use tracing::debug;

use crate::error::GraphError;
use crate::graph::ExposureGraph;

/// The noisy per-category scores plus the contribution ledger the
/// cancellation step consumes. Computed fresh per request, never persisted.
#[derive(Clone, Debug)]
pub struct RawScore {
    pub per_category: Vec<f64>,
    pub contributions: Vec<Contribution>,
}

/// Accumulate severity- and distance-weighted exposure around `target`.
///
/// Standard visited-set BFS from `target` at distance 0; every node is
/// discovered at most once, so its distance is the shortest-path distance
/// and it contributes exactly once. Expansion stops once a node's distance
/// exceeds `max_hops`. When a node at distance `d` discovers a new
/// neighbor, each category whose masked entry exceeds the positive-masking
/// threshold adds `masked * (1 / severity[i]^d)` to the raw score, and the
/// base weight `1 / severity[i]^d` is recorded for later cancellation.
/// Neighbors are enqueued regardless of their masked values so traversal
/// still expands through negative-reading nodes.
///
/// Scores start at `base_score` per category — the fixed floor for
/// inherent background risk.
pub fn compute_raw_score(
    graph: &ExposureGraph,
    target: &ParticipantId,
    max_hops: u32,
    severity_factors: &[f64],
    base_score: f64,
) -> Result<RawScore, GraphError> {
    let start = graph
        .index_of(target)
        .ok_or_else(|| GraphError::UnknownParticipant(target.to_string()))?;

    let categories = severity_factors.len();
    let mut per_category = vec![base_score; categories];
    let mut contributions = Vec::new();

    let mut discovered = vec![false; graph.node_count()];
    let mut queue = VecDeque::new();
    discovered[start] = true;
    queue.push_back((start, 0u32));

    while let Some((node, distance)) = queue.pop_front() {
        if distance > max_hops {
            continue;
        }
        for &neighbor in graph.neighbors(node) {
            if discovered[neighbor] {
                continue;
            }
            discovered[neighbor] = true;

            if let Some(masked) = graph.masked_of(neighbor) {
                for (category, &entry) in masked.entries().iter().enumerate().take(categories) {
                    if entry > POSITIVE_THRESHOLD {
                        let amount = 1.0 / severity_factors[category].powi(distance as i32);
                        per_category[category] += entry * amount;
                        contributions.push(Contribution {
                            neighbor: graph.node_id(neighbor).clone(),
                            category,
                            amount,
                        });
                    }
                }
            }

            queue.push_back((neighbor, distance + 1));
        }
    }

    debug!(
        target = %target,
        contributions = contributions.len(),
        "raw score computed"
    );
    Ok(RawScore {
        per_category,
        contributions,
    })
}
