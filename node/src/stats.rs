//! Activity counters for one validator node.
//!
//! Counters are monotonic and relaxed; readers only ever want a
//! point-in-time snapshot, never synchronisation.

use std::sync::atomic::{AtomicU64, Ordering};

/// A single monotonic counter.
#[derive(Debug, Default)]
pub struct Counter(AtomicU64);

impl Counter {
    pub fn bump(&self) {
        self.0.fetch_add(1, Ordering::Relaxed);
    }

    pub fn get(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }
}

/// Counters covering a node's whole submission pipeline.
#[derive(Debug, Default)]
pub struct NodeStats {
    /// Submissions that entered the inbox, before ordering or verification.
    pub submissions_received: Counter,
    /// Contact edges committed after a successful quorum poll.
    pub edges_committed: Counter,
    /// Masked status updates committed after a successful quorum poll.
    pub statuses_committed: Counter,
    /// Peer-gossiped commits that passed local re-validation.
    pub gossip_commits: Counter,
    /// Quorum polls that resolved below the required vote count.
    pub quorum_failures: Counter,
    /// Submissions rejected by local verification before any poll started.
    pub local_rejections: Counter,
}
