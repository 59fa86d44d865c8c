//! Timestamps for contact edges, status updates, and staleness checks.
//!
//! Unix epoch seconds (UTC). Validators pass an explicit `now` into every
//! staleness check so tests and replays stay deterministic; only the node
//! shell reaches for the wall clock.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

/// Seconds since the Unix epoch (UTC).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(u64);

impl Timestamp {
    /// The epoch (time zero).
    pub const EPOCH: Self = Self(0);

    pub fn new(secs: u64) -> Self {
        Self(secs)
    }

    /// The wall clock, as a `Timestamp`.
    pub fn now() -> Self {
        let secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system clock before Unix epoch")
            .as_secs();
        Self(secs)
    }

    pub fn as_secs(&self) -> u64 {
        self.0
    }

    /// Whether `window_secs` have fully elapsed between this timestamp and
    /// `now`. Saturates instead of wrapping when the window overflows.
    pub fn has_expired(&self, window_secs: u64, now: Timestamp) -> bool {
        now.0 >= self.0.saturating_add(window_secs)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", self.0)
    }
}
