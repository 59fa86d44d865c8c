//! State enums for participants and risk classification.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The registration state of a participant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParticipantStatus {
    /// Registered and current — submissions are accepted.
    Active,
    /// Went stale (no committed submission within the staleness window).
    /// Submissions are rejected until the TA re-activates.
    Inactive,
}

impl ParticipantStatus {
    /// Whether submissions from this participant may be verified.
    pub fn can_submit(&self) -> bool {
        matches!(self, Self::Active)
    }
}

/// Three-tier risk classification of a vulnerability score.
///
/// Ordering is meaningful: `Safe < Caution < HighRisk`, so monotonicity of
/// the classifier can be checked with plain comparisons.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RiskTier {
    /// Below the safe threshold — no restrictions indicated.
    Safe,
    /// Between the safe and caution thresholds — avoid large gatherings.
    Caution,
    /// Above the caution threshold — exposure is likely.
    HighRisk,
}

impl fmt::Display for RiskTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Safe => "safe",
            Self::Caution => "caution",
            Self::HighRisk => "high-risk",
        };
        write!(f, "{s}")
    }
}
