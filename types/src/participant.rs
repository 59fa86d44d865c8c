//! Participant identity and registration record.

use crate::keys::VerificationKey;
use crate::state::ParticipantStatus;
use crate::time::Timestamp;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identity token for a participant.
///
/// Assigned out-of-band by the Trust Authority at registration; the
/// protocol never derives meaning from its contents.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ParticipantId(String);

impl ParticipantId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Raw bytes, used when building canonical signing payloads.
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ParticipantId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for ParticipantId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// A registered participant as tracked by the identity registry.
///
/// Created only by the Trust Authority's registration action and mutated
/// only by the TA (status flips on staleness). Never deleted.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Participant {
    pub id: ParticipantId,
    /// Key submissions from this participant are verified against.
    pub verification_key: VerificationKey,
    pub registered_at: Timestamp,
    /// Refreshed whenever one of this participant's submissions commits.
    pub last_seen: Timestamp,
    pub status: ParticipantStatus,
}

impl Participant {
    pub fn is_active(&self) -> bool {
        self.status == ParticipantStatus::Active
    }
}
