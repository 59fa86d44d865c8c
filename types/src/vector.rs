//! Status, masked, and noise vector types.
//!
//! A `StatusVector` exists only on the sensing device, as input to masking.
//! The `MaskedVector` is the only status representation that ever reaches
//! validators or shared state. The `NoiseRecord` stays with the masking
//! participant, plus one sealed copy held by the Trust Authority.

use crate::participant::ParticipantId;
use serde::{Deserialize, Serialize};

/// Ordered per-category infection indicators from a single sensing step.
///
/// Ephemeral: never transmitted, never stored.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatusVector(pub Vec<bool>);

impl StatusVector {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Per-category masked scalars derived from a `StatusVector`.
///
/// Immutable once committed; a later submission from the same owner
/// supersedes it wholesale.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MaskedVector(pub Vec<f64>);

impl MaskedVector {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn entries(&self) -> &[f64] {
        &self.0
    }
}

/// The noise factors used to mask one participant's status vector.
///
/// Category index is implicit in position. Known only to the masking
/// participant and, via a sealed copy, the Trust Authority — never placed
/// in validator-visible state. Superseded on re-masking.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NoiseRecord {
    pub owner: ParticipantId,
    pub factors: Vec<f64>,
}

/// One neighbor's weighted exposure contribution for one category,
/// recorded transiently during a scoring run.
///
/// `amount` is the severity/distance base weight; the raw score
/// accumulates `masked_value x amount`, so subtracting the noise portion
/// of the masked value times `amount` cancels exactly.
#[derive(Clone, Debug, PartialEq)]
pub struct Contribution {
    pub neighbor: ParticipantId,
    pub category: usize,
    pub amount: f64,
}
