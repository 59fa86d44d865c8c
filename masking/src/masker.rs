//! Masking policy and the masking operation itself.
//!
//! The positive range [0.95, 1.05) and negative range [0, 0.005) never
//! overlap, so a fixed 0.5 threshold on the masked value recovers the
//! original boolean. That leakage is a deliberate, documented
//! privacy/utility trade-off of this protocol, not a defect: it is what
//! lets the propagator score without the noise records, while exact
//! magnitudes still require cancellation by the Trust Authority.

use ivs_types::{MaskedVector, NoiseRecord, ParticipantId, StatusVector};
use rand::Rng;

/// Lower bound (inclusive) of the noise factor for a positive indicator.
pub const POSITIVE_FACTOR_MIN: f64 = 0.95;
/// Upper bound (exclusive) of the noise factor for a positive indicator.
pub const POSITIVE_FACTOR_MAX: f64 = 1.05;
/// Upper bound (exclusive) of the noise factor for a negative indicator.
pub const NEGATIVE_FACTOR_MAX: f64 = 0.005;
/// Fixed threshold separating the two masked ranges.
pub const POSITIVE_THRESHOLD: f64 = 0.5;

/// Mask a status vector, returning the masked form and the noise record
/// needed to reverse it.
///
/// Deterministic given the supplied random source. Executed by the owning
/// participant only — never by a third party.
///
/// Per category value `v`:
/// - `v = 1`: factor drawn from [0.95, 1.05), masked = `v * factor`
/// - `v = 0`: factor drawn from [0, 0.005), masked = `v + factor`
pub fn mask(
    owner: &ParticipantId,
    status: &StatusVector,
    rng: &mut impl Rng,
) -> (MaskedVector, NoiseRecord) {
    let mut masked = Vec::with_capacity(status.len());
    let mut factors = Vec::with_capacity(status.len());

    for &positive in &status.0 {
        if positive {
            let factor = rng.random_range(POSITIVE_FACTOR_MIN..POSITIVE_FACTOR_MAX);
            masked.push(factor);
            factors.push(factor);
        } else {
            let factor = rng.random_range(0.0..NEGATIVE_FACTOR_MAX);
            masked.push(factor);
            factors.push(factor);
        }
    }

    (
        MaskedVector(masked),
        NoiseRecord {
            owner: owner.clone(),
            factors,
        },
    )
}

/// Recover the boolean category value from a masked entry via the fixed
/// threshold rule.
pub fn unmask_range(masked_entry: f64) -> bool {
    masked_entry > POSITIVE_THRESHOLD
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn owner() -> ParticipantId {
        ParticipantId::from("p1")
    }

    #[test]
    fn masked_values_stay_in_policy_ranges() {
        let mut rng = StdRng::seed_from_u64(7);
        let status = StatusVector(vec![true, false, true, false, false]);

        let (masked, record) = mask(&owner(), &status, &mut rng);

        assert_eq!(masked.len(), status.len());
        assert_eq!(record.factors.len(), status.len());
        for (i, &positive) in status.0.iter().enumerate() {
            let m = masked.0[i];
            if positive {
                assert!((POSITIVE_FACTOR_MIN..POSITIVE_FACTOR_MAX).contains(&m));
            } else {
                assert!((0.0..NEGATIVE_FACTOR_MAX).contains(&m));
            }
        }
    }

    #[test]
    fn threshold_recovers_original_booleans() {
        let mut rng = StdRng::seed_from_u64(42);
        let status = StatusVector(vec![true, true, false, true, false]);

        let (masked, _) = mask(&owner(), &status, &mut rng);

        for (i, &positive) in status.0.iter().enumerate() {
            assert_eq!(unmask_range(masked.0[i]), positive);
        }
    }

    #[test]
    fn positive_masked_equals_factor() {
        // v = 1: masked = v * factor = factor, so the record entry matches
        // the committed value exactly.
        let mut rng = StdRng::seed_from_u64(3);
        let status = StatusVector(vec![true; 5]);

        let (masked, record) = mask(&owner(), &status, &mut rng);
        assert_eq!(masked.0, record.factors);
    }

    #[test]
    fn same_seed_same_mask() {
        let status = StatusVector(vec![true, false, true]);
        let mut rng1 = StdRng::seed_from_u64(11);
        let mut rng2 = StdRng::seed_from_u64(11);

        let (m1, r1) = mask(&owner(), &status, &mut rng1);
        let (m2, r2) = mask(&owner(), &status, &mut rng2);
        assert_eq!(m1, m2);
        assert_eq!(r1, r2);
    }

    #[test]
    fn empty_status_vector() {
        let mut rng = StdRng::seed_from_u64(0);
        let (masked, record) = mask(&owner(), &StatusVector(vec![]), &mut rng);
        assert!(masked.is_empty());
        assert!(record.factors.is_empty());
    }
}
