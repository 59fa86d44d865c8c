use proptest::prelude::*;

use ivs_graph::RawScore;
use ivs_scoring::{cancel_noise, classify, tier_for, CorrectedScore, NoiseVault};
use ivs_types::{Contribution, NoiseRecord, ParticipantId, PolicyParams};

proptest! {
    /// Increasing a score never lowers its tier.
    #[test]
    fn tier_is_monotonic(a in 0.0f64..3000.0, b in 0.0f64..3000.0) {
        let params = PolicyParams::ivs_defaults();
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(tier_for(lo, &params) <= tier_for(hi, &params));
    }

    /// Raising any single category score never lowers that category's tier
    /// or the overall tier.
    #[test]
    fn classification_is_monotonic_per_category(
        scores in prop::collection::vec(0.0f64..2000.0, 5),
        category in 0usize..5,
        bump in 0.0f64..2000.0,
    ) {
        let params = PolicyParams::ivs_defaults();
        let base = classify(&CorrectedScore(scores.clone()), &params);

        let mut bumped = scores;
        bumped[category] += bump;
        let raised = classify(&CorrectedScore(bumped), &params);

        prop_assert!(base.per_category[category] <= raised.per_category[category]);
        prop_assert!(base.overall <= raised.overall);
    }

    /// Cancellation is exact on synthetic data: raw = base + factor x amount
    /// corrects to base + amount for positive masks, to within 1e-9.
    #[test]
    fn cancellation_is_exact(
        base in 0.0f64..100.0,
        factor in 0.95f64..1.05,
        amount in 0.01f64..10.0,
    ) {
        let neighbor = ParticipantId::from("n");
        let raw = RawScore {
            per_category: vec![base + factor * amount],
            contributions: vec![Contribution {
                neighbor: neighbor.clone(),
                category: 0,
                amount,
            }],
        };
        let mut vault = NoiseVault::new();
        vault.insert(NoiseRecord { owner: neighbor, factors: vec![factor] });

        let corrected = cancel_noise(&raw, &vault);
        prop_assert!((corrected.0[0] - (base + amount)).abs() < 1e-9);
    }
}
