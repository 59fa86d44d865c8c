//! Risk-tier classification of corrected scores.

use ivs_types::{PolicyParams, RiskTier};

use crate::cancel::CorrectedScore;

/// Per-category tiers, the weighted scalar, and the overall tier.
#[derive(Clone, Debug)]
pub struct Classification {
    pub per_category: Vec<RiskTier>,
    pub weighted_score: f64,
    pub overall: RiskTier,
}

/// Map one score to its tier using the fixed policy thresholds.
pub fn tier_for(score: f64, params: &PolicyParams) -> RiskTier {
    if score < params.safe_max {
        RiskTier::Safe
    } else if score < params.caution_max {
        RiskTier::Caution
    } else {
        RiskTier::HighRisk
    }
}

/// Classify a corrected score vector.
///
/// The weighted score applies the named per-category weights (summing
/// to 1); each category and the weighted score are then compared against
/// the same two thresholds.
pub fn classify(corrected: &CorrectedScore, params: &PolicyParams) -> Classification {
    let per_category = corrected
        .per_category()
        .iter()
        .map(|&score| tier_for(score, params))
        .collect();

    let weighted_score = corrected
        .per_category()
        .iter()
        .zip(&params.category_weights)
        .map(|(score, weight)| score * weight)
        .sum();

    Classification {
        per_category,
        weighted_score,
        overall: tier_for(weighted_score, params),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> PolicyParams {
        PolicyParams::ivs_defaults()
    }

    #[test]
    fn tier_boundaries() {
        let p = params();
        assert_eq!(tier_for(0.0, &p), RiskTier::Safe);
        assert_eq!(tier_for(799.999, &p), RiskTier::Safe);
        assert_eq!(tier_for(800.0, &p), RiskTier::Caution);
        assert_eq!(tier_for(1199.999, &p), RiskTier::Caution);
        assert_eq!(tier_for(1200.0, &p), RiskTier::HighRisk);
        assert_eq!(tier_for(5000.0, &p), RiskTier::HighRisk);
    }

    #[test]
    fn weighted_score_applies_named_weights() {
        let p = params();
        let corrected = CorrectedScore(vec![100.0, 200.0, 300.0, 400.0, 500.0]);
        let classification = classify(&corrected, &p);

        let expected: f64 = corrected
            .per_category()
            .iter()
            .zip(&p.category_weights)
            .map(|(s, w)| s * w)
            .sum();
        assert!((classification.weighted_score - expected).abs() < 1e-9);
        assert_eq!(classification.per_category.len(), 5);
        assert_eq!(classification.overall, RiskTier::Safe);
    }

    #[test]
    fn hot_category_tiers_independently_of_overall() {
        let p = params();
        // One category far past caution while the weighted blend stays safe.
        let corrected = CorrectedScore(vec![0.0, 0.0, 0.0, 0.0, 1500.0]);
        let classification = classify(&corrected, &p);

        assert_eq!(classification.per_category[4], RiskTier::HighRisk);
        assert_eq!(classification.overall, RiskTier::Safe);
    }
}
