//! Normalized weighted aggregation of resolved factor percentiles.
//!
//! The final score is `Σ(p_i·w_i) / Σ(w_i)` over resolved factors only —
//! a normalized weighted mean, not a raw weighted sum. Missing weight mass
//! is excluded from the denominator so a two-answer set stays anchored in
//! [0, 100] instead of being dragged toward zero.

use lifescore_core::types::collections::FxHashMap;
use lifescore_core::{FactorDetail, ScoreMetadata, ScoreResult};

use crate::resolver::Resolved;

/// Combines resolved per-factor percentiles into one score.
pub struct WeightedAggregator {
    neutral_default: f64,
}

impl WeightedAggregator {
    pub fn new(neutral_default: f64) -> Self {
        Self { neutral_default }
    }

    /// Normalized weighted mean over the resolved factors. Zero resolved
    /// factors yield the neutral default rather than a division by zero.
    /// Full precision internally; the result is rounded to one decimal
    /// and guaranteed within [0, 100].
    pub fn combine(&self, resolved: &[Resolved]) -> f64 {
        let weight_sum: f64 = resolved.iter().map(|r| r.weight).sum();
        if weight_sum <= 0.0 {
            return self.neutral_default;
        }
        let weighted_sum: f64 = resolved.iter().map(|r| r.percentile * r.weight).sum();
        round1((weighted_sum / weight_sum).clamp(0.0, 100.0))
    }

    /// Combine and package the full `ScoreResult`.
    pub fn score(&self, resolved: Vec<Resolved>) -> ScoreResult {
        let percentile = self.combine(&resolved);

        let mut per_factor = FxHashMap::default();
        let mut details = Vec::with_capacity(resolved.len());
        let mut total_weight_used = 0.0;
        for r in resolved {
            per_factor.insert(r.factor, r.percentile);
            total_weight_used += r.weight;
            details.push(FactorDetail {
                factor: r.factor,
                display_value: r.display_value,
                percentile: r.percentile,
                weight: r.weight,
            });
        }

        let factors_included = details.len();
        ScoreResult {
            percentile,
            per_factor,
            details,
            metadata: ScoreMetadata {
                total_weight_used,
                factors_included,
            },
        }
    }
}

/// Round to one decimal place for display stability.
pub(crate) fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use lifescore_core::FactorId;

    fn resolved(factor: FactorId, percentile: f64, weight: f64) -> Resolved {
        Resolved {
            factor,
            display_value: String::new(),
            percentile,
            weight,
        }
    }

    #[test]
    fn test_empty_returns_neutral_default() {
        let agg = WeightedAggregator::new(50.0);
        assert_eq!(agg.combine(&[]), 50.0);
    }

    #[test]
    fn test_partial_answer_normalization() {
        // (84×0.10 + 90×0.20) / 0.30 = 88.0
        let agg = WeightedAggregator::new(50.0);
        let resolved = vec![
            resolved(FactorId::Location, 84.0, 0.10),
            resolved(FactorId::Education, 90.0, 0.20),
        ];
        assert_eq!(agg.combine(&resolved), 88.0);
    }

    #[test]
    fn test_single_factor_weight_cancels() {
        let agg = WeightedAggregator::new(50.0);
        let resolved = vec![resolved(FactorId::Location, 84.0, 0.10)];
        assert_eq!(agg.combine(&resolved), 84.0);
    }

    #[test]
    fn test_rounds_to_one_decimal() {
        let agg = WeightedAggregator::new(50.0);
        let resolved = vec![
            resolved(FactorId::Income, 33.33, 0.25),
            resolved(FactorId::Water, 66.67, 0.15),
        ];
        let score = agg.combine(&resolved);
        assert_eq!(score, round1(score));
    }

    #[test]
    fn test_score_metadata() {
        let agg = WeightedAggregator::new(50.0);
        let result = agg.score(vec![
            resolved(FactorId::Location, 84.0, 0.10),
            resolved(FactorId::Education, 90.0, 0.20),
        ]);
        assert_eq!(result.metadata.factors_included, 2);
        assert!((result.metadata.total_weight_used - 0.30).abs() < 1e-9);
        assert_eq!(result.details.len(), 2);
        assert_eq!(result.per_factor[&FactorId::Education], 90.0);
    }

    #[test]
    fn test_output_in_range() {
        let agg = WeightedAggregator::new(50.0);
        let lo = agg.combine(&[resolved(FactorId::Income, 0.0, 0.25)]);
        let hi = agg.combine(&[resolved(FactorId::Income, 100.0, 0.25)]);
        assert!((0.0..=100.0).contains(&lo));
        assert!((0.0..=100.0).contains(&hi));
    }
}
