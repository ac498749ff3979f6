//! Computed outputs: score, confidence interval, contribution breakdown.
//!
//! All of these are ephemeral — created fresh per invocation, serialized
//! for the rendering layer, then discarded.

use serde::Serialize;

use crate::factor::FactorId;
use crate::types::collections::FxHashMap;

/// The weighted-average percentile score for one answer set.
#[derive(Debug, Clone, Serialize)]
pub struct ScoreResult {
    /// Final percentile, rounded to one decimal place, always in [0, 100].
    pub percentile: f64,
    /// Resolved (unrounded) percentile per included factor.
    pub per_factor: FxHashMap<FactorId, f64>,
    /// One entry per included factor, in answer-set iteration order.
    pub details: Vec<FactorDetail>,
    pub metadata: ScoreMetadata,
}

/// One resolved factor as it entered the aggregation.
#[derive(Debug, Clone, Serialize)]
pub struct FactorDetail {
    pub factor: FactorId,
    pub display_value: String,
    pub percentile: f64,
    pub weight: f64,
}

/// How much of the recognized weight mass actually contributed.
///
/// `factors_included` lets callers detect under-answered scores.
#[derive(Debug, Clone, Serialize)]
pub struct ScoreMetadata {
    pub total_weight_used: f64,
    pub factors_included: usize,
}

/// Empirical 90% interval from repeated noisy re-simulation.
#[derive(Debug, Clone, Serialize)]
pub struct ConfidenceInterval {
    pub median: f64,
    pub mean: f64,
    /// 5th percentile of the sorted simulated distribution.
    pub ci_lower: f64,
    /// 95th percentile of the sorted simulated distribution.
    pub ci_upper: f64,
    pub ci_range: f64,
    pub std_dev: f64,
    /// Full sorted sequence of simulated outcomes (length = iterations).
    pub distribution: Vec<f64>,
}

/// One factor's weighted contribution to the final score.
#[derive(Debug, Clone, Serialize)]
pub struct ContributionEntry {
    pub factor: FactorId,
    /// Human-readable factor name from the reference table.
    pub label: String,
    pub answer_value: String,
    pub percentile: f64,
    pub weight: f64,
    /// `percentile × weight`.
    pub weighted_contribution: f64,
    /// `weighted_contribution / final percentile × 100`.
    pub percent_of_total: f64,
}
