//! Decomposition of a score into ranked per-factor contributions.

use std::cmp::Ordering;

use lifescore_core::{ContributionEntry, FactorTable, ScoreResult};

/// Derives each factor's weighted contribution to a computed score.
pub struct ContributionAnalyzer;

impl ContributionAnalyzer {
    /// Decompose a `ScoreResult` into contribution entries, sorted
    /// descending by weighted contribution.
    ///
    /// The entries are a true decomposition of the score:
    /// `Σ(weighted_contribution) / Σ(weight)` reproduces the final
    /// percentile within rounding tolerance (0.1).
    pub fn analyze(table: &FactorTable, result: &ScoreResult) -> Vec<ContributionEntry> {
        let mut entries: Vec<ContributionEntry> = result
            .details
            .iter()
            .filter_map(|detail| {
                let def = table.get(detail.factor)?;
                let weighted_contribution = detail.percentile * detail.weight;
                let percent_of_total = if result.percentile > 0.0 {
                    weighted_contribution / result.percentile * 100.0
                } else {
                    0.0
                };
                Some(ContributionEntry {
                    factor: detail.factor,
                    label: def.label.clone(),
                    answer_value: detail.display_value.clone(),
                    percentile: detail.percentile,
                    weight: detail.weight,
                    weighted_contribution,
                    percent_of_total,
                })
            })
            .collect();

        entries.sort_by(|a, b| {
            b.weighted_contribution
                .partial_cmp(&a.weighted_contribution)
                .unwrap_or(Ordering::Equal)
        });
        entries
    }
}
