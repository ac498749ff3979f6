//! Calculator facade and the process-wide runtime.
//!
//! The runtime is a singleton via `OnceLock`, lock-free after the first
//! `initialize` call. The calculator itself is stateless aside from the
//! read-only reference table: every call takes the full answer set, so
//! the quiz layer can hold whatever state shape it wants.

use std::sync::{Arc, OnceLock};

use tracing::info;

use lifescore_core::{
    AnswerSet, ConfidenceInterval, ContributionEntry, FactorTable, ScoreError, ScoreResult,
};

use crate::aggregator::WeightedAggregator;
use crate::contribution::ContributionAnalyzer;
use crate::resolver::PercentileResolver;
use crate::simulation::{SimulationConfig, UncertaintySimulator};

/// Tunables for the scoring pipeline.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Score returned when zero factors resolve.
    pub neutral_default: f64,
    /// Half-width of the uniform perturbation applied during simulation.
    pub noise_amplitude: f64,
    /// Lower clamp for noisy percentiles; strictly above 0.
    pub noise_floor: f64,
    /// Upper clamp for noisy percentiles; strictly below 100.
    pub noise_ceiling: f64,
    /// Trials per confidence-interval run when the caller does not say.
    pub default_iterations: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            neutral_default: 50.0,
            noise_amplitude: 5.0,
            noise_floor: 1.0,
            noise_ceiling: 99.0,
            default_iterations: 1000,
        }
    }
}

/// Stateless scoring facade over a read-only reference table.
pub struct Calculator {
    table: FactorTable,
    config: EngineConfig,
}

impl Calculator {
    pub fn new(table: FactorTable) -> Self {
        Self::with_config(table, EngineConfig::default())
    }

    pub fn with_config(table: FactorTable, config: EngineConfig) -> Self {
        Self { table, config }
    }

    pub fn table(&self) -> &FactorTable {
        &self.table
    }

    /// Deterministic point score for a (possibly partial) answer set.
    pub fn score(&self, answers: &AnswerSet) -> ScoreResult {
        let resolver = PercentileResolver::new(&self.table, &self.config);
        let aggregator = WeightedAggregator::new(self.config.neutral_default);
        aggregator.score(resolver.resolve_all(answers))
    }

    /// Ranked per-factor contribution breakdown, derived from `score`.
    pub fn contributions(&self, answers: &AnswerSet) -> Vec<ContributionEntry> {
        ContributionAnalyzer::analyze(&self.table, &self.score(answers))
    }

    /// Monte Carlo confidence interval. Pin `config.seed` to reproduce a
    /// run; unseeded runs are statistically stable, not bit-identical.
    pub fn score_with_confidence_interval(
        &self,
        answers: &AnswerSet,
        config: SimulationConfig,
    ) -> ConfidenceInterval {
        UncertaintySimulator::new(&self.table, &self.config, config).run(answers)
    }

    /// Confidence interval with the configured default iteration count.
    pub fn score_with_default_interval(&self, answers: &AnswerSet) -> ConfidenceInterval {
        self.score_with_confidence_interval(
            answers,
            SimulationConfig::with_iterations(self.config.default_iterations),
        )
    }
}

/// Global calculator — lock-free after the first `initialize` call.
static CALCULATOR: OnceLock<Arc<Calculator>> = OnceLock::new();

/// Load the reference table into the process-wide calculator.
///
/// The first call wins; subsequent calls are no-ops (the table is
/// immutable for the life of the process). Table invariants are enforced
/// earlier, at `FactorTable` construction.
pub fn initialize(table: FactorTable) {
    let factors = table.len();
    if CALCULATOR.set(Arc::new(Calculator::new(table))).is_ok() {
        info!(factors, "scoring engine initialized");
    }
}

/// Whether `initialize` has completed.
pub fn initialized() -> bool {
    CALCULATOR.get().is_some()
}

fn get() -> Result<Arc<Calculator>, ScoreError> {
    CALCULATOR.get().cloned().ok_or(ScoreError::NotInitialized)
}

/// Score an answer set against the process-wide calculator.
pub fn score(answers: &AnswerSet) -> Result<ScoreResult, ScoreError> {
    Ok(get()?.score(answers))
}

/// Contribution breakdown against the process-wide calculator.
pub fn contributions(answers: &AnswerSet) -> Result<Vec<ContributionEntry>, ScoreError> {
    Ok(get()?.contributions(answers))
}

/// Confidence interval against the process-wide calculator.
pub fn score_with_confidence_interval(
    answers: &AnswerSet,
    iterations: usize,
) -> Result<ConfidenceInterval, ScoreError> {
    let calc = get()?;
    Ok(calc.score_with_confidence_interval(answers, SimulationConfig::with_iterations(iterations)))
}
