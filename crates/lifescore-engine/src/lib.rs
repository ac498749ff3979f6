//! # lifescore-engine
//!
//! Scoring engine for the global life-statistics survey: per-factor
//! percentile resolution, normalized weighted aggregation, contribution
//! analysis, and Monte Carlo uncertainty simulation.
//!
//! The pipeline is pure: aside from the one-time reference-table load,
//! every call is a deterministic function of its inputs (simulation adds
//! explicit, seedable randomness).

pub mod aggregator;
pub mod contribution;
pub mod engine;
pub mod resolver;
pub mod simulation;

pub use aggregator::WeightedAggregator;
pub use contribution::ContributionAnalyzer;
pub use engine::{
    contributions, initialize, initialized, score, score_with_confidence_interval, Calculator,
    EngineConfig,
};
pub use resolver::{PercentileResolver, Resolved};
pub use simulation::{SimulationConfig, UncertaintySimulator};
