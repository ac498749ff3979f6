//! # lifescore-core
//!
//! Domain types for the global life-statistics percentile engine:
//! factor reference data, answer ingestion, computed results, and errors.
//! All algorithms live in `lifescore-engine`.

pub mod answer;
pub mod error;
pub mod factor;
pub mod result;
pub mod types;

pub use answer::{Answer, AnswerSet};
pub use error::ScoreError;
pub use factor::{FactorDefinition, FactorId, FactorTable};
pub use result::{
    ConfidenceInterval, ContributionEntry, FactorDetail, ScoreMetadata, ScoreResult,
};
