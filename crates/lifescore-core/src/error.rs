//! Error taxonomy for the scoring engine.
//!
//! Only `NotInitialized` is ever surfaced from a scoring call. Malformed
//! answers and unknown categorical tokens degrade gracefully inside the
//! resolver; an empty answer set resolves to the neutral default.

use thiserror::Error;

/// Errors surfaced by the scoring engine.
#[derive(Debug, Error)]
pub enum ScoreError {
    /// A scoring operation was invoked before the reference table was loaded.
    #[error("scoring engine not initialized; call initialize() first")]
    NotInitialized,

    /// The injected reference table violates a load-time invariant.
    #[error("invalid reference table: {0}")]
    InvalidTable(String),
}
