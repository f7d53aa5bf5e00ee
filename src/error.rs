//! addrmatch Error Types
//!
//! Every failure the matching engine can report. The engine never logs or
//! swallows these; callers decide how to surface them.

use thiserror::Error;

/// Central error type for the matching engine
#[derive(Error, Debug)]
pub enum MatchError {
    /// A line source failed to open or read. The store is left untouched.
    #[error("failed to read address source: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid matching type: {0:?} (expected \"string\" or \"fuzzy\")")]
    InvalidMatchType(String),

    #[error("fuzzy matching requires a threshold but none was configured")]
    MissingThreshold,

    #[error("fuzzy threshold {0} is outside the range 0..=100")]
    InvalidThreshold(f64),

    #[error("fuzzy comparison of {pairs} pairs exceeds the configured limit of {limit}")]
    TooManyPairs { pairs: u64, limit: u64 },

    #[error("comparison cancelled")]
    Cancelled,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Result type alias for engine operations
pub type AddrResult<T> = Result<T, MatchError>;
