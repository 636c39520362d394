//! Error types for classification

use thiserror::Error;

/// Errors surfaced by the classification layer
///
/// Exclusions are never errors; they come back as successful
/// [`ClassificationResult`](crate::types::ClassificationResult)s.
#[derive(Debug, Error)]
pub enum ClassifyError {
    /// A match rule pattern failed to compile
    #[error("invalid match pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// Non-transient transport failure talking to the oracle
    #[error("oracle transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Transient failures persisted past the retry budget
    #[error("oracle unavailable after {attempts} attempts: {last}")]
    RetriesExhausted { attempts: u32, last: String },

    /// The oracle answered with something we could not decode
    #[error("malformed oracle response: {0}")]
    Protocol(String),

    /// The oracle answered `success: false`
    #[error("oracle rejected request: {0}")]
    Rejected(String),

    /// The caller's deadline elapsed before the oracle answered
    #[error("classification cancelled")]
    Cancelled,

    /// Invalid configuration value
    #[error("configuration error: {0}")]
    Config(String),
}

impl ClassifyError {
    /// Whether this error came from the oracle exhausting its retries
    pub fn is_retries_exhausted(&self) -> bool {
        matches!(self, ClassifyError::RetriesExhausted { .. })
    }
}

/// Result type for classification operations
pub type ClassifyResult<T> = std::result::Result<T, ClassifyError>;
