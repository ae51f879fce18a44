//! Error types for the trial runtime
//!
//! Usage-contract violations are a distinct kind: they mean the trial script
//! is broken, so callers must not retry on them.

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Trial runtime error types
#[derive(Error, Debug)]
pub enum Error {
    /// A metric was reported before parameters were fetched in an orchestrated run
    #[error("Usage violation: {0}\nThis is a bug in the trial script and must not be retried.")]
    UsageViolation(String),

    /// Tag lookup on the current parameters failed
    #[error("Parameter not found: {0}")]
    ParameterNotFound(String),

    /// `NNI_TRIAL_SEQ_ID` is set but is not an integer
    #[error("Invalid trial sequence id {value:?}: {source}")]
    InvalidSequenceId {
        /// Raw environment value
        value: String,
        /// Parse failure
        source: std::num::ParseIntError,
    },

    /// Metric does not satisfy the shape contract
    #[error("Invalid metric: {0}")]
    InvalidMetric(String),

    /// Transport failure raised by a command channel
    #[error("Command channel error: {0}")]
    Channel(String),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether this error signals a programmer-usage violation.
    ///
    /// Such errors are deterministic; retrying the same call fails again.
    #[must_use]
    pub const fn is_usage_violation(&self) -> bool {
        matches!(self, Self::UsageViolation(_))
    }
}
