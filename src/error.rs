//! Error types for the modelsweep crate

use thiserror::Error;

/// Result type alias for sweep operations
pub type Result<T> = std::result::Result<T, SweepError>;

/// Main error type for the model sweep pipeline
#[derive(Error, Debug)]
pub enum SweepError {
    #[error("schema mismatch: column '{0}' not found in dataset")]
    SchemaMismatch(String),

    #[error("invalid argument: {name} = {value}, {reason}")]
    InvalidArgument {
        name: String,
        value: String,
        reason: String,
    },

    #[error("storage failure: {0}")]
    StorageFailure(String),

    #[error("data error: {0}")]
    DataError(String),

    #[error("computation error: {0}")]
    ComputationError(String),

    #[error("model not fitted")]
    NotFitted,

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl SweepError {
    /// Convenience constructor for [`SweepError::InvalidArgument`]
    pub fn invalid_argument(
        name: impl Into<String>,
        value: impl ToString,
        reason: impl Into<String>,
    ) -> Self {
        SweepError::InvalidArgument {
            name: name.into(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<polars::error::PolarsError> for SweepError {
    fn from(err: polars::error::PolarsError) -> Self {
        SweepError::DataError(err.to_string())
    }
}

impl From<serde_json::Error> for SweepError {
    fn from(err: serde_json::Error) -> Self {
        SweepError::StorageFailure(err.to_string())
    }
}
