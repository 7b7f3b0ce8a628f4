//! # Model Errors

use thiserror::Error;

/// Result type for model operations
pub type ModelResult<T> = Result<T, ModelError>;

/// Errors raised while parsing or validating order data
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("Unknown attribute: {0}")]
    UnknownAttribute(String),

    #[error("Attribute '{attribute}' expects a {expected} value")]
    TypeMismatch {
        attribute: String,
        expected: &'static str,
    },

    #[error("Invalid timestamp '{0}': expected RFC 3339")]
    InvalidTimestamp(String),

    #[error("Invalid sort key '{0}'")]
    InvalidSortKey(String),

    #[error("Time window start {start} is after end {end}")]
    InvalidTimeWindow { start: String, end: String },
}
