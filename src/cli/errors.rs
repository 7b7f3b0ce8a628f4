//! CLI-specific error types
//!
//! Every CLI error is reported as one JSON error response on stdout and a
//! non-zero exit status.

use std::io;

use thiserror::Error;

use crate::model::ModelError;
use crate::orders::QueryError;
use crate::planner::PlannerError;
use crate::schema::SchemaError;

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration file missing, malformed or invalid
    #[error("Configuration error: {0}")]
    Config(String),

    /// Data file missing, malformed or rejected by the store
    #[error("Data load failed: {0}")]
    Data(String),

    /// Request on stdin or in arguments is malformed
    #[error("Invalid request: {0}")]
    Request(String),

    /// stdin/stdout failure
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error(transparent)]
    Query(#[from] QueryError),
}

impl CliError {
    /// Get the error code string
    pub fn code(&self) -> &'static str {
        match self {
            CliError::Config(_) => "ORDERS_CLI_CONFIG_ERROR",
            CliError::Data(_) => "ORDERS_CLI_DATA_ERROR",
            CliError::Request(_) => "ORDERS_CLI_INVALID_REQUEST",
            CliError::Io(_) => "ORDERS_CLI_IO_ERROR",
            CliError::Query(err) => err.code(),
        }
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Request(format!("JSON error: {}", e))
    }
}

impl From<PlannerError> for CliError {
    fn from(e: PlannerError) -> Self {
        CliError::Query(e.into())
    }
}

impl From<ModelError> for CliError {
    fn from(e: ModelError) -> Self {
        CliError::Request(e.to_string())
    }
}

impl From<SchemaError> for CliError {
    fn from(e: SchemaError) -> Self {
        CliError::Config(format!("{} ({})", e, e.code()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_codes_pass_through() {
        let err: CliError = PlannerError::InvalidCondition("x".into()).into();
        assert_eq!(err.code(), "ORDERS_INVALID_CONDITION");
    }

    #[test]
    fn test_json_error_is_request_error() {
        let err: CliError = serde_json::from_str::<serde_json::Value>("{").unwrap_err().into();
        assert_eq!(err.code(), "ORDERS_CLI_INVALID_REQUEST");
    }
}
