//! Executor error types
//!
//! Error codes:
//! - ORDERS_INVALID_QUERY (not retryable)
//! - ORDERS_STORE_UNAVAILABLE (retryable)
//! - ORDERS_CANCELLED

use thiserror::Error;

use crate::store::StoreError;

/// Result type for executor operations
pub type ExecutorResult<T> = Result<T, ExecutorError>;

/// Errors raised while running a plan.
///
/// No variant carries a partial result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExecutorError {
    /// The store rejected the request, or the plan cannot be executed
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    /// Cancellation was observed before a page request
    #[error("Execution cancelled after {pages_fetched} page(s)")]
    Cancelled { pages_fetched: usize },
}

impl ExecutorError {
    /// Stable error code
    pub fn code(&self) -> &'static str {
        match self {
            ExecutorError::InvalidQuery(_) => "ORDERS_INVALID_QUERY",
            ExecutorError::StoreUnavailable(_) => "ORDERS_STORE_UNAVAILABLE",
            ExecutorError::Cancelled { .. } => "ORDERS_CANCELLED",
        }
    }

    /// Whether the same plan may succeed when retried
    pub fn is_retryable(&self) -> bool {
        matches!(self, ExecutorError::StoreUnavailable(_))
    }
}

impl From<StoreError> for ExecutorError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Unavailable(reason) => ExecutorError::StoreUnavailable(reason),
            StoreError::InvalidRequest(reason) => ExecutorError::InvalidQuery(reason),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            ExecutorError::InvalidQuery("x".into()).code(),
            "ORDERS_INVALID_QUERY"
        );
        assert_eq!(
            ExecutorError::StoreUnavailable("x".into()).code(),
            "ORDERS_STORE_UNAVAILABLE"
        );
        assert_eq!(
            ExecutorError::Cancelled { pages_fetched: 0 }.code(),
            "ORDERS_CANCELLED"
        );
    }

    #[test]
    fn test_store_errors_map_by_retryability() {
        let unavailable: ExecutorError = StoreError::Unavailable("throttled".into()).into();
        assert!(unavailable.is_retryable());

        let rejected: ExecutorError = StoreError::InvalidRequest("no such index".into()).into();
        assert!(!rejected.is_retryable());
        assert_eq!(rejected, ExecutorError::InvalidQuery("no such index".into()));
    }

    #[test]
    fn test_cancelled_display() {
        let err = ExecutorError::Cancelled { pages_fetched: 2 };
        assert_eq!(err.to_string(), "Execution cancelled after 2 page(s)");
        assert!(!err.is_retryable());
    }
}
