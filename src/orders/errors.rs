//! # Query Errors
//!
//! One error type for callers of the order interfaces. Planner rejections
//! and execution failures keep their own codes.

use thiserror::Error;

use crate::executor::ExecutorError;
use crate::planner::PlannerError;
use crate::store::StoreError;

/// Result type for order queries
pub type QueryResult<T> = Result<T, QueryError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error(transparent)]
    Planner(#[from] PlannerError),

    #[error(transparent)]
    Executor(#[from] ExecutorError),
}

impl QueryError {
    /// Stable error code of the underlying failure
    pub fn code(&self) -> &'static str {
        match self {
            QueryError::Planner(err) => err.code(),
            QueryError::Executor(err) => err.code(),
        }
    }

    pub fn is_retryable(&self) -> bool {
        match self {
            QueryError::Planner(_) => false,
            QueryError::Executor(err) => err.is_retryable(),
        }
    }
}

/// Direct store calls (put, get, delete) report through the executor codes
impl From<StoreError> for QueryError {
    fn from(err: StoreError) -> Self {
        QueryError::Executor(err.into())
    }
}
