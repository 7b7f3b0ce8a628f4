//! # Store Errors

use thiserror::Error;

/// Result type for store calls
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors reported by a key-value store
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Transient failure; the same request may succeed later
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// The store rejected the request itself
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}
