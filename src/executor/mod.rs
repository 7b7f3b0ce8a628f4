//! Query executor subsystem
//!
//! Consumes plans and produces complete, deterministic results.
//!
//! # Execution Flow
//!
//! 1. GET plans issue a single point read
//! 2. QUERY plans send key conditions to the store and filter each page
//! 3. SCAN plans send filter conditions to the store
//! 4. Pages are followed until end-of-results and concatenated in order
//!
//! # Guarantees
//!
//! - Cancellation is observed before every page request
//! - A failed or cancelled execution returns no partial result
//! - Store errors keep their retryability

mod cancel;
mod errors;
mod executor;
mod filters;
mod result;

pub use cancel::CancellationFlag;
pub use errors::{ExecutorError, ExecutorResult};
pub use executor::QueryExecutor;
pub use filters::ConditionFilter;
pub use result::ExecutionResult;
