//! Order query interfaces
//!
//! The entry point for applications: single-item reads and writes, the
//! secondary-attribute queries and the top-countries report.

mod errors;
mod queries;

pub use errors::{QueryError, QueryResult};
pub use queries::OrderQueries;
