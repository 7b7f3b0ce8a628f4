//! # Schema Errors

use thiserror::Error;

/// Result type for catalog validation
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Errors in a table catalog
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("Table name must not be empty")]
    EmptyTableName,

    #[error("Duplicate index name: {0}")]
    DuplicateIndex(String),

    #[error("Index '{0}' uses the same attribute as partition and sort key")]
    DegenerateKey(String),

    #[error("Local index '{index}' must be partitioned on the table partition key '{expected}'")]
    LocalIndexPartition { index: String, expected: String },

    #[error("Local index '{0}' requires a table with a sort key")]
    LocalIndexWithoutSortKey(String),
}

impl SchemaError {
    /// Stable error code
    pub fn code(&self) -> &'static str {
        match self {
            SchemaError::EmptyTableName => "ORDERS_SCHEMA_EMPTY_TABLE_NAME",
            SchemaError::DuplicateIndex(_) => "ORDERS_SCHEMA_DUPLICATE_INDEX",
            SchemaError::DegenerateKey(_) => "ORDERS_SCHEMA_DEGENERATE_KEY",
            SchemaError::LocalIndexPartition { .. } => "ORDERS_SCHEMA_LOCAL_INDEX_PARTITION",
            SchemaError::LocalIndexWithoutSortKey(_) => "ORDERS_SCHEMA_LOCAL_INDEX_SORT_KEY",
        }
    }
}
