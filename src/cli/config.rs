//! Configuration file
//!
//! ```json
//! {
//!   "data_file": "orders.json",
//!   "page_size": 100,
//!   "top_k": 3,
//!   "log_level": "info",
//!   "schema": "seller",
//!   "query_timeout_ms": 5000
//! }
//! ```
//!
//! Only `data_file` is required. A relative `data_file` is resolved against
//! the directory holding the config file. `schema` is `"seller"`,
//! `"order_id"` or an inline table definition.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::aggregate::DEFAULT_TOP_K;
use crate::observability::Severity;
use crate::schema::{SchemaValidator, TableSchema};
use crate::store::DEFAULT_PAGE_SIZE;

use super::errors::{CliError, CliResult};

/// Table catalog selection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SchemaConfig {
    /// `"seller"` or `"order_id"`
    Named(String),
    Custom(TableSchema),
}

impl Default for SchemaConfig {
    fn default() -> Self {
        SchemaConfig::Named("seller".to_string())
    }
}

/// Configuration file structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// JSON array of orders (required)
    pub data_file: PathBuf,

    /// Items per store page (optional, default 100)
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Quantities kept by top-countries (optional, default 3)
    #[serde(default = "default_top_k")]
    pub top_k: usize,

    /// Minimum log severity (optional, default "info")
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub schema: SchemaConfig,

    /// Cancel a query that runs longer than this (optional, no limit)
    #[serde(default)]
    pub query_timeout_ms: Option<u64>,
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}
fn default_top_k() -> usize {
    DEFAULT_TOP_K
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from file, resolving `data_file` against the
    /// config's directory
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| CliError::Config(format!("Failed to read config: {}", e)))?;

        let mut config: Config = serde_json::from_str(&content)
            .map_err(|e| CliError::Config(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;

        if config.data_file.is_relative() {
            if let Some(dir) = path.parent() {
                config.data_file = dir.join(&config.data_file);
            }
        }

        Ok(config)
    }

    /// Validate configuration values
    fn validate(&self) -> CliResult<()> {
        if self.data_file.as_os_str().is_empty() {
            return Err(CliError::Config("data_file must not be empty".into()));
        }

        if self.page_size == 0 {
            return Err(CliError::Config("page_size must be > 0".into()));
        }

        if self.top_k == 0 {
            return Err(CliError::Config("top_k must be > 0".into()));
        }

        if self.query_timeout_ms == Some(0) {
            return Err(CliError::Config("query_timeout_ms must be > 0".into()));
        }

        self.severity()?;
        self.table_schema()?;

        Ok(())
    }

    pub fn severity(&self) -> CliResult<Severity> {
        self.log_level
            .parse()
            .map_err(|e: String| CliError::Config(format!("Invalid log_level: {}", e)))
    }

    /// Resolves and validates the table catalog
    pub fn table_schema(&self) -> CliResult<TableSchema> {
        let schema = match &self.schema {
            SchemaConfig::Named(name) => match name.as_str() {
                "seller" => TableSchema::orders(),
                "order_id" => TableSchema::orders_by_order_id(),
                other => {
                    return Err(CliError::Config(format!(
                        "Invalid schema: '{}'. Expected 'seller', 'order_id' or a table definition.",
                        other
                    )))
                }
            },
            SchemaConfig::Custom(schema) => schema.clone(),
        };
        SchemaValidator::validate(&schema)?;
        Ok(schema)
    }

    pub fn query_timeout(&self) -> Option<Duration> {
        self.query_timeout_ms.map(Duration::from_millis)
    }
}
