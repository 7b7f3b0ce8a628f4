//! Table and index catalog
//!
//! The planner never hard-codes index names. It is parameterized by a
//! [`TableSchema`] describing the table's primary key and its secondary
//! indexes. Two layouts ship with the crate:
//!
//! - [`TableSchema::orders`]: `seller_id` + `order_time_rand` primary key with
//!   local secondary indexes on customer, product and total price
//! - [`TableSchema::orders_by_order_id`]: `order_id` hash key with global
//!   secondary indexes on customer and product/order time

mod errors;
mod types;
mod validator;

pub use errors::{SchemaError, SchemaResult};
pub use types::{IndexKind, IndexSchema, KeySchema, TableSchema, Target};
pub use validator::SchemaValidator;
