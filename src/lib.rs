//! orderstore - order queries and top-K country aggregation over a
//! partition/sort-keyed store
//!
//! Leaf-first: `model` and `schema` describe the data, `planner` picks an
//! access path, `executor` runs it against a `store`, `aggregate` reduces
//! the result, and `orders` composes them into the order interfaces.

pub mod aggregate;
pub mod cli;
pub mod executor;
pub mod model;
pub mod observability;
pub mod orders;
pub mod planner;
pub mod schema;
pub mod store;
