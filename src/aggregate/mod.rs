//! Top-K aggregation
//!
//! Pure reduction over an order sequence; no store access.

mod result;
mod topk;

pub use result::{CountryGroup, TopCountries};
pub use topk::{TopKAggregator, DEFAULT_TOP_K};
