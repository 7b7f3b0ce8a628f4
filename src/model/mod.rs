//! Order data model
//!
//! One [`Order`] per item in the `Orders` table. Attribute names and values are
//! typed so that conditions can be validated when a plan is built rather than
//! when the store evaluates them.

mod attribute;
mod errors;
mod key;
mod order;
mod time;

pub use attribute::{Attribute, AttributeValue};
pub use errors::{ModelError, ModelResult};
pub use key::PrimaryKey;
pub use order::Order;
pub use time::{
    format_timestamp, parse_sort_key, parse_timestamp, sort_key, sort_key_with_suffix,
    TimeWindow, SORT_KEY_SEPARATOR, SUFFIX_WIDTH,
};
