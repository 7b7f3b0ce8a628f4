//! Key-value store collaborator
//!
//! The query core talks to storage only through [`KeyValueStore`]. A store
//! owns schemas, connections and consistency; the core issues point reads,
//! key-condition queries and filtered scans, and follows continuation
//! tokens until a page reports end-of-results.

mod errors;
mod memory;

pub use errors::{StoreError, StoreResult};
pub use memory::{InMemoryStore, DEFAULT_PAGE_SIZE};

use crate::model::{Order, PrimaryKey};
use crate::planner::Condition;
use crate::schema::Target;

/// Opaque position from which a paginated request resumes
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContinuationToken(String);

impl ContinuationToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// One page of results
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Page {
    pub items: Vec<Order>,
    /// `None` marks end-of-results
    pub next: Option<ContinuationToken>,
}

impl Page {
    /// Final page
    pub fn last(items: Vec<Order>) -> Self {
        Self { items, next: None }
    }

    /// Page followed by more results
    pub fn more(items: Vec<Order>, next: ContinuationToken) -> Self {
        Self {
            items,
            next: Some(next),
        }
    }
}

/// Key-condition request against the table or a secondary index
#[derive(Debug, Clone, Copy)]
pub struct IndexQuery<'a> {
    pub target: &'a Target,
    /// Partition equality first, then the optional sort condition
    pub key_conditions: &'a [Condition],
}

/// Storage collaborator consumed by the query executor.
///
/// Implementations may be called from several threads at once.
pub trait KeyValueStore: Send + Sync {
    /// Point read; a missing item is `Ok(None)`
    fn get(&self, key: &PrimaryKey) -> StoreResult<Option<Order>>;

    /// Inserts or replaces an item
    fn put(&self, order: Order) -> StoreResult<()>;

    /// Removes an item, returning it if it existed
    fn delete(&self, key: &PrimaryKey) -> StoreResult<Option<Order>>;

    /// Key-condition query, ordered by the target's sort key
    fn query_index(
        &self,
        query: &IndexQuery<'_>,
        start: Option<&ContinuationToken>,
    ) -> StoreResult<Page>;

    /// Full-table scan returning items that match every filter
    fn scan(&self, filters: &[Condition], start: Option<&ContinuationToken>) -> StoreResult<Page>;
}
