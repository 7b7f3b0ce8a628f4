//! In-memory key-value store
//!
//! Reference implementation of [`KeyValueStore`] used by the CLI and tests.
//! Items live in a `BTreeMap` keyed by the table's primary key, so scans and
//! table queries come back in primary-key order. Index queries are ordered by
//! the index key, ties broken by primary key.
//!
//! Pagination mirrors a managed store: a page holds at most `page_size`
//! evaluated items, and scan filters run after the page is cut, so a scan
//! page may hold fewer matches than the page size, or none.
//! Continuation tokens encode the offset of the next evaluated item.

use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::executor::ConditionFilter;
use crate::model::{Order, PrimaryKey};
use crate::planner::Condition;
use crate::schema::{KeySchema, TableSchema};

use super::errors::{StoreError, StoreResult};
use super::{ContinuationToken, IndexQuery, KeyValueStore, Page};

/// Default number of evaluated items per page
pub const DEFAULT_PAGE_SIZE: usize = 100;

const TOKEN_PREFIX: &str = "offset:";

/// Thread-safe in-memory table with secondary indexes
#[derive(Debug)]
pub struct InMemoryStore {
    schema: TableSchema,
    page_size: usize,
    items: RwLock<BTreeMap<PrimaryKey, Order>>,
}

impl InMemoryStore {
    /// Creates an empty store for `schema`
    pub fn new(schema: TableSchema) -> Self {
        Self {
            schema,
            page_size: DEFAULT_PAGE_SIZE,
            items: RwLock::new(BTreeMap::new()),
        }
    }

    /// Sets the page size (at least 1)
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn schema(&self) -> &TableSchema {
        &self.schema
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Number of items in the table
    pub fn len(&self) -> StoreResult<usize> {
        Ok(self.read()?.len())
    }

    pub fn is_empty(&self) -> StoreResult<bool> {
        Ok(self.read()?.is_empty())
    }

    /// Writes every order, stopping at the first failure
    pub fn load(&self, orders: impl IntoIterator<Item = Order>) -> StoreResult<usize> {
        let mut count = 0;
        for order in orders {
            self.put(order)?;
            count += 1;
        }
        Ok(count)
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, BTreeMap<PrimaryKey, Order>>> {
        self.items
            .read()
            .map_err(|_| StoreError::Unavailable("table lock poisoned".into()))
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, BTreeMap<PrimaryKey, Order>>> {
        self.items
            .write()
            .map_err(|_| StoreError::Unavailable("table lock poisoned".into()))
    }

    fn validate_key_conditions(&self, key: &KeySchema, query: &IndexQuery<'_>) -> StoreResult<()> {
        let (partition, rest) = query.key_conditions.split_first().ok_or_else(|| {
            StoreError::InvalidRequest(format!("query on {} has no key condition", query.target))
        })?;

        if partition.attribute != key.partition || !partition.is_equality() {
            return Err(StoreError::InvalidRequest(format!(
                "first key condition on {} must be '{}' eq",
                query.target, key.partition
            )));
        }

        match rest {
            [] => Ok(()),
            [sort] if key.sort == Some(sort.attribute) => Ok(()),
            [other] => Err(StoreError::InvalidRequest(format!(
                "'{}' is not the sort key of {}",
                other.attribute, query.target
            ))),
            _ => Err(StoreError::InvalidRequest(format!(
                "too many key conditions for {}",
                query.target
            ))),
        }
    }
}

fn decode_token(token: Option<&ContinuationToken>) -> StoreResult<usize> {
    let Some(token) = token else {
        return Ok(0);
    };
    token
        .as_str()
        .strip_prefix(TOKEN_PREFIX)
        .and_then(|offset| offset.parse().ok())
        .ok_or_else(|| StoreError::InvalidRequest(format!("malformed continuation token '{}'", token.as_str())))
}

fn encode_token(offset: usize) -> ContinuationToken {
    ContinuationToken::new(format!("{}{}", TOKEN_PREFIX, offset))
}

/// Cuts one page of evaluated items starting at `start`
fn cut_page<'e, 'o>(
    evaluated: &'e [&'o Order],
    start: Option<&ContinuationToken>,
    page_size: usize,
) -> StoreResult<(&'e [&'o Order], Option<ContinuationToken>)> {
    let offset = decode_token(start)?;
    if offset > evaluated.len() {
        return Err(StoreError::InvalidRequest(
            "continuation token is past the end of results".into(),
        ));
    }
    let end = (offset + page_size).min(evaluated.len());
    let next = (end < evaluated.len()).then(|| encode_token(end));
    Ok((&evaluated[offset..end], next))
}

impl KeyValueStore for InMemoryStore {
    fn get(&self, key: &PrimaryKey) -> StoreResult<Option<Order>> {
        Ok(self.read()?.get(key).cloned())
    }

    fn put(&self, order: Order) -> StoreResult<()> {
        let key = self.schema.key.key_of(&order).ok_or_else(|| {
            StoreError::InvalidRequest(format!(
                "order lacks the primary key attributes of {}",
                self.schema.name
            ))
        })?;
        self.write()?.insert(key, order);
        Ok(())
    }

    fn delete(&self, key: &PrimaryKey) -> StoreResult<Option<Order>> {
        Ok(self.write()?.remove(key))
    }

    fn query_index(
        &self,
        query: &IndexQuery<'_>,
        start: Option<&ContinuationToken>,
    ) -> StoreResult<Page> {
        let key = self.schema.key_for(query.target).ok_or_else(|| {
            StoreError::InvalidRequest(format!(
                "table {} has no index {}",
                self.schema.name, query.target
            ))
        })?;
        self.validate_key_conditions(key, query)?;

        let items = self.read()?;
        let mut matched: Vec<&Order> = items
            .values()
            .filter(|order| key.key_of(order).is_some())
            .filter(|order| ConditionFilter::matches(order, query.key_conditions))
            .collect();
        if !query.target.is_table() {
            matched.sort_by_key(|order| key.key_of(order));
        }

        let (page, next) = cut_page(&matched, start, self.page_size)?;
        Ok(Page {
            items: page.iter().map(|order| (*order).clone()).collect(),
            next,
        })
    }

    fn scan(&self, filters: &[Condition], start: Option<&ContinuationToken>) -> StoreResult<Page> {
        let items = self.read()?;
        let evaluated: Vec<&Order> = items.values().collect();

        let (page, next) = cut_page(&evaluated, start, self.page_size)?;
        Ok(Page {
            items: page
                .iter()
                .filter(|order| ConditionFilter::matches(order, filters))
                .map(|order| (*order).clone())
                .collect(),
            next,
        })
    }
}
