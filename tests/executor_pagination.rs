//! Executor Pagination Tests
//!
//! Tests for executor invariants against an injected store:
//! - Pages are followed to the end and concatenated in order
//! - Cancellation between pages aborts with no partial result
//! - Store failures keep their retryability
//! - Scan plans only ever call the store's scan
//! - A continuation token handed back twice is an error, even after a cycle

use std::sync::atomic::{AtomicUsize, Ordering};

use orderstore::executor::{CancellationFlag, ExecutorError, QueryExecutor};
use orderstore::model::{Attribute, Order, PrimaryKey};
use orderstore::planner::{AccessPlanner, Condition, Plan, QueryIntent};
use orderstore::schema::TableSchema;
use orderstore::store::{
    ContinuationToken, IndexQuery, InMemoryStore, KeyValueStore, Page, StoreError, StoreResult,
};

// =============================================================================
// Helper Functions
// =============================================================================

/// Serves three pages of two orders each
struct ThreePageStore {
    requests: AtomicUsize,
    cancel_after: Option<(usize, CancellationFlag)>,
    fail_at: Option<usize>,
}

impl ThreePageStore {
    fn new() -> Self {
        Self {
            requests: AtomicUsize::new(0),
            cancel_after: None,
            fail_at: None,
        }
    }

    fn page(&self, token: Option<&ContinuationToken>) -> StoreResult<Page> {
        let request = self.requests.fetch_add(1, Ordering::SeqCst);
        if self.fail_at == Some(request) {
            return Err(StoreError::Unavailable("throughput exceeded".into()));
        }
        if let Some((after, flag)) = &self.cancel_after {
            if request + 1 == *after {
                flag.cancel();
            }
        }

        let page: usize = match token {
            None => 0,
            Some(t) => t.as_str().trim_start_matches("page-").parse().unwrap(),
        };
        let items = (0..2)
            .map(|i| Order::new("s1", format!("2013-01-0{}T00:00:00Z#00", page * 2 + i + 1)))
            .collect();

        if page < 2 {
            Ok(Page::more(
                items,
                ContinuationToken::new(format!("page-{}", page + 1)),
            ))
        } else {
            Ok(Page::last(items))
        }
    }
}

impl KeyValueStore for ThreePageStore {
    fn get(&self, _key: &PrimaryKey) -> StoreResult<Option<Order>> {
        Ok(None)
    }

    fn put(&self, _order: Order) -> StoreResult<()> {
        Err(StoreError::InvalidRequest("read-only".into()))
    }

    fn delete(&self, _key: &PrimaryKey) -> StoreResult<Option<Order>> {
        Ok(None)
    }

    fn query_index(
        &self,
        _query: &IndexQuery<'_>,
        start: Option<&ContinuationToken>,
    ) -> StoreResult<Page> {
        self.page(start)
    }

    fn scan(&self, _filters: &[Condition], start: Option<&ContinuationToken>) -> StoreResult<Page> {
        self.page(start)
    }
}

/// Answers scans from a fixed list and refuses index queries
struct ScanOnlyStore {
    orders: Vec<Order>,
    scan_calls: AtomicUsize,
}

impl KeyValueStore for ScanOnlyStore {
    fn get(&self, _key: &PrimaryKey) -> StoreResult<Option<Order>> {
        Err(StoreError::InvalidRequest("get on scan-only store".into()))
    }

    fn put(&self, _order: Order) -> StoreResult<()> {
        Err(StoreError::InvalidRequest("read-only".into()))
    }

    fn delete(&self, _key: &PrimaryKey) -> StoreResult<Option<Order>> {
        Ok(None)
    }

    fn query_index(
        &self,
        query: &IndexQuery<'_>,
        _start: Option<&ContinuationToken>,
    ) -> StoreResult<Page> {
        Err(StoreError::InvalidRequest(format!(
            "query_index on {} against scan-only store",
            query.target
        )))
    }

    fn scan(&self, filters: &[Condition], _start: Option<&ContinuationToken>) -> StoreResult<Page> {
        self.scan_calls.fetch_add(1, Ordering::SeqCst);
        let items = self
            .orders
            .iter()
            .filter(|o| filters.iter().all(|c| c.matches(o)))
            .cloned()
            .collect();
        Ok(Page::last(items))
    }
}

/// Hands out tokens a -> b -> a, never reaching the end
struct CyclingStore {
    requests: AtomicUsize,
}

impl KeyValueStore for CyclingStore {
    fn get(&self, _key: &PrimaryKey) -> StoreResult<Option<Order>> {
        Ok(None)
    }

    fn put(&self, _order: Order) -> StoreResult<()> {
        Ok(())
    }

    fn delete(&self, _key: &PrimaryKey) -> StoreResult<Option<Order>> {
        Ok(None)
    }

    fn query_index(
        &self,
        _query: &IndexQuery<'_>,
        start: Option<&ContinuationToken>,
    ) -> StoreResult<Page> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        let next = match start.map(|t| t.as_str()) {
            Some("a") => "b",
            _ => "a",
        };
        Ok(Page::more(Vec::new(), ContinuationToken::new(next)))
    }

    fn scan(&self, _filters: &[Condition], start: Option<&ContinuationToken>) -> StoreResult<Page> {
        self.query_index(
            &IndexQuery {
                target: &orderstore::schema::Target::Table,
                key_conditions: &[],
            },
            start,
        )
    }
}

fn seller_plan() -> Plan {
    let schema = TableSchema::orders();
    AccessPlanner::new(&schema)
        .plan(&QueryIntent::lookup(Condition::eq(Attribute::SellerId, "s1")))
        .unwrap()
}

// =============================================================================
// Pagination Tests
// =============================================================================

/// Three pages of two items give six items in page order.
#[test]
fn test_three_pages_concatenated() {
    let store = ThreePageStore::new();
    let result = QueryExecutor::new(&store).execute(&seller_plan()).unwrap();

    let keys: Vec<String> = result.iter().map(|o| o.order_time_rand.clone()).collect();
    let expected: Vec<String> = (1..=6)
        .map(|d| format!("2013-01-0{}T00:00:00Z#00", d))
        .collect();
    assert_eq!(keys, expected);
    assert_eq!(result.pages_fetched, 3);
    assert_eq!(store.requests.load(Ordering::SeqCst), 3);
}

/// The executor works through a trait object.
#[test]
fn test_dyn_store() {
    let store = ThreePageStore::new();
    let dyn_store: &dyn KeyValueStore = &store;
    let result = QueryExecutor::new(dyn_store).execute(&seller_plan()).unwrap();
    assert_eq!(result.len(), 6);
}

/// The in-memory store paginates at its page size.
#[test]
fn test_in_memory_store_small_pages() {
    let store = InMemoryStore::new(TableSchema::orders()).with_page_size(1);
    for day in 1..=5 {
        store
            .put(Order::new("s1", format!("2013-01-0{}T00:00:00Z#00", 6 - day)))
            .unwrap();
    }

    let result = QueryExecutor::new(&store).execute(&seller_plan()).unwrap();
    assert_eq!(result.pages_fetched, 5);

    let keys: Vec<&str> = result.iter().map(|o| o.order_time_rand.as_str()).collect();
    let mut sorted = keys.clone();
    sorted.sort();
    assert_eq!(keys, sorted);
}

// =============================================================================
// Cancellation And Failure Tests
// =============================================================================

/// Cancelling between pages yields Cancelled, never a partial result.
#[test]
fn test_cancel_between_pages() {
    let flag = CancellationFlag::new();
    let mut store = ThreePageStore::new();
    store.cancel_after = Some((1, flag.clone()));

    let err = QueryExecutor::new(&store)
        .with_cancellation(flag)
        .execute(&seller_plan())
        .unwrap_err();

    assert_eq!(err, ExecutorError::Cancelled { pages_fetched: 1 });
    assert_eq!(store.requests.load(Ordering::SeqCst), 1);
}

/// A transient store failure is retryable and discards earlier pages.
#[test]
fn test_transient_failure_retryable() {
    let mut store = ThreePageStore::new();
    store.fail_at = Some(1);

    let err = QueryExecutor::new(&store)
        .execute(&seller_plan())
        .unwrap_err();
    assert!(matches!(err, ExecutorError::StoreUnavailable(_)));
    assert!(err.is_retryable());
}

/// A request the store rejects is not retryable.
#[test]
fn test_rejected_request_not_retryable() {
    let store = InMemoryStore::new(TableSchema::orders());
    let mut plan = seller_plan();
    plan.target = orderstore::schema::Target::index("Missing_Index");

    let err = QueryExecutor::new(&store).execute(&plan).unwrap_err();
    assert!(matches!(err, ExecutorError::InvalidQuery(_)));
    assert!(!err.is_retryable());
}

// =============================================================================
// Access Path Tests
// =============================================================================

/// A planned scan reaches the store's scan and never its index query.
#[test]
fn test_scan_plan_never_queries_index() {
    let store = ScanOnlyStore {
        orders: vec![
            Order::new("s1", "2013-01-01T00:00:00Z#00").with_country("US"),
            Order::new("s2", "2013-01-02T00:00:00Z#00").with_country("FR"),
        ],
        scan_calls: AtomicUsize::new(0),
    };
    let schema = TableSchema::orders();
    let plan = AccessPlanner::new(&schema)
        .plan(&QueryIntent::scan(Condition::eq(Attribute::Country, "FR")))
        .unwrap();

    let result = QueryExecutor::new(&store).execute(&plan).unwrap();
    assert_eq!(result.len(), 1);
    assert_eq!(result.orders[0].seller_id, "s2");
    assert_eq!(store.scan_calls.load(Ordering::SeqCst), 1);

    let err = QueryExecutor::new(&store).execute(&seller_plan()).unwrap_err();
    assert!(matches!(err, ExecutorError::InvalidQuery(_)));
}

// =============================================================================
// Token Guard Tests
// =============================================================================

/// A token that comes back after a cycle stops the execution.
#[test]
fn test_token_cycle_rejected() {
    let store = CyclingStore {
        requests: AtomicUsize::new(0),
    };

    let err = QueryExecutor::new(&store).execute(&seller_plan()).unwrap_err();
    match err {
        ExecutorError::InvalidQuery(message) => assert!(message.contains("'a'")),
        other => panic!("expected InvalidQuery, got {:?}", other),
    }
    assert_eq!(store.requests.load(Ordering::SeqCst), 3);
}
