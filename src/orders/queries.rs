//! Order interfaces
//!
//! Composes planner, executor and aggregator over one store:
//!
//! 1. get, put and delete a single order
//! 2. orders of a customer
//! 3. orders of a product
//! 4. orders above a total price
//! 5. top countries for a product within a time window
//!
//! Callers never name tables or indexes; the planner picks the access path
//! from the catalog.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::aggregate::{TopCountries, TopKAggregator, DEFAULT_TOP_K};
use crate::executor::{CancellationFlag, QueryExecutor};
use crate::model::{sort_key, Attribute, Order, TimeWindow};
use crate::observability::MetricsRegistry;
use crate::planner::{AccessPlanner, Condition, ExplainPlan, QueryIntent};
use crate::schema::TableSchema;
use crate::store::KeyValueStore;

use super::errors::QueryResult;

/// Query facade over a store and its catalog
pub struct OrderQueries<'a, S: KeyValueStore + ?Sized> {
    store: &'a S,
    schema: &'a TableSchema,
    top_k: usize,
    metrics: Option<&'a MetricsRegistry>,
    cancellation: Option<CancellationFlag>,
}

impl<'a, S: KeyValueStore + ?Sized> OrderQueries<'a, S> {
    pub fn new(store: &'a S, schema: &'a TableSchema) -> Self {
        Self {
            store,
            schema,
            top_k: DEFAULT_TOP_K,
            metrics: None,
            cancellation: None,
        }
    }

    /// Number of quantities kept by [`top_countries`](Self::top_countries)
    pub fn with_top_k(mut self, k: usize) -> Self {
        self.top_k = k;
        self
    }

    pub fn with_metrics(mut self, metrics: &'a MetricsRegistry) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn with_cancellation(mut self, flag: CancellationFlag) -> Self {
        self.cancellation = Some(flag);
        self
    }

    pub fn schema(&self) -> &TableSchema {
        self.schema
    }

    fn planner(&self) -> AccessPlanner<'a> {
        match self.metrics {
            Some(m) => AccessPlanner::new(self.schema).with_metrics(m),
            None => AccessPlanner::new(self.schema),
        }
    }

    fn executor(&self) -> QueryExecutor<'a, S> {
        let mut executor = QueryExecutor::new(self.store);
        if let Some(m) = self.metrics {
            executor = executor.with_metrics(m);
        }
        if let Some(flag) = &self.cancellation {
            executor = executor.with_cancellation(flag.clone());
        }
        executor
    }

    // Single items

    pub fn put_order(&self, order: Order) -> QueryResult<()> {
        self.store.put(order)?;
        Ok(())
    }

    /// Stores `order` as placed at `at`, minting a fresh sort key so that
    /// orders placed in the same second never collide. Returns the stored
    /// order.
    pub fn put_order_at(&self, at: DateTime<Utc>, mut order: Order) -> QueryResult<Order> {
        order.order_time_rand = sort_key(at);
        self.store.put(order.clone())?;
        Ok(order)
    }

    /// Point read by full primary key, given as equality conditions
    pub fn get_order(&self, key: &[Condition]) -> QueryResult<Option<Order>> {
        let key = self.planner().primary_key(key)?;
        Ok(self.store.get(&key)?)
    }

    pub fn delete_order(&self, key: &[Condition]) -> QueryResult<Option<Order>> {
        let key = self.planner().primary_key(key)?;
        Ok(self.store.delete(&key)?)
    }

    // Planned queries

    /// Plans and runs `intent`, returning every matching order
    pub fn find(&self, intent: &QueryIntent) -> QueryResult<Vec<Order>> {
        let plan = self.planner().plan(intent)?;
        Ok(self.executor().execute(&plan)?.into_orders())
    }

    /// Describes the plan for `intent` without touching the store
    pub fn explain(&self, intent: &QueryIntent) -> ExplainPlan {
        match self.planner().plan(intent) {
            Ok(plan) => ExplainPlan::from_plan(&plan),
            Err(err) => ExplainPlan::from_error(&err),
        }
    }

    /// Orders placed by `customer`, narrowed to one seller when given
    pub fn orders_by_customer(&self, seller: Option<&str>, customer: &str) -> QueryResult<Vec<Order>> {
        self.find(&self.secondary_lookup(seller, Attribute::CustomerId, customer))
    }

    /// Orders of `product`, narrowed to one seller when given
    pub fn orders_by_product(&self, seller: Option<&str>, product: &str) -> QueryResult<Vec<Order>> {
        self.find(&self.secondary_lookup(seller, Attribute::ProductId, product))
    }

    /// Orders whose total price is strictly greater than `min_price`
    pub fn orders_above_price(&self, min_price: Decimal) -> QueryResult<Vec<Order>> {
        self.find(&QueryIntent::scan(Condition::gt(Attribute::TotalPrice, min_price)))
    }

    /// Orders of `product` placed within `window`
    pub fn orders_for_product_in_window(
        &self,
        product: &str,
        window: &TimeWindow,
        seller: Option<&str>,
    ) -> QueryResult<Vec<Order>> {
        self.find(&product_window_intent(product, window, seller))
    }

    /// Top countries by purchased quantity of `product` within `window`
    pub fn top_countries(
        &self,
        product: &str,
        window: &TimeWindow,
        seller: Option<&str>,
    ) -> QueryResult<TopCountries> {
        let orders = self.orders_for_product_in_window(product, window, seller)?;
        let mut aggregator = TopKAggregator::new(self.top_k);
        if let Some(m) = self.metrics {
            aggregator = aggregator.with_metrics(m);
        }
        Ok(aggregator.aggregate(&orders))
    }

    fn secondary_lookup(&self, seller: Option<&str>, attribute: Attribute, value: &str) -> QueryIntent {
        let condition = Condition::eq(attribute, value);
        match seller {
            Some(seller) => {
                QueryIntent::lookup_with(Condition::eq(Attribute::SellerId, seller), condition)
            }
            None => QueryIntent::lookup(condition),
        }
    }
}

/// With a seller the window ranges over that seller's sort key and the
/// product is a filter; without one the product is the partition.
fn product_window_intent(product: &str, window: &TimeWindow, seller: Option<&str>) -> QueryIntent {
    let (lower, upper) = window.sort_key_bounds();
    let range = Condition::between(Attribute::OrderTimeRand, lower, upper);
    let product = Condition::eq(Attribute::ProductId, product);

    match seller {
        Some(seller) => QueryIntent::range(Condition::eq(Attribute::SellerId, seller), range)
            .with_filter(product),
        None => QueryIntent::range(product, range),
    }
}
