//! Query executor
//!
//! Runs a plan against the injected store and returns the complete result.
//!
//! Execution flow (strict order):
//! 1. Check cancellation before every store request
//! 2. Issue the request for the plan's access path
//! 3. Apply post-fetch filters to the page
//! 4. Append the page in store order
//! 5. Follow the continuation token until end-of-results
//!
//! An error at any step discards everything fetched so far. A token the
//! store hands back twice in one execution is an error, whether it repeats
//! immediately or after a cycle.

use std::collections::HashSet;

use crate::model::PrimaryKey;
use crate::observability::{log_event_with_fields, Event, MetricsRegistry};
use crate::planner::{AccessPath, Condition, Operator, Plan};
use crate::store::{ContinuationToken, IndexQuery, KeyValueStore, Page, StoreResult};

use super::cancel::CancellationFlag;
use super::errors::{ExecutorError, ExecutorResult};
use super::filters::ConditionFilter;
use super::result::ExecutionResult;

/// Executes plans against a key-value store
pub struct QueryExecutor<'a, S: KeyValueStore + ?Sized> {
    store: &'a S,
    cancellation: Option<CancellationFlag>,
    metrics: Option<&'a MetricsRegistry>,
}

impl<'a, S: KeyValueStore + ?Sized> QueryExecutor<'a, S> {
    /// Creates a new executor
    pub fn new(store: &'a S) -> Self {
        Self {
            store,
            cancellation: None,
            metrics: None,
        }
    }

    /// Polls `flag` before every page request
    pub fn with_cancellation(mut self, flag: CancellationFlag) -> Self {
        self.cancellation = Some(flag);
        self
    }

    pub fn with_metrics(mut self, metrics: &'a MetricsRegistry) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Executes a plan and returns every matching order.
    ///
    /// Same plan and same store contents give the same result.
    pub fn execute(&self, plan: &Plan) -> ExecutorResult<ExecutionResult> {
        let target = plan.target.to_string();
        log_event_with_fields(
            Event::ExecutionBegin,
            &[("access", plan.access.as_str()), ("target", target.as_str())],
        );
        if let Some(m) = self.metrics {
            m.increment_executions();
        }

        let outcome = match plan.access {
            AccessPath::Get => self.execute_get(plan),
            AccessPath::Query => {
                let query = IndexQuery {
                    target: &plan.target,
                    key_conditions: &plan.key_conditions,
                };
                self.drain(&plan.filter_conditions, |token| {
                    self.store.query_index(&query, token)
                })
            }
            // The store evaluates scan filters itself
            AccessPath::Scan => self.drain(&[], |token| {
                self.store.scan(&plan.filter_conditions, token)
            }),
        };

        match outcome {
            Ok(result) => {
                if let Some(m) = self.metrics {
                    m.add_pages_fetched(result.pages_fetched as u64);
                    m.add_items_returned(result.orders.len() as u64);
                }
                let pages = result.pages_fetched.to_string();
                let items = result.orders.len().to_string();
                let scanned = result.scanned_count.to_string();
                log_event_with_fields(
                    Event::ExecutionComplete,
                    &[
                        ("items", items.as_str()),
                        ("pages", pages.as_str()),
                        ("scanned", scanned.as_str()),
                        ("target", target.as_str()),
                    ],
                );
                Ok(result)
            }
            Err(err) => {
                if let ExecutorError::Cancelled { pages_fetched } = &err {
                    if let Some(m) = self.metrics {
                        m.increment_cancellations();
                    }
                    let pages = pages_fetched.to_string();
                    log_event_with_fields(
                        Event::ExecutionCancelled,
                        &[("pages", pages.as_str()), ("target", target.as_str())],
                    );
                }
                Err(err)
            }
        }
    }

    fn check_cancelled(&self, pages_fetched: usize) -> ExecutorResult<()> {
        match &self.cancellation {
            Some(flag) if flag.is_cancelled() => Err(ExecutorError::Cancelled { pages_fetched }),
            _ => Ok(()),
        }
    }

    fn execute_get(&self, plan: &Plan) -> ExecutorResult<ExecutionResult> {
        let key = point_key(&plan.key_conditions)?;
        self.check_cancelled(0)?;

        let found = self.store.get(&key)?;
        let scanned_count = usize::from(found.is_some());
        let mut orders: Vec<_> = found.into_iter().collect();
        ConditionFilter::retain(&mut orders, &plan.filter_conditions);

        Ok(ExecutionResult {
            orders,
            pages_fetched: 1,
            scanned_count,
        })
    }

    /// Fetches pages until the store reports end-of-results
    fn drain<F>(&self, filters: &[Condition], mut fetch: F) -> ExecutorResult<ExecutionResult>
    where
        F: FnMut(Option<&ContinuationToken>) -> StoreResult<Page>,
    {
        let mut result = ExecutionResult::empty();
        let mut token: Option<ContinuationToken> = None;
        let mut sent: HashSet<ContinuationToken> = HashSet::new();

        loop {
            self.check_cancelled(result.pages_fetched)?;

            let Page { mut items, next } = fetch(token.as_ref())?;
            result.pages_fetched += 1;
            result.scanned_count += items.len();
            ConditionFilter::retain(&mut items, filters);

            let page = result.pages_fetched.to_string();
            let count = items.len().to_string();
            log_event_with_fields(
                Event::PageFetched,
                &[("items", count.as_str()), ("page", page.as_str())],
            );
            result.orders.append(&mut items);

            match next {
                None => return Ok(result),
                Some(next) if !sent.insert(next.clone()) => {
                    return Err(ExecutorError::InvalidQuery(format!(
                        "store repeated continuation token '{}'",
                        next.as_str()
                    )));
                }
                Some(next) => token = Some(next),
            }
        }
    }
}

/// Builds the primary key of a GET plan from its equality conditions
fn point_key(conditions: &[Condition]) -> ExecutorResult<PrimaryKey> {
    let value = |condition: &Condition| match &condition.op {
        Operator::Equals(value) => Ok(value.clone()),
        _ => Err(ExecutorError::InvalidQuery(format!(
            "point lookup needs equality on '{}'",
            condition.attribute
        ))),
    };

    match conditions {
        [partition] => Ok(PrimaryKey {
            partition: value(partition)?,
            sort: None,
        }),
        [partition, sort] => Ok(PrimaryKey {
            partition: value(partition)?,
            sort: Some(value(sort)?),
        }),
        _ => Err(ExecutorError::InvalidQuery(
            "point lookup needs one or two key conditions".into(),
        )),
    }
}
