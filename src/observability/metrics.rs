//! Metrics registry
//!
//! - Counters only (no gauges, no histograms)
//! - Monotonic increase
//! - Thread-safe but lock-minimal

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Metrics registry containing all query counters
///
/// All counters use Relaxed atomics; values are exact once the counted
/// operations have returned.
#[derive(Debug, Default)]
pub struct MetricsRegistry {
    plans_built: AtomicU64,
    plans_rejected: AtomicU64,
    executions: AtomicU64,
    pages_fetched: AtomicU64,
    items_returned: AtomicU64,
    cancellations: AtomicU64,
    aggregations: AtomicU64,
}

impl MetricsRegistry {
    /// Create a new metrics registry with all counters at zero
    pub fn new() -> Self {
        Self::default()
    }

    // Planner

    pub fn increment_plans_built(&self) {
        self.plans_built.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_plans_rejected(&self) {
        self.plans_rejected.fetch_add(1, Ordering::Relaxed);
    }

    // Executor

    pub fn increment_executions(&self) {
        self.executions.fetch_add(1, Ordering::Relaxed);
    }

    pub fn add_pages_fetched(&self, pages: u64) {
        self.pages_fetched.fetch_add(pages, Ordering::Relaxed);
    }

    pub fn add_items_returned(&self, items: u64) {
        self.items_returned.fetch_add(items, Ordering::Relaxed);
    }

    pub fn increment_cancellations(&self) {
        self.cancellations.fetch_add(1, Ordering::Relaxed);
    }

    // Aggregator

    pub fn increment_aggregations(&self) {
        self.aggregations.fetch_add(1, Ordering::Relaxed);
    }

    /// Get all metrics as a snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            plans_built: self.plans_built.load(Ordering::Relaxed),
            plans_rejected: self.plans_rejected.load(Ordering::Relaxed),
            executions: self.executions.load(Ordering::Relaxed),
            pages_fetched: self.pages_fetched.load(Ordering::Relaxed),
            items_returned: self.items_returned.load(Ordering::Relaxed),
            cancellations: self.cancellations.load(Ordering::Relaxed),
            aggregations: self.aggregations.load(Ordering::Relaxed),
        }
    }
}

/// A point-in-time snapshot of all metrics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub plans_built: u64,
    pub plans_rejected: u64,
    pub executions: u64,
    pub pages_fetched: u64,
    pub items_returned: u64,
    pub cancellations: u64,
    pub aggregations: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_registry_has_zero_values() {
        assert_eq!(MetricsRegistry::new().snapshot(), MetricsSnapshot::default());
    }

    #[test]
    fn test_increment_counters() {
        let registry = MetricsRegistry::new();

        registry.increment_plans_built();
        registry.increment_plans_built();
        registry.increment_plans_rejected();
        registry.increment_executions();
        registry.add_pages_fetched(3);
        registry.add_items_returned(6);
        registry.increment_cancellations();
        registry.increment_aggregations();

        let snapshot = registry.snapshot();
        assert_eq!(snapshot.plans_built, 2);
        assert_eq!(snapshot.plans_rejected, 1);
        assert_eq!(snapshot.executions, 1);
        assert_eq!(snapshot.pages_fetched, 3);
        assert_eq!(snapshot.items_returned, 6);
        assert_eq!(snapshot.cancellations, 1);
        assert_eq!(snapshot.aggregations, 1);
    }

    #[test]
    fn test_snapshot_serializes() {
        let registry = MetricsRegistry::new();
        registry.add_pages_fetched(2);

        let json = serde_json::to_value(registry.snapshot()).unwrap();
        assert_eq!(json["pages_fetched"], 2);
        assert_eq!(json["executions"], 0);
    }

    #[test]
    fn test_thread_safety() {
        use std::sync::Arc;
        use std::thread;

        let registry = Arc::new(MetricsRegistry::new());
        let mut handles = vec![];

        for _ in 0..10 {
            let reg = Arc::clone(&registry);
            handles.push(thread::spawn(move || {
                for _ in 0..100 {
                    reg.increment_executions();
                    reg.add_pages_fetched(2);
                }
            }));
        }

        for handle in handles {
            handle.join().unwrap();
        }

        let snapshot = registry.snapshot();
        assert_eq!(snapshot.executions, 1000);
        assert_eq!(snapshot.pages_fetched, 2000);
    }
}
