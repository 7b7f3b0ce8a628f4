//! Logs and counters for planning, execution and aggregation
//!
//! Every lifecycle step is an [`Event`] with a fixed severity. Logging and
//! counting never change what a query returns.
//!
//! ```ignore
//! use orderstore::observability::{log_event_with_fields, Event, MetricsRegistry};
//!
//! log_event_with_fields(Event::DataLoaded, &[("orders", "42")]);
//!
//! let metrics = MetricsRegistry::new();
//! metrics.increment_executions();
//! ```

mod events;
mod logger;
mod metrics;

pub use events::Event;
pub use logger::{Logger, Severity};
pub use metrics::{MetricsRegistry, MetricsSnapshot};

/// Log a lifecycle event with fields at its own severity
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    Logger::log(event.severity(), event.as_str(), fields);
}
