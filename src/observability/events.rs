//! Observable events
//!
//! Events are explicit and typed. Each carries the severity it is logged at.

use std::fmt;

use super::logger::Severity;

/// Observable events in the order store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Boot
    /// Configuration file read and validated
    ConfigLoaded,
    /// Data file loaded into the store
    DataLoaded,

    // Planning
    /// Intent resolved to a plan
    QueryPlanned,
    /// Intent rejected by the planner
    QueryRejected,
    /// No target is partitioned on the requested attribute
    ScanFallback,

    // Execution
    ExecutionBegin,
    ExecutionComplete,
    /// One store page received
    PageFetched,
    ExecutionCancelled,

    // Aggregation
    AggregationComplete,

    // Commands
    /// A CLI command failed
    CommandFailed,
}

impl Event {
    /// Returns the string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::DataLoaded => "DATA_LOADED",
            Event::QueryPlanned => "QUERY_PLANNED",
            Event::QueryRejected => "QUERY_REJECTED",
            Event::ScanFallback => "SCAN_FALLBACK",
            Event::ExecutionBegin => "EXECUTION_BEGIN",
            Event::ExecutionComplete => "EXECUTION_COMPLETE",
            Event::PageFetched => "PAGE_FETCHED",
            Event::ExecutionCancelled => "EXECUTION_CANCELLED",
            Event::AggregationComplete => "AGGREGATION_COMPLETE",
            Event::CommandFailed => "COMMAND_FAILED",
        }
    }

    /// Severity the event is logged at
    pub fn severity(&self) -> Severity {
        match self {
            Event::PageFetched => Severity::Trace,
            Event::QueryRejected | Event::ScanFallback | Event::ExecutionCancelled => {
                Severity::Warn
            }
            Event::CommandFailed => Severity::Error,
            _ => Severity::Info,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
