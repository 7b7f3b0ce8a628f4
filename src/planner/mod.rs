//! Access planner subsystem
//!
//! Maps a query intent to a concrete access path without the caller naming
//! tables or indexes.
//!
//! # Contract
//!
//! - Partition-key conditions accept `eq` only
//! - Range queries pair a partition `eq` with an inclusive `between` on a
//!   sort-ordered attribute, plus post-fetch filters
//! - Attribute scans accept `eq` and `gt`
//! - Any other operator is `UnsupportedOperator`
//! - Same intent and catalog give the same plan

mod ast;
mod errors;
mod explain;
mod planner;
mod request;

pub use ast::{Condition, Operator, OperatorKind, QueryIntent};
pub use errors::{PlannerError, PlannerResult};
pub use explain::ExplainPlan;
pub use planner::{AccessPath, AccessPlanner, Plan};
pub use request::{ConditionSpec, IntentSpec};
