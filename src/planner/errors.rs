//! # Planner Errors
//!
//! Planner errors are caller bugs and are never retryable.

use thiserror::Error;

/// Result type for planner operations
pub type PlannerResult<T> = Result<T, PlannerError>;

/// Errors raised while turning an intent into a plan
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlannerError {
    /// Operator not valid for the attribute's role, or not supported at all
    #[error("Unsupported operator '{operator}'{}: {reason}", on_attribute(.attribute))]
    UnsupportedOperator {
        attribute: Option<String>,
        operator: String,
        reason: String,
    },

    #[error("Unknown attribute: {0}")]
    UnknownAttribute(String),

    #[error("Invalid condition: {0}")]
    InvalidCondition(String),
}

fn on_attribute(attribute: &Option<String>) -> String {
    attribute
        .as_ref()
        .map(|a| format!(" on '{}'", a))
        .unwrap_or_default()
}

impl PlannerError {
    pub(crate) fn unsupported(
        attribute: impl std::fmt::Display,
        operator: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        PlannerError::UnsupportedOperator {
            attribute: Some(attribute.to_string()),
            operator: operator.into(),
            reason: reason.into(),
        }
    }

    /// Stable error code
    pub fn code(&self) -> &'static str {
        match self {
            PlannerError::UnsupportedOperator { .. } => "ORDERS_UNSUPPORTED_OPERATOR",
            PlannerError::UnknownAttribute(_) => "ORDERS_UNKNOWN_ATTRIBUTE",
            PlannerError::InvalidCondition(_) => "ORDERS_INVALID_CONDITION",
        }
    }
}
