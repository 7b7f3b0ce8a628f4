//! Explain output
//!
//! Deterministic JSON description of a plan or of the reason a request was
//! rejected.

use serde::Serialize;

use super::errors::PlannerError;
use super::planner::Plan;

/// Explain plan output
#[derive(Debug, Clone, Serialize)]
pub struct ExplainPlan {
    pub accepted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    pub key_conditions: Vec<String>,
    pub filter_conditions: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejection_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejection_reason: Option<String>,
}

impl ExplainPlan {
    pub fn from_plan(plan: &Plan) -> Self {
        Self {
            accepted: true,
            access: Some(plan.access.as_str().to_string()),
            target: Some(plan.target.to_string()),
            key_conditions: plan.key_conditions.iter().map(|c| c.to_string()).collect(),
            filter_conditions: plan.filter_conditions.iter().map(|c| c.to_string()).collect(),
            rejection_code: None,
            rejection_reason: None,
        }
    }

    pub fn from_error(error: &PlannerError) -> Self {
        Self {
            accepted: false,
            access: None,
            target: None,
            key_conditions: Vec::new(),
            filter_conditions: Vec::new(),
            rejection_code: Some(error.code().to_string()),
            rejection_reason: Some(error.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Attribute;
    use crate::planner::{AccessPlanner, Condition, QueryIntent};
    use crate::schema::TableSchema;

    #[test]
    fn test_explain_accepted() {
        let schema = TableSchema::orders();
        let plan = AccessPlanner::new(&schema)
            .plan(&QueryIntent::lookup_with(
                Condition::eq(Attribute::SellerId, "s1"),
                Condition::eq(Attribute::CustomerId, "c1"),
            ))
            .unwrap();

        let explain = ExplainPlan::from_plan(&plan);
        assert!(explain.accepted);
        assert_eq!(explain.target.as_deref(), Some("CustomerID_Index"));
        assert_eq!(explain.key_conditions[0], "seller_id = \"s1\"");

        let json = serde_json::to_value(&explain).unwrap();
        assert_eq!(json["access"], "QUERY");
    }

    #[test]
    fn test_explain_rejected() {
        let err = PlannerError::UnknownAttribute("shipping".into());
        let explain = ExplainPlan::from_error(&err);
        assert!(!explain.accepted);
        assert_eq!(explain.rejection_code.as_deref(), Some("ORDERS_UNKNOWN_ATTRIBUTE"));
        assert!(explain.access.is_none());
    }
}
