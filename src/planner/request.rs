//! JSON request form of intents
//!
//! External callers (the CLI) send operator and attribute names as strings.
//! Resolving a request validates every name and value up front, so a bad
//! operator is reported as `UnsupportedOperator` before any store call.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::model::{Attribute, AttributeValue, ModelError};

use super::ast::{Condition, Operator, OperatorKind, QueryIntent};
use super::errors::{PlannerError, PlannerResult};

/// A condition as it arrives on the wire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionSpec {
    pub attribute: String,
    pub op: String,
    pub value: Value,
    /// Upper bound for `between`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upper: Option<Value>,
}

/// An intent as it arrives on the wire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IntentSpec {
    Lookup {
        partition: ConditionSpec,
        #[serde(default)]
        sort: Option<ConditionSpec>,
        #[serde(default)]
        filters: Vec<ConditionSpec>,
    },
    Range {
        partition: ConditionSpec,
        range: ConditionSpec,
        #[serde(default)]
        filters: Vec<ConditionSpec>,
    },
    Scan {
        filter: ConditionSpec,
        #[serde(default)]
        filters: Vec<ConditionSpec>,
    },
}

impl ConditionSpec {
    /// Resolves names and values into a typed condition
    pub fn resolve(&self) -> PlannerResult<Condition> {
        let attribute: Attribute = self.attribute.parse().map_err(model_error)?;
        let kind: OperatorKind = self.op.parse().map_err(|err| match err {
            PlannerError::UnsupportedOperator {
                operator, reason, ..
            } => PlannerError::UnsupportedOperator {
                attribute: Some(self.attribute.clone()),
                operator,
                reason,
            },
            other => other,
        })?;
        let value = AttributeValue::from_json(attribute, &self.value).map_err(model_error)?;

        let op = match kind {
            OperatorKind::Equals => Operator::Equals(value),
            OperatorKind::GreaterThan => Operator::GreaterThan(value),
            OperatorKind::Between => {
                let upper = self.upper.as_ref().ok_or_else(|| {
                    PlannerError::InvalidCondition(format!(
                        "between on '{}' needs an upper bound",
                        attribute
                    ))
                })?;
                Operator::Between(
                    value,
                    AttributeValue::from_json(attribute, upper).map_err(model_error)?,
                )
            }
        };

        Ok(Condition { attribute, op })
    }
}

impl IntentSpec {
    /// Resolves the request into a typed intent
    pub fn resolve(&self) -> PlannerResult<QueryIntent> {
        match self {
            IntentSpec::Lookup {
                partition,
                sort,
                filters,
            } => Ok(QueryIntent::Lookup {
                partition: partition.resolve()?,
                sort: sort.as_ref().map(ConditionSpec::resolve).transpose()?,
                filters: resolve_all(filters)?,
            }),
            IntentSpec::Range {
                partition,
                range,
                filters,
            } => Ok(QueryIntent::Range {
                partition: partition.resolve()?,
                range: range.resolve()?,
                filters: resolve_all(filters)?,
            }),
            IntentSpec::Scan { filter, filters } => Ok(QueryIntent::Scan {
                filter: filter.resolve()?,
                filters: resolve_all(filters)?,
            }),
        }
    }
}

fn resolve_all(specs: &[ConditionSpec]) -> PlannerResult<Vec<Condition>> {
    specs.iter().map(ConditionSpec::resolve).collect()
}

fn model_error(err: ModelError) -> PlannerError {
    match err {
        ModelError::UnknownAttribute(name) => PlannerError::UnknownAttribute(name),
        other => PlannerError::InvalidCondition(other.to_string()),
    }
}
