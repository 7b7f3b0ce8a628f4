//! Query intents and typed conditions
//!
//! A caller describes *what* it wants with a [`QueryIntent`]; the planner
//! decides *where* to send it. Conditions are a closed set of operators so
//! that an invalid combination is caught while planning.

use std::fmt;
use std::str::FromStr;

use crate::model::{Attribute, AttributeValue, Order};

use super::errors::PlannerError;

/// Comparison operators understood by the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operator {
    /// attribute = value
    Equals(AttributeValue),
    /// attribute > value
    GreaterThan(AttributeValue),
    /// lower <= attribute <= upper
    Between(AttributeValue, AttributeValue),
}

impl Operator {
    pub fn kind(&self) -> OperatorKind {
        match self {
            Operator::Equals(_) => OperatorKind::Equals,
            Operator::GreaterThan(_) => OperatorKind::GreaterThan,
            Operator::Between(_, _) => OperatorKind::Between,
        }
    }
}

/// Operator names as they appear in requests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperatorKind {
    Equals,
    GreaterThan,
    Between,
}

impl OperatorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperatorKind::Equals => "eq",
            OperatorKind::GreaterThan => "gt",
            OperatorKind::Between => "between",
        }
    }
}

impl fmt::Display for OperatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OperatorKind {
    type Err = PlannerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "eq" | "equals" => Ok(OperatorKind::Equals),
            "gt" | "greater_than" | "greaterThan" => Ok(OperatorKind::GreaterThan),
            "between" => Ok(OperatorKind::Between),
            other => Err(PlannerError::UnsupportedOperator {
                attribute: None,
                operator: other.to_string(),
                reason: "supported operators are eq, gt and between".into(),
            }),
        }
    }
}

/// A single condition on one attribute
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Condition {
    pub attribute: Attribute,
    pub op: Operator,
}

impl Condition {
    pub fn eq(attribute: Attribute, value: impl Into<AttributeValue>) -> Self {
        Self {
            attribute,
            op: Operator::Equals(value.into()),
        }
    }

    pub fn gt(attribute: Attribute, value: impl Into<AttributeValue>) -> Self {
        Self {
            attribute,
            op: Operator::GreaterThan(value.into()),
        }
    }

    pub fn between(
        attribute: Attribute,
        lower: impl Into<AttributeValue>,
        upper: impl Into<AttributeValue>,
    ) -> Self {
        Self {
            attribute,
            op: Operator::Between(lower.into(), upper.into()),
        }
    }

    pub fn is_equality(&self) -> bool {
        matches!(self.op, Operator::Equals(_))
    }

    /// Evaluates the condition against an order.
    ///
    /// A missing attribute or a value of the wrong kind never matches.
    pub fn matches(&self, order: &Order) -> bool {
        let Some(actual) = order.attribute(self.attribute) else {
            return false;
        };

        match &self.op {
            Operator::Equals(expected) => actual.compare(expected).is_some_and(|o| o.is_eq()),
            Operator::GreaterThan(bound) => actual.compare(bound).is_some_and(|o| o.is_gt()),
            Operator::Between(lower, upper) => {
                actual.compare(lower).is_some_and(|o| o.is_ge())
                    && actual.compare(upper).is_some_and(|o| o.is_le())
            }
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.op {
            Operator::Equals(v) => write!(f, "{} = {}", self.attribute, v),
            Operator::GreaterThan(v) => write!(f, "{} > {}", self.attribute, v),
            Operator::Between(lo, hi) => {
                write!(f, "{} BETWEEN {} AND {}", self.attribute, lo, hi)
            }
        }
    }
}

/// The shape of a request, before an access path is chosen.
///
/// Every shape carries post-fetch filters; they narrow the result without
/// changing the access path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryIntent {
    /// Equality on a partition attribute, optionally narrowed by a condition
    /// on a sort or secondary attribute
    Lookup {
        partition: Condition,
        sort: Option<Condition>,
        filters: Vec<Condition>,
    },
    /// Partition equality plus an inclusive range on a sort-ordered
    /// attribute
    Range {
        partition: Condition,
        range: Condition,
        filters: Vec<Condition>,
    },
    /// Full scan filtered on one attribute
    Scan {
        filter: Condition,
        filters: Vec<Condition>,
    },
}

impl QueryIntent {
    pub fn lookup(partition: Condition) -> Self {
        QueryIntent::Lookup {
            partition,
            sort: None,
            filters: Vec::new(),
        }
    }

    pub fn lookup_with(partition: Condition, sort: Condition) -> Self {
        QueryIntent::Lookup {
            partition,
            sort: Some(sort),
            filters: Vec::new(),
        }
    }

    pub fn range(partition: Condition, range: Condition) -> Self {
        QueryIntent::Range {
            partition,
            range,
            filters: Vec::new(),
        }
    }

    pub fn scan(filter: Condition) -> Self {
        QueryIntent::Scan {
            filter,
            filters: Vec::new(),
        }
    }

    /// Adds a post-fetch filter
    pub fn with_filter(mut self, filter: Condition) -> Self {
        self.filters_mut().push(filter);
        self
    }

    /// Post-fetch filters added with [`with_filter`](Self::with_filter)
    pub fn filters(&self) -> &[Condition] {
        match self {
            QueryIntent::Lookup { filters, .. }
            | QueryIntent::Range { filters, .. }
            | QueryIntent::Scan { filters, .. } => filters,
        }
    }

    fn filters_mut(&mut self) -> &mut Vec<Condition> {
        match self {
            QueryIntent::Lookup { filters, .. }
            | QueryIntent::Range { filters, .. }
            | QueryIntent::Scan { filters, .. } => filters,
        }
    }
}
