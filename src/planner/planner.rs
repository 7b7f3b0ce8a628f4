//! Access planner
//!
//! Chooses the table or index that serves an intent and splits its
//! conditions into key conditions (sent to the store) and filter conditions
//! (applied after the fetch).
//!
//! Target selection, in order:
//! 1. Targets whose partition key is the intent's partition attribute,
//!    table first, then indexes in catalog order
//! 2. Among those, the first whose sort key is the intent's sort attribute
//! 3. Otherwise the first of those, with the sort condition demoted to a filter
//! 4. No target partitioned on the attribute: filtered full scan
//!
//! Every condition is checked before a target is chosen: operands must
//! have the attribute's kind, so a plan never carries a condition that
//! cannot match.

use crate::model::{Attribute, AttributeValue, PrimaryKey};
use crate::observability::{log_event_with_fields, Event, MetricsRegistry};
use crate::schema::{KeySchema, TableSchema, Target};

use super::ast::{Condition, Operator, QueryIntent};
use super::errors::{PlannerError, PlannerResult};

/// How a plan reaches the data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessPath {
    /// Point lookup on the table's full primary key
    Get,
    /// Key-condition query on the table or an index
    Query,
    /// Full-table scan with filter conditions
    Scan,
}

impl AccessPath {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccessPath::Get => "GET",
            AccessPath::Query => "QUERY",
            AccessPath::Scan => "SCAN",
        }
    }
}

/// Immutable access plan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plan {
    pub target: Target,
    /// Partition equality first, then the optional sort condition
    pub key_conditions: Vec<Condition>,
    /// Evaluated after the fetch
    pub filter_conditions: Vec<Condition>,
    pub access: AccessPath,
}

impl Plan {
    fn scan(filter_conditions: Vec<Condition>) -> Self {
        Self {
            target: Target::Table,
            key_conditions: Vec::new(),
            filter_conditions,
            access: AccessPath::Scan,
        }
    }

    /// Returns true if the plan only filters
    pub fn is_scan(&self) -> bool {
        self.access == AccessPath::Scan
    }
}

/// Planner parameterized by a table catalog
pub struct AccessPlanner<'a> {
    schema: &'a TableSchema,
    metrics: Option<&'a MetricsRegistry>,
}

impl<'a> AccessPlanner<'a> {
    pub fn new(schema: &'a TableSchema) -> Self {
        Self {
            schema,
            metrics: None,
        }
    }

    /// Records plan counters on `metrics`
    pub fn with_metrics(mut self, metrics: &'a MetricsRegistry) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn schema(&self) -> &TableSchema {
        self.schema
    }

    /// Plans an intent. Same intent and catalog always give the same plan.
    pub fn plan(&self, intent: &QueryIntent) -> PlannerResult<Plan> {
        let result = self.plan_inner(intent);
        match &result {
            Ok(plan) => {
                if let Some(m) = self.metrics {
                    m.increment_plans_built();
                }
                let target = plan.target.to_string();
                let keys = plan.key_conditions.len().to_string();
                let filters = plan.filter_conditions.len().to_string();
                log_event_with_fields(
                    Event::QueryPlanned,
                    &[
                        ("access", plan.access.as_str()),
                        ("filters", filters.as_str()),
                        ("key_conditions", keys.as_str()),
                        ("target", target.as_str()),
                    ],
                );
            }
            Err(err) => {
                if let Some(m) = self.metrics {
                    m.increment_plans_rejected();
                }
                let reason = err.to_string();
                log_event_with_fields(
                    Event::QueryRejected,
                    &[("code", err.code()), ("reason", reason.as_str())],
                );
            }
        }
        result
    }

    fn plan_inner(&self, intent: &QueryIntent) -> PlannerResult<Plan> {
        match intent {
            QueryIntent::Lookup {
                partition,
                sort,
                filters,
            } => {
                require_partition_equality(partition)?;
                validate_all(std::iter::once(partition).chain(sort).chain(filters))?;
                Ok(self.keyed_plan(partition, sort.as_ref(), filters))
            }
            QueryIntent::Range {
                partition,
                range,
                filters,
            } => {
                require_partition_equality(partition)?;
                if !matches!(range.op, Operator::Between(_, _)) {
                    return Err(PlannerError::unsupported(
                        range.attribute,
                        range.op.kind().as_str(),
                        "range queries take an inclusive between bound",
                    ));
                }
                validate_all([partition, range].into_iter().chain(filters))?;
                Ok(self.keyed_plan(partition, Some(range), filters))
            }
            // Key attributes are accepted too: a local index cannot serve a
            // condition without its partition equality, so a scan is the
            // only path for e.g. a price threshold across sellers.
            QueryIntent::Scan { filter, filters } => {
                let all: Vec<Condition> = std::iter::once(filter)
                    .chain(filters)
                    .cloned()
                    .collect();
                if let Some(between) = all
                    .iter()
                    .find(|c| matches!(c.op, Operator::Between(_, _)))
                {
                    return Err(PlannerError::unsupported(
                        between.attribute,
                        "between",
                        "attribute scans support eq and gt",
                    ));
                }
                validate_all(&all)?;
                Ok(Plan::scan(all))
            }
        }
    }

    fn keyed_plan(
        &self,
        partition: &Condition,
        sort: Option<&Condition>,
        filters: &[Condition],
    ) -> Plan {
        let Some((target, key)) = self.select_target(partition.attribute, sort.map(|c| c.attribute))
        else {
            log_event_with_fields(
                Event::ScanFallback,
                &[("partition", partition.attribute.as_str())],
            );
            let mut all = vec![partition.clone()];
            all.extend(sort.cloned());
            all.extend_from_slice(filters);
            return Plan::scan(all);
        };

        let mut key_conditions = vec![partition.clone()];
        let mut filter_conditions = Vec::with_capacity(filters.len() + 1);
        if let Some(sort) = sort {
            if key.sort == Some(sort.attribute) {
                key_conditions.push(sort.clone());
            } else {
                filter_conditions.push(sort.clone());
            }
        }
        filter_conditions.extend_from_slice(filters);

        let access = if target.is_table() && covers_full_key(key, &key_conditions) {
            AccessPath::Get
        } else {
            AccessPath::Query
        };

        Plan {
            target,
            key_conditions,
            filter_conditions,
            access,
        }
    }

    fn select_target(
        &self,
        partition: Attribute,
        sort: Option<Attribute>,
    ) -> Option<(Target, &'a KeySchema)> {
        let mut fallback = None;
        for (target, key) in self.schema.targets() {
            if key.partition != partition {
                continue;
            }
            if sort.is_some() && key.sort == sort {
                return Some((target, key));
            }
            if fallback.is_none() {
                fallback = Some((target, key));
            }
        }
        fallback
    }

    /// Resolves equality conditions into the table's primary key, for point
    /// reads and deletes.
    pub fn primary_key(&self, conditions: &[Condition]) -> PlannerResult<PrimaryKey> {
        let key = &self.schema.key;
        for condition in conditions {
            if !key.contains(condition.attribute) {
                return Err(PlannerError::InvalidCondition(format!(
                    "'{}' is not part of the primary key of {}",
                    condition.attribute, self.schema.name
                )));
            }
            if !condition.is_equality() {
                return Err(PlannerError::unsupported(
                    condition.attribute,
                    condition.op.kind().as_str(),
                    "primary key lookups accept eq only",
                ));
            }
        }

        let value_of = |attr: Attribute| {
            conditions
                .iter()
                .find(|c| c.attribute == attr)
                .and_then(|c| match &c.op {
                    Operator::Equals(v) => Some(v.clone()),
                    _ => None,
                })
                .ok_or_else(|| {
                    PlannerError::InvalidCondition(format!("missing primary key part '{}'", attr))
                })
        };

        let expected_parts = if key.sort.is_some() { 2 } else { 1 };
        if conditions.len() != expected_parts {
            return Err(PlannerError::InvalidCondition(format!(
                "primary key of {} has {} part(s), got {} condition(s)",
                self.schema.name,
                expected_parts,
                conditions.len()
            )));
        }

        Ok(PrimaryKey {
            partition: value_of(key.partition)?,
            sort: key.sort.map(value_of).transpose()?,
        })
    }
}

fn require_partition_equality(partition: &Condition) -> PlannerResult<()> {
    if partition.is_equality() {
        Ok(())
    } else {
        Err(PlannerError::unsupported(
            partition.attribute,
            partition.op.kind().as_str(),
            "partition keys accept eq only",
        ))
    }
}

fn validate_all<'c>(conditions: impl IntoIterator<Item = &'c Condition>) -> PlannerResult<()> {
    conditions.into_iter().try_for_each(validate_condition)
}

/// Operands must have the attribute's kind and `between` bounds must be
/// ordered; otherwise the condition could never match.
fn validate_condition(condition: &Condition) -> PlannerResult<()> {
    let operands: Vec<&AttributeValue> = match &condition.op {
        Operator::Equals(value) | Operator::GreaterThan(value) => vec![value],
        Operator::Between(lower, upper) => vec![lower, upper],
    };
    let numeric = condition.attribute.is_numeric();
    if let Some(value) = operands
        .iter()
        .find(|v| matches!(v, AttributeValue::Number(_)) != numeric)
    {
        return Err(PlannerError::InvalidCondition(format!(
            "'{}' takes a {} value, got {}",
            condition.attribute,
            if numeric { "numeric" } else { "string" },
            value
        )));
    }

    if let Operator::Between(lower, upper) = &condition.op {
        if lower.compare(upper).is_some_and(|ord| ord.is_gt()) {
            return Err(PlannerError::InvalidCondition(format!(
                "lower bound of '{}' exceeds upper bound",
                condition.attribute
            )));
        }
    }
    Ok(())
}

fn covers_full_key(key: &KeySchema, key_conditions: &[Condition]) -> bool {
    let all_eq = key_conditions.iter().all(Condition::is_equality);
    let has_sort = match key.sort {
        Some(sort) => key_conditions.iter().any(|c| c.attribute == sort),
        None => true,
    };
    all_eq && has_sort
}
