//! Catalog validation
//!
//! Checks a catalog loaded from configuration before the planner relies on it:
//! - index names are unique
//! - no key uses one attribute for both partition and sort
//! - local indexes share the table's partition key and need a composite
//!   table key

use std::collections::HashSet;

use super::errors::{SchemaError, SchemaResult};
use super::types::{IndexKind, TableSchema};

/// Validates table catalogs
pub struct SchemaValidator;

impl SchemaValidator {
    /// Validates `schema`, returning the first problem found
    pub fn validate(schema: &TableSchema) -> SchemaResult<()> {
        if schema.name.trim().is_empty() {
            return Err(SchemaError::EmptyTableName);
        }

        if schema.key.sort == Some(schema.key.partition) {
            return Err(SchemaError::DegenerateKey(schema.name.clone()));
        }

        let mut seen = HashSet::new();
        for index in &schema.indexes {
            if !seen.insert(index.name.as_str()) {
                return Err(SchemaError::DuplicateIndex(index.name.clone()));
            }

            if index.key.sort == Some(index.key.partition) {
                return Err(SchemaError::DegenerateKey(index.name.clone()));
            }

            if index.kind == IndexKind::Local {
                if schema.key.sort.is_none() {
                    return Err(SchemaError::LocalIndexWithoutSortKey(index.name.clone()));
                }
                if index.key.partition != schema.key.partition {
                    return Err(SchemaError::LocalIndexPartition {
                        index: index.name.clone(),
                        expected: schema.key.partition.to_string(),
                    });
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Attribute;
    use crate::schema::{IndexSchema, KeySchema};

    #[test]
    fn test_builtin_schemas_valid() {
        assert!(SchemaValidator::validate(&TableSchema::orders()).is_ok());
        assert!(SchemaValidator::validate(&TableSchema::orders_by_order_id()).is_ok());
    }

    #[test]
    fn test_duplicate_index_rejected() {
        let mut schema = TableSchema::orders();
        schema.indexes.push(IndexSchema::local(
            "CustomerID_Index",
            Attribute::SellerId,
            Attribute::Country,
        ));

        assert_eq!(
            SchemaValidator::validate(&schema),
            Err(SchemaError::DuplicateIndex("CustomerID_Index".into()))
        );
    }

    #[test]
    fn test_local_index_must_share_partition() {
        let mut schema = TableSchema::orders();
        schema.indexes.push(IndexSchema::local(
            "Country_Index",
            Attribute::ProductId,
            Attribute::Country,
        ));

        let err = SchemaValidator::validate(&schema).unwrap_err();
        assert_eq!(err.code(), "ORDERS_SCHEMA_LOCAL_INDEX_PARTITION");
    }

    #[test]
    fn test_local_index_needs_composite_table() {
        let mut schema = TableSchema::orders_by_order_id();
        schema.indexes.push(IndexSchema::local(
            "Country_Index",
            Attribute::OrderId,
            Attribute::Country,
        ));

        assert_eq!(
            SchemaValidator::validate(&schema),
            Err(SchemaError::LocalIndexWithoutSortKey("Country_Index".into()))
        );
    }

    #[test]
    fn test_degenerate_key_rejected() {
        let schema = TableSchema {
            name: "Orders".into(),
            key: KeySchema::composite(Attribute::SellerId, Attribute::SellerId),
            indexes: vec![],
        };
        assert!(matches!(
            SchemaValidator::validate(&schema),
            Err(SchemaError::DegenerateKey(_))
        ));
    }
}
