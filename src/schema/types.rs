//! Catalog types

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model::{Attribute, Order, PrimaryKey};

/// Key layout of a table or index
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeySchema {
    /// Hash key; supports equality only
    pub partition: Attribute,
    /// Range key, if the key is composite
    #[serde(default)]
    pub sort: Option<Attribute>,
}

impl KeySchema {
    pub fn hash(partition: Attribute) -> Self {
        Self {
            partition,
            sort: None,
        }
    }

    pub fn composite(partition: Attribute, sort: Attribute) -> Self {
        Self {
            partition,
            sort: Some(sort),
        }
    }

    /// Returns true if `attribute` is part of this key
    pub fn contains(&self, attribute: Attribute) -> bool {
        self.partition == attribute || self.sort == Some(attribute)
    }

    /// Extracts this key from an order.
    ///
    /// Returns `None` when the order lacks a key attribute, which keeps it
    /// out of sparse indexes.
    pub fn key_of(&self, order: &Order) -> Option<PrimaryKey> {
        let partition = order.attribute(self.partition)?;
        let sort = match self.sort {
            Some(attr) => Some(order.attribute(attr)?),
            None => None,
        };
        Some(PrimaryKey { partition, sort })
    }
}

/// Secondary index flavour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexKind {
    /// Shares the table's partition key, alternate sort key
    Local,
    /// Independent partition key
    Global,
}

/// A named secondary index
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexSchema {
    pub name: String,
    pub kind: IndexKind,
    pub key: KeySchema,
}

impl IndexSchema {
    pub fn local(name: impl Into<String>, partition: Attribute, sort: Attribute) -> Self {
        Self {
            name: name.into(),
            kind: IndexKind::Local,
            key: KeySchema::composite(partition, sort),
        }
    }

    pub fn global(name: impl Into<String>, key: KeySchema) -> Self {
        Self {
            name: name.into(),
            kind: IndexKind::Global,
            key,
        }
    }
}

/// Where a request is sent: the base table or one of its indexes
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Target {
    Table,
    Index(String),
}

impl Target {
    pub fn index(name: impl Into<String>) -> Self {
        Target::Index(name.into())
    }

    pub fn is_table(&self) -> bool {
        matches!(self, Target::Table)
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Table => f.write_str("<table>"),
            Target::Index(name) => f.write_str(name),
        }
    }
}

/// Table catalog: name, primary key and secondary indexes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSchema {
    pub name: String,
    pub key: KeySchema,
    #[serde(default)]
    pub indexes: Vec<IndexSchema>,
}

impl TableSchema {
    /// Seller-keyed layout with local secondary indexes
    pub fn orders() -> Self {
        Self {
            name: "Orders".to_string(),
            key: KeySchema::composite(Attribute::SellerId, Attribute::OrderTimeRand),
            indexes: vec![
                IndexSchema::local("CustomerID_Index", Attribute::SellerId, Attribute::CustomerId),
                IndexSchema::local("ProductID_Index", Attribute::SellerId, Attribute::ProductId),
                IndexSchema::local("Total_Price_Index", Attribute::SellerId, Attribute::TotalPrice),
            ],
        }
    }

    /// order_id-keyed layout with global secondary indexes
    pub fn orders_by_order_id() -> Self {
        Self {
            name: "Orders".to_string(),
            key: KeySchema::hash(Attribute::OrderId),
            indexes: vec![
                IndexSchema::global("CustomerID_Index", KeySchema::hash(Attribute::CustomerId)),
                IndexSchema::global(
                    "ProductID_OrderTime_Index",
                    KeySchema::composite(Attribute::ProductId, Attribute::OrderTimeRand),
                ),
            ],
        }
    }

    /// Looks up an index by name
    pub fn index(&self, name: &str) -> Option<&IndexSchema> {
        self.indexes.iter().find(|idx| idx.name == name)
    }

    /// Key layout of a target, or `None` for an unknown index
    pub fn key_for(&self, target: &Target) -> Option<&KeySchema> {
        match target {
            Target::Table => Some(&self.key),
            Target::Index(name) => self.index(name).map(|idx| &idx.key),
        }
    }

    /// Every target in planning order: the table first, then indexes as
    /// declared
    pub fn targets(&self) -> impl Iterator<Item = (Target, &KeySchema)> {
        std::iter::once((Target::Table, &self.key)).chain(
            self.indexes
                .iter()
                .map(|idx| (Target::Index(idx.name.clone()), &idx.key)),
        )
    }
}

impl Default for TableSchema {
    fn default() -> Self {
        Self::orders()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_key_of_composite() {
        let order = Order::new("s1", "2020-01-18T00:00:00Z#a").with_customer("c1");
        let key = TableSchema::orders().key.key_of(&order).unwrap();
        assert_eq!(key, PrimaryKey::composite("s1", "2020-01-18T00:00:00Z#a"));
    }

    #[test]
    fn test_sparse_key_missing_order_id() {
        let order = Order::new("s1", "t");
        assert!(TableSchema::orders_by_order_id().key.key_of(&order).is_none());
    }

    #[test]
    fn test_targets_table_first() {
        let schema = TableSchema::orders();
        let targets: Vec<Target> = schema.targets().map(|(t, _)| t).collect();
        assert_eq!(targets[0], Target::Table);
        assert_eq!(targets[1], Target::index("CustomerID_Index"));
        assert_eq!(targets.len(), 4);
    }

    #[test]
    fn test_schema_from_json() {
        let schema: TableSchema = serde_json::from_value(json!({
            "name": "Orders",
            "key": { "partition": "order_id" },
            "indexes": [
                {
                    "name": "CustomerID_Index",
                    "kind": "global",
                    "key": { "partition": "customer_id" }
                }
            ]
        }))
        .unwrap();

        assert_eq!(schema.key, KeySchema::hash(Attribute::OrderId));
        assert_eq!(
            schema.key_for(&Target::index("CustomerID_Index")),
            Some(&KeySchema::hash(Attribute::CustomerId))
        );
        assert_eq!(schema.key_for(&Target::index("missing")), None);
    }
}
