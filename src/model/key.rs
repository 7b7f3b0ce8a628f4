//! Primary key values

use std::fmt;

use super::attribute::AttributeValue;

/// Value of a table or index key: the partition value and, for composite
/// keys, the sort value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PrimaryKey {
    pub partition: AttributeValue,
    pub sort: Option<AttributeValue>,
}

impl PrimaryKey {
    /// Key of a hash-only table
    pub fn hash(partition: impl Into<AttributeValue>) -> Self {
        Self {
            partition: partition.into(),
            sort: None,
        }
    }

    /// Key of a hash + range table
    pub fn composite(partition: impl Into<AttributeValue>, sort: impl Into<AttributeValue>) -> Self {
        Self {
            partition: partition.into(),
            sort: Some(sort.into()),
        }
    }
}

impl fmt::Display for PrimaryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.sort {
            Some(sort) => write!(f, "({}, {})", self.partition, sort),
            None => write!(f, "({})", self.partition),
        }
    }
}
