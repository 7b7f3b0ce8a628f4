//! Typed attribute names and values
//!
//! Attribute values follow the store's two scalar kinds: strings and numbers.
//! Integers such as `product_quantity` are carried as decimals so that every
//! numeric comparison goes through one path.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::errors::{ModelError, ModelResult};

/// Attributes of an order item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Attribute {
    OrderId,
    SellerId,
    OrderTimeRand,
    CustomerId,
    ProductId,
    TotalPrice,
    ProductQuantity,
    Tax,
    Country,
}

impl Attribute {
    /// Every attribute, in declaration order
    pub const ALL: [Attribute; 9] = [
        Attribute::OrderId,
        Attribute::SellerId,
        Attribute::OrderTimeRand,
        Attribute::CustomerId,
        Attribute::ProductId,
        Attribute::TotalPrice,
        Attribute::ProductQuantity,
        Attribute::Tax,
        Attribute::Country,
    ];

    /// Returns the wire name of the attribute
    pub fn as_str(&self) -> &'static str {
        match self {
            Attribute::OrderId => "order_id",
            Attribute::SellerId => "seller_id",
            Attribute::OrderTimeRand => "order_time_rand",
            Attribute::CustomerId => "customer_id",
            Attribute::ProductId => "product_id",
            Attribute::TotalPrice => "total_price",
            Attribute::ProductQuantity => "product_quantity",
            Attribute::Tax => "tax",
            Attribute::Country => "country",
        }
    }

    /// Returns true for attributes stored as numbers
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            Attribute::TotalPrice | Attribute::ProductQuantity | Attribute::Tax
        )
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Attribute {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Attribute::ALL
            .iter()
            .copied()
            .find(|attr| attr.as_str() == s)
            .ok_or_else(|| ModelError::UnknownAttribute(s.to_string()))
    }
}

/// A scalar attribute value
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AttributeValue {
    String(String),
    Number(Decimal),
}

impl AttributeValue {
    /// Compares two values of the same kind.
    ///
    /// Values of different kinds are incomparable and yield `None`, which
    /// makes every condition over them evaluate to false.
    pub fn compare(&self, other: &AttributeValue) -> Option<Ordering> {
        match (self, other) {
            (AttributeValue::String(a), AttributeValue::String(b)) => Some(a.cmp(b)),
            (AttributeValue::Number(a), AttributeValue::Number(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }

    /// Returns the string payload, if any
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttributeValue::String(s) => Some(s),
            AttributeValue::Number(_) => None,
        }
    }

    /// Converts a JSON value into the kind expected by `attribute`.
    ///
    /// Numeric attributes accept JSON numbers and numeric strings; string
    /// attributes accept JSON strings only.
    pub fn from_json(attribute: Attribute, value: &Value) -> ModelResult<Self> {
        let mismatch = || ModelError::TypeMismatch {
            attribute: attribute.as_str().to_string(),
            expected: if attribute.is_numeric() { "number" } else { "string" },
        };

        if attribute.is_numeric() {
            let text = match value {
                Value::Number(n) => n.to_string(),
                Value::String(s) => s.clone(),
                _ => return Err(mismatch()),
            };
            Decimal::from_str(&text)
                .or_else(|_| Decimal::from_scientific(&text))
                .map(AttributeValue::Number)
                .map_err(|_| mismatch())
        } else {
            match value {
                Value::String(s) => Ok(AttributeValue::String(s.clone())),
                _ => Err(mismatch()),
            }
        }
    }

    /// Renders the value as JSON
    pub fn to_json(&self) -> Value {
        match self {
            AttributeValue::String(s) => Value::String(s.clone()),
            AttributeValue::Number(d) => serde_json::Number::from_str(&d.normalize().to_string())
                .map(Value::Number)
                .unwrap_or_else(|_| Value::String(d.to_string())),
        }
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::String(s) => write!(f, "{:?}", s),
            AttributeValue::Number(d) => write!(f, "{}", d),
        }
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        AttributeValue::String(value.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        AttributeValue::String(value)
    }
}

impl From<Decimal> for AttributeValue {
    fn from(value: Decimal) -> Self {
        AttributeValue::Number(value)
    }
}

impl From<u64> for AttributeValue {
    fn from(value: u64) -> Self {
        AttributeValue::Number(Decimal::from(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_attribute_names_round_trip() {
        for attr in Attribute::ALL {
            assert_eq!(attr.as_str().parse::<Attribute>().unwrap(), attr);
        }
        assert_eq!(
            "shipping".parse::<Attribute>(),
            Err(ModelError::UnknownAttribute("shipping".into()))
        );
    }

    #[test]
    fn test_numeric_from_json() {
        let v = AttributeValue::from_json(Attribute::TotalPrice, &json!(5.2)).unwrap();
        assert_eq!(v, AttributeValue::Number(Decimal::new(52, 1)));

        let v = AttributeValue::from_json(Attribute::ProductQuantity, &json!("7")).unwrap();
        assert_eq!(v, AttributeValue::from(7u64));

        assert!(AttributeValue::from_json(Attribute::Tax, &json!(true)).is_err());
    }

    #[test]
    fn test_string_from_json_rejects_numbers() {
        let err = AttributeValue::from_json(Attribute::Country, &json!(1)).unwrap_err();
        assert!(matches!(err, ModelError::TypeMismatch { expected: "string", .. }));
    }

    #[test]
    fn test_mixed_kinds_incomparable() {
        let s = AttributeValue::from("10");
        let n = AttributeValue::from(10u64);
        assert_eq!(s.compare(&n), None);
        assert_eq!(n.compare(&AttributeValue::from(3u64)), Some(Ordering::Greater));
    }

    #[test]
    fn test_number_to_json() {
        let v = AttributeValue::Number(Decimal::new(520, 2));
        assert_eq!(v.to_json(), json!(5.2));
    }
}
