//! Order record

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::attribute::{Attribute, AttributeValue};

/// One order item.
///
/// `(seller_id, order_time_rand)` identifies the item in the canonical table.
/// `order_id` is only present when the data was written for the
/// order_id-keyed table layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,
    pub seller_id: String,
    pub order_time_rand: String,
    pub customer_id: String,
    pub product_id: String,
    pub total_price: Decimal,
    pub product_quantity: u64,
    pub tax: Decimal,
    pub country: String,
}

impl Order {
    /// Creates an order with the given primary key and empty attributes
    pub fn new(seller_id: impl Into<String>, order_time_rand: impl Into<String>) -> Self {
        Self {
            order_id: None,
            seller_id: seller_id.into(),
            order_time_rand: order_time_rand.into(),
            customer_id: String::new(),
            product_id: String::new(),
            total_price: Decimal::ZERO,
            product_quantity: 0,
            tax: Decimal::ZERO,
            country: String::new(),
        }
    }

    pub fn with_order_id(mut self, order_id: impl Into<String>) -> Self {
        self.order_id = Some(order_id.into());
        self
    }

    pub fn with_customer(mut self, customer_id: impl Into<String>) -> Self {
        self.customer_id = customer_id.into();
        self
    }

    pub fn with_product(mut self, product_id: impl Into<String>) -> Self {
        self.product_id = product_id.into();
        self
    }

    pub fn with_quantity(mut self, product_quantity: u64) -> Self {
        self.product_quantity = product_quantity;
        self
    }

    pub fn with_total_price(mut self, total_price: Decimal) -> Self {
        self.total_price = total_price;
        self
    }

    pub fn with_tax(mut self, tax: Decimal) -> Self {
        self.tax = tax;
        self
    }

    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = country.into();
        self
    }

    /// Returns the value of `attribute`, or `None` when the item lacks it
    pub fn attribute(&self, attribute: Attribute) -> Option<AttributeValue> {
        let value = match attribute {
            Attribute::OrderId => return self.order_id.as_deref().map(AttributeValue::from),
            Attribute::SellerId => AttributeValue::from(self.seller_id.as_str()),
            Attribute::OrderTimeRand => AttributeValue::from(self.order_time_rand.as_str()),
            Attribute::CustomerId => AttributeValue::from(self.customer_id.as_str()),
            Attribute::ProductId => AttributeValue::from(self.product_id.as_str()),
            Attribute::TotalPrice => AttributeValue::Number(self.total_price),
            Attribute::ProductQuantity => AttributeValue::from(self.product_quantity),
            Attribute::Tax => AttributeValue::Number(self.tax),
            Attribute::Country => AttributeValue::from(self.country.as_str()),
        };
        Some(value)
    }
}
