//! Post-fetch condition filtering
//!
//! AND semantics over typed conditions. An item that lacks an attribute, or
//! whose value is of a different kind than the condition's, never matches.

use crate::model::Order;
use crate::planner::Condition;

/// Evaluates conditions against orders
pub struct ConditionFilter;

impl ConditionFilter {
    /// Checks if an order matches all conditions
    pub fn matches(order: &Order, conditions: &[Condition]) -> bool {
        conditions.iter().all(|condition| condition.matches(order))
    }

    /// Drops orders that fail any condition, keeping input order
    pub fn retain(orders: &mut Vec<Order>, conditions: &[Condition]) {
        if conditions.is_empty() {
            return;
        }
        orders.retain(|order| Self::matches(order, conditions));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Attribute;
    use rust_decimal::Decimal;

    fn order(country: &str, price: i64) -> Order {
        Order::new("s1", format!("2020-01-01T00:00:00Z#{}", country))
            .with_country(country)
            .with_total_price(Decimal::from(price))
    }

    #[test]
    fn test_empty_conditions_match() {
        assert!(ConditionFilter::matches(&order("US", 1), &[]));
    }

    #[test]
    fn test_and_semantics() {
        let conditions = [
            Condition::eq(Attribute::Country, "US"),
            Condition::gt(Attribute::TotalPrice, Decimal::from(5)),
        ];
        assert!(ConditionFilter::matches(&order("US", 6), &conditions));
        assert!(!ConditionFilter::matches(&order("US", 5), &conditions));
        assert!(!ConditionFilter::matches(&order("FR", 6), &conditions));
    }

    #[test]
    fn test_kind_mismatch_never_matches() {
        let conditions = [Condition::eq(Attribute::TotalPrice, "6")];
        assert!(!ConditionFilter::matches(&order("US", 6), &conditions));
    }

    #[test]
    fn test_retain_keeps_order() {
        let mut orders = vec![order("US", 1), order("FR", 2), order("US", 3)];
        ConditionFilter::retain(&mut orders, &[Condition::eq(Attribute::Country, "US")]);
        let prices: Vec<Decimal> = orders.iter().map(|o| o.total_price).collect();
        assert_eq!(prices, vec![Decimal::from(1), Decimal::from(3)]);
    }
}
