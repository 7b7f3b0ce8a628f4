//! Result types for query execution

use crate::model::Order;

/// Result of running one plan to completion
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutionResult {
    /// Matching orders, pages concatenated in store order
    pub orders: Vec<Order>,
    /// Number of store requests issued
    pub pages_fetched: usize,
    /// Number of items the store returned before post-fetch filtering
    pub scanned_count: usize,
}

impl ExecutionResult {
    /// Creates an empty result
    pub fn empty() -> Self {
        Self::default()
    }

    /// Returns true if no orders matched
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// Returns the number of results
    pub fn len(&self) -> usize {
        self.orders.len()
    }

    /// Returns an iterator over the orders
    pub fn iter(&self) -> impl Iterator<Item = &Order> {
        self.orders.iter()
    }

    pub fn into_orders(self) -> Vec<Order> {
        self.orders
    }
}

impl IntoIterator for ExecutionResult {
    type Item = Order;
    type IntoIter = std::vec::IntoIter<Order>;

    fn into_iter(self) -> Self::IntoIter {
        self.orders.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_execution_result_empty() {
        let result = ExecutionResult::empty();
        assert!(result.is_empty());
        assert_eq!(result.len(), 0);
        assert_eq!(result.pages_fetched, 0);
    }

    #[test]
    fn test_into_orders() {
        let result = ExecutionResult {
            orders: vec![Order::new("s1", "t1"), Order::new("s1", "t2")],
            pages_fetched: 1,
            scanned_count: 2,
        };
        assert_eq!(result.iter().count(), 2);
        assert_eq!(result.into_orders()[1].order_time_rand, "t2");
    }
}
