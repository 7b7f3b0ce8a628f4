//! Top-K countries by purchased quantity
//!
//! One pass sums `product_quantity` per country. When there are more than K
//! countries, a min-heap keeps the K largest distinct sums: a new sum enters
//! while the heap has room, otherwise it replaces the minimum only when
//! strictly greater. Countries are then grouped under the retained sums, so
//! ties at the boundary never split a group.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap, HashSet};

use crate::model::Order;
use crate::observability::{log_event_with_fields, Event, MetricsRegistry};

use super::result::{CountryGroup, TopCountries};

/// Default number of quantities retained
pub const DEFAULT_TOP_K: usize = 3;

/// Streaming top-K reducer over orders
#[derive(Debug, Clone, Copy)]
pub struct TopKAggregator<'a> {
    k: usize,
    metrics: Option<&'a MetricsRegistry>,
}

impl Default for TopKAggregator<'_> {
    fn default() -> Self {
        Self::new(DEFAULT_TOP_K)
    }
}

impl<'a> TopKAggregator<'a> {
    pub fn new(k: usize) -> Self {
        Self { k, metrics: None }
    }

    pub fn with_metrics(mut self, metrics: &'a MetricsRegistry) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Reduces `orders` to the K largest per-country quantity sums
    pub fn aggregate<'o, I>(&self, orders: I) -> TopCountries
    where
        I: IntoIterator<Item = &'o Order>,
    {
        let mut records = 0usize;
        let mut totals: Vec<(&'o str, u64)> = Vec::new();
        let mut positions: HashMap<&'o str, usize> = HashMap::new();

        for order in orders {
            records += 1;
            let country = order.country.as_str();
            match positions.get(country) {
                Some(&i) => totals[i].1 = totals[i].1.saturating_add(order.product_quantity),
                None => {
                    positions.insert(country, totals.len());
                    totals.push((country, order.product_quantity));
                }
            }
        }

        let result = if self.k == 0 || totals.is_empty() {
            TopCountries::empty()
        } else if totals.len() <= self.k {
            group(&totals, totals.iter().map(|&(_, q)| q).collect())
        } else {
            group(&totals, self.retained_quantities(&totals))
        };

        if let Some(m) = self.metrics {
            m.increment_aggregations();
        }
        let k = self.k.to_string();
        let records = records.to_string();
        let countries = totals.len().to_string();
        let groups = result.len().to_string();
        log_event_with_fields(
            Event::AggregationComplete,
            &[
                ("countries", countries.as_str()),
                ("groups", groups.as_str()),
                ("k", k.as_str()),
                ("records", records.as_str()),
            ],
        );

        result
    }

    /// Bounded min-heap over distinct quantities
    fn retained_quantities(&self, totals: &[(&str, u64)]) -> HashSet<u64> {
        let mut heap = BinaryHeap::<Reverse<u64>>::with_capacity(self.k + 1);
        let mut seen = HashSet::new();

        for &(_, quantity) in totals {
            if !seen.insert(quantity) {
                continue;
            }
            if heap.len() < self.k {
                heap.push(Reverse(quantity));
                continue;
            }
            if let Some(&Reverse(smallest)) = heap.peek() {
                if quantity > smallest {
                    heap.pop();
                    heap.push(Reverse(quantity));
                }
            }
        }

        heap.into_iter().map(|Reverse(q)| q).collect()
    }
}

/// Groups countries under each retained quantity, largest first
fn group(totals: &[(&str, u64)], retained: HashSet<u64>) -> TopCountries {
    let mut quantities: Vec<u64> = retained.into_iter().collect();
    quantities.sort_unstable_by(|a, b| b.cmp(a));

    let groups = quantities
        .into_iter()
        .map(|quantity| CountryGroup {
            quantity,
            countries: totals
                .iter()
                .filter(|&&(_, q)| q == quantity)
                .map(|&(country, _)| country.to_string())
                .collect(),
        })
        .collect();

    TopCountries::new(groups)
}
