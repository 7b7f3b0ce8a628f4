//! Top-K result types

use serde::Serialize;

/// Countries that share one summed quantity
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountryGroup {
    pub quantity: u64,
    /// In the order each country was first seen
    pub countries: Vec<String>,
}

/// Top countries by purchased quantity, largest quantity first
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TopCountries {
    groups: Vec<CountryGroup>,
}

impl TopCountries {
    pub(crate) fn new(groups: Vec<CountryGroup>) -> Self {
        Self { groups }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Number of distinct quantities
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CountryGroup> {
        self.groups.iter()
    }

    /// Retained quantities, descending
    pub fn quantities(&self) -> Vec<u64> {
        self.groups.iter().map(|g| g.quantity).collect()
    }

    /// Countries that summed to `quantity`
    pub fn countries(&self, quantity: u64) -> Option<&[String]> {
        self.groups
            .iter()
            .find(|g| g.quantity == quantity)
            .map(|g| g.countries.as_slice())
    }

    /// Total number of countries across all groups
    pub fn country_count(&self) -> usize {
        self.groups.iter().map(|g| g.countries.len()).sum()
    }
}
