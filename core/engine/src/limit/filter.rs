//! FILENAME: core/engine/src/limit/filter.rs
//! PURPOSE: Filters and the FilterSet (unique by property).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filter {
    pub property: String,
    pub value: String,
}

impl Filter {
    pub fn new(property: impl Into<String>, value: impl Into<String>) -> Self {
        Filter {
            property: property.into(),
            value: value.into(),
        }
    }
}

/// Filters keyed by property. Iteration follows insertion order, which keeps
/// the filter pass deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSet {
    filters: Vec<Filter>,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// True if there are any columns that need to be filtered.
    pub fn is_filtered(&self) -> bool {
        !self.filters.is_empty()
    }

    /// Adds a filter, replacing the value of an existing filter on the same
    /// property.
    pub fn add_filter(&mut self, filter: Filter) {
        match self.filters.iter_mut().find(|f| f.property == filter.property) {
            Some(existing) => existing.value = filter.value,
            None => self.filters.push(filter),
        }
    }

    pub fn remove_filter(&mut self, property: &str) -> Option<Filter> {
        let index = self.filters.iter().position(|f| f.property == property)?;
        Some(self.filters.remove(index))
    }

    pub fn get_filter(&self, property: &str) -> Option<&Filter> {
        self.filters.iter().find(|f| f.property == property)
    }

    pub fn get_filter_value(&self, property: &str) -> Option<&str> {
        self.get_filter(property).map(|f| f.value.as_str())
    }

    pub fn filters(&self) -> &[Filter] {
        &self.filters
    }

    pub fn clear(&mut self) {
        self.filters.clear();
    }
}
