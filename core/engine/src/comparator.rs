//! FILENAME: core/engine/src/comparator.rs
//! PURPOSE: Per-property comparator overrides for the sort pass.

use crate::value::Value;
use std::cmp::Ordering;
use std::collections::HashMap;

/// Orders two property values.
pub trait ValueComparator {
    fn compare(&self, a: &Value, b: &Value) -> Ordering;
}

impl<F> ValueComparator for F
where
    F: Fn(&Value, &Value) -> Ordering,
{
    fn compare(&self, a: &Value, b: &Value) -> Ordering {
        self(a, b)
    }
}

/// The natural ordering of `Value`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NaturalComparator;

impl ValueComparator for NaturalComparator {
    fn compare(&self, a: &Value, b: &Value) -> Ordering {
        a.compare(b)
    }
}

/// Orders text ignoring case; everything else falls back to natural order.
#[derive(Debug, Clone, Copy, Default)]
pub struct CaseInsensitiveComparator;

impl ValueComparator for CaseInsensitiveComparator {
    fn compare(&self, a: &Value, b: &Value) -> Ordering {
        match (a, b) {
            (Value::Text(x), Value::Text(y)) => x.to_lowercase().cmp(&y.to_lowercase()),
            _ => a.compare(b),
        }
    }
}

#[derive(Default)]
pub struct ComparatorRegistry {
    by_property: HashMap<String, Box<dyn ValueComparator>>,
}

impl ComparatorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_comparator(&mut self, property: impl Into<String>, comparator: impl ValueComparator + 'static) {
        self.by_property.insert(property.into(), Box::new(comparator));
    }

    /// The comparator for a property, or the natural ordering.
    pub fn get_comparator(&self, property: &str) -> &dyn ValueComparator {
        match self.by_property.get(property) {
            Some(c) => c.as_ref(),
            None => &NaturalComparator,
        }
    }
}
