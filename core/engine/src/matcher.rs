//! FILENAME: core/engine/src/matcher.rs
//! PURPOSE: Filter matching strategies and the registry that selects them.
//! CONTEXT: During the filter pass the engine asks the registry for a matcher
//! keyed by the runtime type of the item's value and the filtered property.
//! A property-specific registration wins over the type default.

use crate::value::{Value, ValueType, DEFAULT_DATE_PATTERN, DEFAULT_DATE_TIME_PATTERN};
use std::collections::HashMap;

// ============================================================================
// MATCHER TRAIT
// ============================================================================

/// Decides whether an item value satisfies the raw filter value.
pub trait FilterMatcher {
    fn evaluate(&self, item_value: &Value, filter_value: &str) -> bool;
}

impl<F> FilterMatcher for F
where
    F: Fn(&Value, &str) -> bool,
{
    fn evaluate(&self, item_value: &Value, filter_value: &str) -> bool {
        self(item_value, filter_value)
    }
}

// ============================================================================
// BUILT-IN MATCHERS
// ============================================================================

/// Case-insensitive "contains" on the display form of the value.
#[derive(Debug, Clone, Copy, Default)]
pub struct StringFilterMatcher;

impl FilterMatcher for StringFilterMatcher {
    fn evaluate(&self, item_value: &Value, filter_value: &str) -> bool {
        let item = item_value.to_string().to_lowercase();
        item.contains(&filter_value.trim().to_lowercase())
    }
}

/// Numeric equality. A filter value that is not a number matches nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NumberFilterMatcher;

impl FilterMatcher for NumberFilterMatcher {
    fn evaluate(&self, item_value: &Value, filter_value: &str) -> bool {
        match (item_value.as_f64(), filter_value.trim().parse::<f64>()) {
            (Some(item), Ok(filter)) => item == filter,
            _ => false,
        }
    }
}

/// Accepts true/false, yes/no and 1/0 in any case.
#[derive(Debug, Clone, Copy, Default)]
pub struct BooleanFilterMatcher;

impl BooleanFilterMatcher {
    pub fn parse(raw: &str) -> Option<bool> {
        match raw.trim().to_lowercase().as_str() {
            "true" | "yes" | "y" | "1" => Some(true),
            "false" | "no" | "n" | "0" => Some(false),
            _ => None,
        }
    }
}

impl FilterMatcher for BooleanFilterMatcher {
    fn evaluate(&self, item_value: &Value, filter_value: &str) -> bool {
        match (item_value, Self::parse(filter_value)) {
            (Value::Bool(item), Some(filter)) => *item == filter,
            _ => false,
        }
    }
}

/// Formats the date with a pattern, then matches like `StringFilterMatcher`.
#[derive(Debug, Clone)]
pub struct DateFilterMatcher {
    pattern: String,
}

impl DateFilterMatcher {
    /// `pattern` is a strftime-style format, e.g. `%m/%Y`.
    pub fn new(pattern: impl Into<String>) -> Self {
        DateFilterMatcher {
            pattern: pattern.into(),
        }
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }
}

impl FilterMatcher for DateFilterMatcher {
    fn evaluate(&self, item_value: &Value, filter_value: &str) -> bool {
        match item_value.format_date(&self.pattern) {
            Some(formatted) => formatted
                .to_lowercase()
                .contains(&filter_value.trim().to_lowercase()),
            None => false,
        }
    }
}

// ============================================================================
// REGISTRY
// ============================================================================

/// Registry key: a value type, optionally narrowed to a single property.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MatcherKey {
    pub value_type: ValueType,
    pub property: Option<String>,
}

impl MatcherKey {
    /// Default for every property whose value has this type.
    pub fn new(value_type: ValueType) -> Self {
        MatcherKey {
            value_type,
            property: None,
        }
    }

    /// Override for one property.
    pub fn for_property(value_type: ValueType, property: impl Into<String>) -> Self {
        MatcherKey {
            value_type,
            property: Some(property.into()),
        }
    }
}

pub struct MatcherRegistry {
    matchers: HashMap<MatcherKey, Box<dyn FilterMatcher>>,
}

impl MatcherRegistry {
    /// An empty registry. Every filtered type must be registered by hand.
    pub fn empty() -> Self {
        MatcherRegistry {
            matchers: HashMap::new(),
        }
    }

    /// A registry with a default matcher for every non-null value type.
    pub fn new() -> Self {
        Self::with_date_pattern(DEFAULT_DATE_PATTERN)
    }

    /// The defaults, with dates matched through `date_pattern`.
    pub fn with_date_pattern(date_pattern: &str) -> Self {
        let mut registry = Self::empty();
        registry.add_matcher(MatcherKey::new(ValueType::Text), StringFilterMatcher);
        registry.add_matcher(MatcherKey::new(ValueType::Int), NumberFilterMatcher);
        registry.add_matcher(MatcherKey::new(ValueType::Float), NumberFilterMatcher);
        registry.add_matcher(MatcherKey::new(ValueType::Bool), BooleanFilterMatcher);
        registry.add_matcher(
            MatcherKey::new(ValueType::Date),
            DateFilterMatcher::new(date_pattern),
        );
        registry.add_matcher(
            MatcherKey::new(ValueType::DateTime),
            DateFilterMatcher::new(DEFAULT_DATE_TIME_PATTERN),
        );
        registry
    }

    /// Registers a matcher, replacing any previous one under the same key.
    pub fn add_matcher(&mut self, key: MatcherKey, matcher: impl FilterMatcher + 'static) {
        self.matchers.insert(key, Box::new(matcher));
    }

    /// Moves every matcher of `other` in, replacing those under the same key.
    pub fn extend(&mut self, other: MatcherRegistry) {
        self.matchers.extend(other.matchers);
    }

    /// Looks up the matcher for a property value. Property overrides win.
    pub fn get_matcher(&self, value_type: ValueType, property: &str) -> Option<&dyn FilterMatcher> {
        let specific = MatcherKey::for_property(value_type, property);
        self.matchers
            .get(&specific)
            .or_else(|| self.matchers.get(&MatcherKey::new(value_type)))
            .map(|m| m.as_ref())
    }

    pub fn len(&self) -> usize {
        self.matchers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matchers.is_empty()
    }
}

impl Default for MatcherRegistry {
    fn default() -> Self {
        Self::new()
    }
}
