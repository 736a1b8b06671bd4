//! FILENAME: core/worksheet/src/column.rs

use engine::Value;
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

/// The outcome of one submitted cell edit.
///
/// `changed_value` is only set when conversion and every validation
/// succeeded; otherwise `error` holds the display message. Two columns are
/// equal when they edit the same property.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorksheetColumn {
    property: String,
    original_value: Value,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    changed_value: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    error: Option<String>,
    #[serde(skip_serializing_if = "std::ops::Not::not", default)]
    custom_error: bool,
}

impl WorksheetColumn {
    pub fn new(property: impl Into<String>, original_value: Value) -> Self {
        WorksheetColumn {
            property: property.into(),
            original_value,
            changed_value: None,
            error: None,
            custom_error: false,
        }
    }

    pub fn property(&self) -> &str {
        &self.property
    }

    pub fn original_value(&self) -> &Value {
        &self.original_value
    }

    pub fn changed_value(&self) -> Option<&Value> {
        self.changed_value.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn has_error(&self) -> bool {
        self.error.is_some()
    }

    /// True when the error came from a custom validation.
    pub fn is_custom_error(&self) -> bool {
        self.custom_error
    }

    /// True when the edit succeeded and differs from the original.
    pub fn is_changed(&self) -> bool {
        matches!(&self.changed_value, Some(v) if *v != self.original_value)
    }

    pub(crate) fn accept(&mut self, value: Value) {
        self.changed_value = Some(value);
        self.error = None;
        self.custom_error = false;
    }

    pub(crate) fn reject(&mut self, error: String) {
        self.changed_value = None;
        self.error = Some(error);
        self.custom_error = false;
    }

    pub(crate) fn reject_custom(&mut self, error: String) {
        self.reject(error);
        self.custom_error = true;
    }
}

impl PartialEq for WorksheetColumn {
    fn eq(&self, other: &Self) -> bool {
        self.property == other.property
    }
}

impl Eq for WorksheetColumn {}

impl Hash for WorksheetColumn {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.property.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accept_clears_a_previous_error() {
        let mut column = WorksheetColumn::new("age", Value::Int(20));
        column.reject("bad".to_string());
        assert!(column.has_error());
        assert!(column.changed_value().is_none());

        column.accept(Value::Int(21));
        assert!(!column.has_error());
        assert!(column.is_changed());
    }

    #[test]
    fn equality_is_by_property() {
        let mut a = WorksheetColumn::new("age", Value::Int(20));
        a.accept(Value::Int(30));
        let b = WorksheetColumn::new("age", Value::Null);
        assert_eq!(a, b);
        assert_ne!(a, WorksheetColumn::new("name", Value::Null));
    }

    #[test]
    fn serializes_only_present_outcomes() {
        let mut column = WorksheetColumn::new("age", Value::Int(20));
        column.accept(Value::Int(21));
        let json = serde_json::to_value(&column).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"property": "age", "originalValue": 20, "changedValue": 21})
        );
    }
}
