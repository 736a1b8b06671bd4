//! FILENAME: core/view/src/editor.rs
//! PURPOSE: Cell editors - convert raw submitted text into typed values.
//! CONTEXT: A failed conversion is data, not an error of the caller: it is
//! returned as a CellEditError and recorded on the worksheet cell. Blank
//! input converts to Null for every typed editor; `Required` validation is
//! what rejects it.

use chrono::{NaiveDate, NaiveDateTime};
use engine::messages::{
    EDIT_INVALID_BOOLEAN, EDIT_INVALID_DATE, EDIT_INVALID_INTEGER, EDIT_INVALID_NUMBER,
};
use engine::{
    BooleanFilterMatcher, CoreContext, Value, ValueType, DEFAULT_DATE_PATTERN, DEFAULT_DATE_TIME_PATTERN,
};
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// EDIT ERROR
// ============================================================================

/// Why a cell value was rejected: a message key with arguments, or a
/// literal message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellEditError {
    Key { key: String, args: Vec<String> },
    Message(String),
}

impl CellEditError {
    pub fn key(key: &str, args: &[&str]) -> Self {
        CellEditError::Key {
            key: key.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
        }
    }

    pub fn message(message: impl Into<String>) -> Self {
        CellEditError::Message(message.into())
    }

    /// Display text, looked up through the context's messages.
    pub fn resolve(&self, ctx: &CoreContext<'_>) -> String {
        match self {
            CellEditError::Key { key, args } => {
                let args: Vec<&str> = args.iter().map(String::as_str).collect();
                ctx.message(key, &args)
            }
            CellEditError::Message(message) => message.clone(),
        }
    }
}

impl fmt::Display for CellEditError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellEditError::Key { key, args } if args.is_empty() => f.write_str(key),
            CellEditError::Key { key, args } => write!(f, "{} {:?}", key, args),
            CellEditError::Message(message) => f.write_str(message),
        }
    }
}

// ============================================================================
// EDITORS
// ============================================================================

/// Converts a raw submitted string. `original` is the value currently on
/// the item.
pub trait CellEditor {
    fn edit(&self, raw: &str, original: &Value) -> Result<Value, CellEditError>;
}

impl<F> CellEditor for F
where
    F: Fn(&str, &Value) -> Result<Value, CellEditError>,
{
    fn edit(&self, raw: &str, original: &Value) -> Result<Value, CellEditError> {
        self(raw, original)
    }
}

/// Converts to the type of the original value; text when the original is
/// text or null. Dates are parsed with `date_pattern`, or
/// `DEFAULT_DATE_PATTERN` when none is set.
#[derive(Debug, Clone, Default)]
pub struct BasicCellEditor {
    date_pattern: Option<String>,
}

impl BasicCellEditor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_date_pattern(pattern: impl Into<String>) -> Self {
        BasicCellEditor {
            date_pattern: Some(pattern.into()),
        }
    }
}

impl CellEditor for BasicCellEditor {
    fn edit(&self, raw: &str, original: &Value) -> Result<Value, CellEditError> {
        match original.value_type() {
            ValueType::Null | ValueType::Text => TextCellEditor.edit(raw, original),
            ValueType::Int => IntegerCellEditor.edit(raw, original),
            ValueType::Float => DecimalCellEditor.edit(raw, original),
            ValueType::Bool => BooleanCellEditor.edit(raw, original),
            ValueType::Date => {
                let pattern = self.date_pattern.as_deref().unwrap_or(DEFAULT_DATE_PATTERN);
                DateCellEditor::new(pattern).edit(raw, original)
            }
            ValueType::DateTime => DateCellEditor::new(DEFAULT_DATE_TIME_PATTERN).edit(raw, original),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TextCellEditor;

impl CellEditor for TextCellEditor {
    fn edit(&self, raw: &str, _original: &Value) -> Result<Value, CellEditError> {
        Ok(Value::Text(raw.to_string()))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct IntegerCellEditor;

impl CellEditor for IntegerCellEditor {
    fn edit(&self, raw: &str, _original: &Value) -> Result<Value, CellEditError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Ok(Value::Null);
        }
        trimmed
            .parse::<i64>()
            .map(Value::Int)
            .map_err(|_| CellEditError::key(EDIT_INVALID_INTEGER, &[raw]))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DecimalCellEditor;

impl CellEditor for DecimalCellEditor {
    fn edit(&self, raw: &str, _original: &Value) -> Result<Value, CellEditError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Ok(Value::Null);
        }
        match trimmed.parse::<f64>() {
            Ok(n) if n.is_finite() => Ok(Value::Float(n)),
            _ => Err(CellEditError::key(EDIT_INVALID_NUMBER, &[raw])),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BooleanCellEditor;

impl CellEditor for BooleanCellEditor {
    fn edit(&self, raw: &str, _original: &Value) -> Result<Value, CellEditError> {
        if raw.trim().is_empty() {
            return Ok(Value::Null);
        }
        BooleanFilterMatcher::parse(raw)
            .map(Value::Bool)
            .ok_or_else(|| CellEditError::key(EDIT_INVALID_BOOLEAN, &[raw]))
    }
}

/// Parses with a chrono pattern. A date-time original parses as a
/// date-time; patterns without a day (`%m/%Y`) resolve to the first of the
/// month.
#[derive(Debug, Clone)]
pub struct DateCellEditor {
    pattern: String,
}

impl DateCellEditor {
    pub fn new(pattern: impl Into<String>) -> Self {
        DateCellEditor {
            pattern: pattern.into(),
        }
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    fn parse_date(&self, raw: &str) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(raw, &self.pattern).ok().or_else(|| {
            let with_day = format!("{} 1", raw);
            let pattern = format!("{} %d", self.pattern);
            NaiveDate::parse_from_str(&with_day, &pattern).ok()
        })
    }
}

impl CellEditor for DateCellEditor {
    fn edit(&self, raw: &str, original: &Value) -> Result<Value, CellEditError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Ok(Value::Null);
        }
        let invalid = || CellEditError::key(EDIT_INVALID_DATE, &[raw, &self.pattern]);
        if original.value_type() == ValueType::DateTime {
            return NaiveDateTime::parse_from_str(trimmed, &self.pattern)
                .map(Value::DateTime)
                .map_err(|_| invalid());
        }
        self.parse_date(trimmed).map(Value::Date).ok_or_else(invalid)
    }
}
