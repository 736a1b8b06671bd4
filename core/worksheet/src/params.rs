//! FILENAME: core/worksheet/src/params.rs
//! PURPOSE: The worksheet request protocol.
//! CONTEXT: Each edited cell arrives as `{id}_ws_[{rowKey}]_{property}` =
//! raw value. The row key is the row's unique-property values joined by
//! ",", with "\\" and "," inside a value escaped by a backslash.

use engine::{get_value, log_warn, Item, PropertyError};
use std::collections::HashMap;

pub const ROW_KEY_SEPARATOR: &str = ",";
const ROW_KEY_ESCAPE: char = '\\';

/// One submitted cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellEdit {
    pub row_key: String,
    pub property: String,
    pub raw: String,
}

/// Key names and parsing for one table id.
#[derive(Debug, Clone)]
pub struct WorksheetParams {
    prefix: String,
}

impl WorksheetParams {
    pub fn new(id: &str) -> Self {
        WorksheetParams {
            prefix: format!("{}_ws_", id),
        }
    }

    pub fn cell_key(&self, row_key: &str, property: &str) -> String {
        format!("{}[{}]_{}", self.prefix, row_key, property)
    }

    /// Splits a cell key into row key and property. Keys of other tables
    /// and malformed keys give `None`.
    pub fn parse_key<'k>(&self, key: &'k str) -> Option<(&'k str, &'k str)> {
        let rest = key.strip_prefix(&self.prefix)?.strip_prefix('[')?;
        let close = rest.rfind("]_")?;
        let (row_key, property) = (&rest[..close], &rest[close + 2..]);
        if property.is_empty() {
            return None;
        }
        Some((row_key, property))
    }

    /// Every cell edit for this table, ordered by row key then property.
    pub fn cell_edits(&self, params: &HashMap<String, String>) -> Vec<CellEdit> {
        let mut edits: Vec<CellEdit> = params
            .iter()
            .filter(|(key, _)| key.starts_with(&self.prefix))
            .filter_map(|(key, raw)| match self.parse_key(key) {
                Some((row_key, property)) => Some(CellEdit {
                    row_key: row_key.to_string(),
                    property: property.to_string(),
                    raw: raw.clone(),
                }),
                None => {
                    log_warn!("WORKSHEET", "ignoring malformed cell key '{}'", key);
                    None
                }
            })
            .collect();
        edits.sort_by(|a, b| (&a.row_key, &a.property).cmp(&(&b.row_key, &b.property)));
        edits
    }
}

/// The unique-property values of `item`, joined into its row key.
pub fn row_key(item: &dyn Item, unique_properties: &[String]) -> Result<String, PropertyError> {
    let values = unique_properties
        .iter()
        .map(|property| get_value(item, property).map(|v| escape_key_part(&v.to_string())))
        .collect::<Result<Vec<String>, PropertyError>>()?;
    Ok(values.join(ROW_KEY_SEPARATOR))
}

fn escape_key_part(part: &str) -> String {
    let mut escaped = String::with_capacity(part.len());
    for c in part.chars() {
        if c == ROW_KEY_ESCAPE || ROW_KEY_SEPARATOR.contains(c) {
            escaped.push(ROW_KEY_ESCAPE);
        }
        escaped.push(c);
    }
    escaped
}
