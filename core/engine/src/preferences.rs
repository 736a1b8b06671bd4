//! FILENAME: core/engine/src/preferences.rs
//! PURPOSE: String key/value preferences with built-in defaults.
//! CONTEXT: Views read CSS classes, page size, export naming and the like
//! from here. Hosts override values from a JSON object.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ============================================================================
// KEYS
// ============================================================================

pub const MAX_ROWS: &str = "limit.maxRows";
pub const THEME: &str = "html.theme";
pub const TABLE_CLASS: &str = "html.tableClass";
pub const FILTER_CLASS: &str = "html.filterClass";
pub const HEADER_CLASS: &str = "html.headerClass";
pub const TBODY_CLASS: &str = "html.tbodyClass";
pub const ODD_CLASS: &str = "html.oddClass";
pub const EVEN_CLASS: &str = "html.evenClass";
pub const HIGHLIGHT_CLASS: &str = "html.highlightClass";
pub const HIGHLIGHTER: &str = "html.highlighter";
pub const TOOLBAR_CLASS: &str = "html.toolbarClass";
pub const STATUS_CLASS: &str = "html.statusClass";
pub const ROWCOUNT_INCLUDE_PAGINATION: &str = "html.rowcountIncludePagination";
pub const EXPORT_FILE_NAME: &str = "export.fileName";
pub const CSV_DELIMITER: &str = "csv.delimiter";
pub const PDF_CSS_LOCATION: &str = "pdf.cssLocation";
pub const PDF_ROWS_PER_PAGE: &str = "pdf.rowsPerPage";
pub const EXCEL_DEFAULT_CAPTION: &str = "excel.defaultCaption";
pub const DATE_PATTERN: &str = "date.pattern";

const DEFAULTS: &[(&str, &str)] = &[
    (MAX_ROWS, "15"),
    (THEME, "default"),
    (TABLE_CLASS, "table"),
    (FILTER_CLASS, "filter"),
    (HEADER_CLASS, "header"),
    (TBODY_CLASS, "tbody"),
    (ODD_CLASS, "odd"),
    (EVEN_CLASS, "even"),
    (HIGHLIGHT_CLASS, "highlight"),
    (HIGHLIGHTER, "true"),
    (TOOLBAR_CLASS, "toolbar"),
    (STATUS_CLASS, "statusBar"),
    (ROWCOUNT_INCLUDE_PAGINATION, "false"),
    (CSV_DELIMITER, ","),
    (PDF_CSS_LOCATION, ""),
    (PDF_ROWS_PER_PAGE, "30"),
    (EXCEL_DEFAULT_CAPTION, "Table Export"),
    (DATE_PATTERN, crate::value::DEFAULT_DATE_PATTERN),
];

// ============================================================================
// PREFERENCES
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preferences {
    values: BTreeMap<String, String>,
}

impl Default for Preferences {
    fn default() -> Self {
        Preferences {
            values: DEFAULTS
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }
}

impl Preferences {
    pub fn new() -> Self {
        Self::default()
    }

    /// Preferences with no defaults at all.
    pub fn empty() -> Self {
        Preferences {
            values: BTreeMap::new(),
        }
    }

    /// Defaults overridden by a flat JSON object. Non-string scalars are
    /// stored in their JSON text form.
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        let overrides: BTreeMap<String, serde_json::Value> = serde_json::from_str(json)?;
        let mut prefs = Preferences::default();
        for (key, value) in overrides {
            let text = match value {
                serde_json::Value::String(s) => s,
                other => other.to_string(),
            };
            prefs.set(key, text);
        }
        Ok(prefs)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(|s| s.as_str())
    }

    pub fn get_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.get(key).unwrap_or(default)
    }

    pub fn get_bool(&self, key: &str) -> bool {
        matches!(
            self.get(key).map(|v| v.trim().to_lowercase()).as_deref(),
            Some("true") | Some("yes") | Some("1")
        )
    }

    pub fn get_usize(&self, key: &str) -> Option<usize> {
        self.get(key).and_then(|v| v.trim().parse().ok())
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    /// Copies every value of `other` over this set.
    pub fn merge(&mut self, other: &Preferences) {
        for (k, v) in &other.values {
            self.values.insert(k.clone(), v.clone());
        }
    }
}
