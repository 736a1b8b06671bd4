//! FILENAME: core/engine/src/messages.rs
//! PURPOSE: Message lookup with `{n}` argument substitution.

use std::collections::HashMap;

pub const STATUSBAR_RESULTS_FOUND: &str = "statusbar.resultsFound";
pub const STATUSBAR_NO_RESULTS_FOUND: &str = "statusbar.noResultsFound";
pub const TOOLBAR_FIRST: &str = "toolbar.text.first";
pub const TOOLBAR_PREV: &str = "toolbar.text.prev";
pub const TOOLBAR_NEXT: &str = "toolbar.text.next";
pub const TOOLBAR_LAST: &str = "toolbar.text.last";
pub const TOOLBAR_CLEAR: &str = "toolbar.text.clear";
pub const TOOLBAR_EXPORT: &str = "toolbar.text.export";
pub const EDIT_INVALID_NUMBER: &str = "edit.invalidNumber";
pub const EDIT_INVALID_INTEGER: &str = "edit.invalidInteger";
pub const EDIT_INVALID_BOOLEAN: &str = "edit.invalidBoolean";
pub const EDIT_INVALID_DATE: &str = "edit.invalidDate";
pub const VALIDATION_REQUIRED: &str = "validation.required";
pub const VALIDATION_MIN_LENGTH: &str = "validation.minLength";
pub const VALIDATION_MAX_LENGTH: &str = "validation.maxLength";
pub const VALIDATION_RANGE: &str = "validation.range";
pub const VALIDATION_EMAIL: &str = "validation.email";
pub const VALIDATION_PATTERN: &str = "validation.pattern";
pub const VALIDATION_CUSTOM: &str = "validation.custom";
pub const WORKSHEET_UNKNOWN_ROW: &str = "worksheet.unknownRow";
pub const WORKSHEET_NOT_EDITABLE: &str = "worksheet.notEditable";

const DEFAULT_BUNDLE: &[(&str, &str)] = &[
    (STATUSBAR_RESULTS_FOUND, "Results {1} - {2} of {0}"),
    (STATUSBAR_NO_RESULTS_FOUND, "There were no results found."),
    (TOOLBAR_FIRST, "First"),
    (TOOLBAR_PREV, "Prev"),
    (TOOLBAR_NEXT, "Next"),
    (TOOLBAR_LAST, "Last"),
    (TOOLBAR_CLEAR, "Clear"),
    (TOOLBAR_EXPORT, "Export {0}"),
    (EDIT_INVALID_NUMBER, "'{0}' is not a valid number"),
    (EDIT_INVALID_INTEGER, "'{0}' is not a valid whole number"),
    (EDIT_INVALID_BOOLEAN, "'{0}' is not true or false"),
    (EDIT_INVALID_DATE, "'{0}' does not match the date pattern {1}"),
    (VALIDATION_REQUIRED, "A value is required"),
    (VALIDATION_MIN_LENGTH, "Must be at least {0} characters"),
    (VALIDATION_MAX_LENGTH, "Must be at most {0} characters"),
    (VALIDATION_RANGE, "Must be between {0} and {1}"),
    (VALIDATION_EMAIL, "Must be a valid email address"),
    (VALIDATION_PATTERN, "Does not match the expected format"),
    (VALIDATION_CUSTOM, "Invalid value"),
    (WORKSHEET_UNKNOWN_ROW, "No row matches '{0}'"),
    (WORKSHEET_NOT_EDITABLE, "'{0}' is not editable"),
];

/// Key + arguments to display text.
pub trait Messages {
    /// The formatted message, or `None` when the key is unknown.
    fn message(&self, key: &str, args: &[&str]) -> Option<String>;
}

impl<M: Messages + ?Sized> Messages for Box<M> {
    fn message(&self, key: &str, args: &[&str]) -> Option<String> {
        (**self).message(key, args)
    }
}

/// Replaces `{0}`, `{1}`, ... with the matching argument. Placeholders
/// without an argument are left as written.
pub fn format_message(template: &str, args: &[&str]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        match after.find('}') {
            Some(close) => {
                let inner = &after[..close];
                match inner.parse::<usize>().ok().and_then(|i| args.get(i)) {
                    Some(arg) => out.push_str(arg),
                    None => {
                        out.push('{');
                        out.push_str(inner);
                        out.push('}');
                    }
                }
                rest = &after[close + 1..];
            }
            None => {
                out.push_str(&rest[open..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

/// English default bundle, overridable key by key.
#[derive(Debug, Clone)]
pub struct BundleMessages {
    bundle: HashMap<String, String>,
}

impl Default for BundleMessages {
    fn default() -> Self {
        BundleMessages {
            bundle: DEFAULT_BUNDLE
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }
}

impl BundleMessages {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults overridden by a flat JSON object of key to template.
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        let overrides: HashMap<String, String> = serde_json::from_str(json)?;
        let mut messages = BundleMessages::default();
        messages.bundle.extend(overrides);
        Ok(messages)
    }

    pub fn insert(&mut self, key: impl Into<String>, template: impl Into<String>) {
        self.bundle.insert(key.into(), template.into());
    }
}

impl Messages for BundleMessages {
    fn message(&self, key: &str, args: &[&str]) -> Option<String> {
        self.bundle.get(key).map(|t| format_message(t, args))
    }
}
