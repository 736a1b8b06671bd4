//! FILENAME: core/worksheet/src/worksheet.rs
//! PURPOSE: Runs submitted cell edits through each column's editor and
//! validations and records the per-cell outcome.
//! CONTEXT: Items are only read. Applying the changed values back onto the
//! collection is left to the caller.

use crate::column::WorksheetColumn;
use crate::error::WorksheetError;
use crate::params::{row_key, CellEdit, WorksheetParams};
use engine::messages::{WORKSHEET_NOT_EDITABLE, WORKSHEET_UNKNOWN_ROW};
use engine::preferences::DATE_PATTERN;
use engine::{get_value, log_debug, log_info, CoreContext, Item, Value};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use view::{BasicCellEditor, CellEditor, Column, Row, Table};

// ============================================================================
// ROWS
// ============================================================================

/// The edited cells of one item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorksheetRow {
    row_key: String,
    columns: Vec<WorksheetColumn>,
}

impl WorksheetRow {
    pub fn new(row_key: impl Into<String>) -> Self {
        WorksheetRow {
            row_key: row_key.into(),
            columns: Vec::new(),
        }
    }

    pub fn row_key(&self) -> &str {
        &self.row_key
    }

    pub fn columns(&self) -> &[WorksheetColumn] {
        &self.columns
    }

    pub fn column(&self, property: &str) -> Option<&WorksheetColumn> {
        self.columns.iter().find(|c| c.property() == property)
    }

    pub fn has_errors(&self) -> bool {
        self.columns.iter().any(WorksheetColumn::has_error)
    }

    fn push(&mut self, column: WorksheetColumn) {
        self.columns.retain(|c| c != &column);
        self.columns.push(column);
    }
}

// ============================================================================
// WORKSHEET
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Worksheet {
    id: String,
    rows: Vec<WorksheetRow>,
}

/// Serializable summary handed back to the client.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorksheetResponse<'w> {
    pub id: &'w str,
    pub has_errors: bool,
    pub rows: &'w [WorksheetRow],
}

impl Worksheet {
    /// Processes every `{id}_ws_[...]` parameter of the request against the
    /// items of `ctx`.
    pub fn process(
        table: &Table,
        ctx: &CoreContext<'_>,
        params: &HashMap<String, String>,
    ) -> Result<Worksheet, WorksheetError> {
        let id = ctx.limit().id();
        let edits = WorksheetParams::new(id).cell_edits(params);
        Self::process_edits(table, ctx, &edits)
    }

    /// Processes already parsed edits.
    pub fn process_edits(
        table: &Table,
        ctx: &CoreContext<'_>,
        edits: &[CellEdit],
    ) -> Result<Worksheet, WorksheetError> {
        let row = table.row();
        let unique = row.unique_properties();
        if unique.is_empty() {
            return Err(WorksheetError::MissingUniqueProperties);
        }

        let items = ctx.items();
        let mut by_key: HashMap<String, &dyn Item> = HashMap::with_capacity(items.len());
        for index in 0..items.len() {
            if let Some(item) = items.item(index) {
                let key = row_key(item, unique)?;
                if by_key.insert(key.clone(), item).is_some() {
                    return Err(WorksheetError::DuplicateRowKey(key));
                }
            }
        }

        let mut worksheet = Worksheet {
            id: ctx.limit().id().to_string(),
            rows: Vec::new(),
        };
        for edit in edits {
            let column = row
                .column(&edit.property)
                .ok_or_else(|| WorksheetError::UnknownColumn(edit.property.clone()))?;
            let cell = edit_cell(row, column, by_key.get(&edit.row_key).copied(), edit, ctx)?;
            worksheet.row_entry(&edit.row_key).push(cell);
        }

        log_info!(
            "WORKSHEET",
            "'{}': {} cells in {} rows, {} rejected",
            worksheet.id,
            edits.len(),
            worksheet.rows.len(),
            worksheet.error_count()
        );
        Ok(worksheet)
    }

    fn row_entry(&mut self, row_key: &str) -> &mut WorksheetRow {
        let index = match self.rows.iter().position(|r| r.row_key == row_key) {
            Some(index) => index,
            None => {
                self.rows.push(WorksheetRow::new(row_key));
                self.rows.len() - 1
            }
        };
        &mut self.rows[index]
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn rows(&self) -> &[WorksheetRow] {
        &self.rows
    }

    pub fn row(&self, row_key: &str) -> Option<&WorksheetRow> {
        self.rows.iter().find(|r| r.row_key == row_key)
    }

    pub fn has_errors(&self) -> bool {
        self.rows.iter().any(WorksheetRow::has_errors)
    }

    pub fn error_count(&self) -> usize {
        self.rows
            .iter()
            .flat_map(|r| r.columns.iter())
            .filter(|c| c.has_error())
            .count()
    }

    /// (row key, property, new value) for every accepted edit.
    pub fn changed_values(&self) -> Vec<(&str, &str, &Value)> {
        self.rows
            .iter()
            .flat_map(|r| {
                r.columns
                    .iter()
                    .filter_map(move |c| c.changed_value().map(|v| (r.row_key(), c.property(), v)))
            })
            .collect()
    }

    pub fn response(&self) -> WorksheetResponse<'_> {
        WorksheetResponse {
            id: &self.id,
            has_errors: self.has_errors(),
            rows: &self.rows,
        }
    }

    pub fn to_json(&self) -> Result<String, WorksheetError> {
        Ok(serde_json::to_string(&self.response())?)
    }
}

/// Converts then validates one cell. Conversion and validation failures are
/// recorded on the returned column.
fn edit_cell(
    row: &Row,
    column: &Column,
    item: Option<&dyn Item>,
    edit: &CellEdit,
    ctx: &CoreContext<'_>,
) -> Result<WorksheetColumn, WorksheetError> {
    let item = match item {
        Some(item) => item,
        None => {
            let mut cell = WorksheetColumn::new(&edit.property, Value::Null);
            cell.reject(ctx.message(WORKSHEET_UNKNOWN_ROW, &[edit.row_key.as_str()]));
            return Ok(cell);
        }
    };

    let original = get_value(item, &edit.property)?;
    let mut cell = WorksheetColumn::new(&edit.property, original);

    if !column.is_editable(row) {
        cell.reject(ctx.message(WORKSHEET_NOT_EDITABLE, &[edit.property.as_str()]));
        return Ok(cell);
    }

    // columns without their own editor parse dates with the date preference
    let basic;
    let editor: &dyn CellEditor = match column.bound_cell_editor() {
        Some(editor) => editor,
        None => {
            basic = match ctx.preference(DATE_PATTERN) {
                Some(pattern) => BasicCellEditor::with_date_pattern(pattern),
                None => BasicCellEditor::new(),
            };
            &basic
        }
    };

    let converted = editor
        .edit(&edit.raw, cell.original_value())
        .map_err(|err| (err, false))
        .and_then(|value| {
            let failure = column.validations().iter().find_map(|validation| {
                validation
                    .validate(&value)
                    .err()
                    .map(|err| (err, validation.is_custom()))
            });
            match failure {
                Some(failure) => Err(failure),
                None => Ok(value),
            }
        });

    match converted {
        Ok(value) => cell.accept(value),
        Err((err, true)) => {
            log_debug!(
                "WORKSHEET",
                "custom check rejected [{}] {}: {}",
                edit.row_key,
                edit.property,
                err
            );
            cell.reject_custom(err.resolve(ctx));
        }
        Err((err, false)) => {
            log_debug!(
                "WORKSHEET",
                "rejected [{}] {}: {}",
                edit.row_key,
                edit.property,
                err
            );
            cell.reject(err.resolve(ctx));
        }
    }
    Ok(cell)
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine::{Limit, Record};
    use view::Validation;

    fn people() -> Vec<Record> {
        vec![
            Record::new().with("id", 1i64).with("name", "Ann").with("age", 30i64),
            Record::new().with("id", 2i64).with("name", "Bob").with("age", 20i64),
        ]
    }

    fn table() -> Table {
        let mut table = Table::with_columns(&["id", "name", "age"]).unwrap();
        table.row_mut().set_unique_properties(&["id"]);
        table
    }

    fn edit(row_key: &str, property: &str, raw: &str) -> CellEdit {
        CellEdit {
            row_key: row_key.to_string(),
            property: property.to_string(),
            raw: raw.to_string(),
        }
    }

    #[test]
    fn converts_to_the_original_type() {
        let data = people();
        let ctx = CoreContext::new(&data, Limit::new("people"));
        let sheet = Worksheet::process_edits(&table(), &ctx, &[edit("2", "age", "21")]).unwrap();

        let cell = sheet.row("2").unwrap().column("age").unwrap();
        assert_eq!(cell.original_value(), &Value::Int(20));
        assert_eq!(cell.changed_value(), Some(&Value::Int(21)));
        assert!(!sheet.has_errors());
        assert_eq!(data[1].property("age"), Some(Value::Int(20)));
    }

    #[test]
    fn validation_failure_is_recorded() {
        let data = people();
        let ctx = CoreContext::new(&data, Limit::new("people"));
        let mut table = table();
        table
            .row_mut()
            .column_mut("name")
            .unwrap()
            .add_validation(Validation::min_length(2));

        let sheet = Worksheet::process_edits(&table, &ctx, &[edit("1", "name", "A")]).unwrap();
        let cell = sheet.row("1").unwrap().column("name").unwrap();
        assert_eq!(cell.error(), Some("Must be at least 2 characters"));
        assert!(cell.changed_value().is_none());
    }

    #[test]
    fn custom_validation_failures_are_flagged() {
        let data = people();
        let ctx = CoreContext::new(&data, Limit::new("people"));
        let mut table = table();
        let age = table.row_mut().column_mut("age").unwrap();
        age.add_validation(Validation::range(0.0, 150.0));
        age.add_validation(
            Validation::custom("even", |v: &Value| v.as_f64().map_or(true, |n| n % 2.0 == 0.0))
                .with_message("Age must be even"),
        );

        let sheet = Worksheet::process_edits(
            &table,
            &ctx,
            &[edit("1", "age", "31"), edit("2", "age", "200")],
        )
        .unwrap();

        let odd = sheet.row("1").unwrap().column("age").unwrap();
        assert_eq!(odd.error(), Some("Age must be even"));
        assert!(odd.is_custom_error());

        let out_of_range = sheet.row("2").unwrap().column("age").unwrap();
        assert!(out_of_range.has_error());
        assert!(!out_of_range.is_custom_error());

        let json: serde_json::Value = serde_json::from_str(&sheet.to_json().unwrap()).unwrap();
        assert_eq!(json["rows"][0]["columns"][0]["customError"], true);
        assert!(json["rows"][1]["columns"][0].get("customError").is_none());
    }

    #[test]
    fn unknown_rows_and_read_only_columns_are_cell_errors() {
        let data = people();
        let ctx = CoreContext::new(&data, Limit::new("people"));
        let mut table = table();
        table.row_mut().column_mut("id").unwrap().set_editable(Some(false));

        let sheet = Worksheet::process_edits(
            &table,
            &ctx,
            &[edit("9", "age", "1"), edit("1", "id", "5")],
        )
        .unwrap();
        assert_eq!(sheet.error_count(), 2);
        assert_eq!(
            sheet.row("9").unwrap().column("age").unwrap().error(),
            Some("No row matches '9'")
        );
        assert_eq!(
            sheet.row("1").unwrap().column("id").unwrap().error(),
            Some("'id' is not editable")
        );
    }

    #[test]
    fn configuration_errors_abort() {
        let data = people();
        let ctx = CoreContext::new(&data, Limit::new("people"));

        let no_unique = Table::with_columns(&["id"]).unwrap();
        assert!(matches!(
            Worksheet::process_edits(&no_unique, &ctx, &[]),
            Err(WorksheetError::MissingUniqueProperties)
        ));

        assert!(matches!(
            Worksheet::process_edits(&table(), &ctx, &[edit("1", "email", "x")]),
            Err(WorksheetError::UnknownColumn(p)) if p == "email"
        ));
    }

    #[test]
    fn items_sharing_a_row_key_are_rejected() {
        let data = vec![
            Record::new().with("id", 1i64).with("age", 30i64),
            Record::new().with("id", 1i64).with("age", 20i64),
        ];
        let ctx = CoreContext::new(&data, Limit::new("people"));
        let mut table = Table::with_columns(&["id", "age"]).unwrap();
        table.row_mut().set_unique_properties(&["id"]);

        assert!(matches!(
            Worksheet::process_edits(&table, &ctx, &[edit("1", "age", "9")]),
            Err(WorksheetError::DuplicateRowKey(k)) if k == "1"
        ));
    }

    #[test]
    fn separator_inside_unique_values_keeps_rows_apart() {
        let data = vec![
            Record::new().with("id", "a,b").with("k", "c").with("age", 1i64),
            Record::new().with("id", "a").with("k", "b,c").with("age", 2i64),
        ];
        let ctx = CoreContext::new(&data, Limit::new("people"));
        let mut table = Table::with_columns(&["id", "k", "age"]).unwrap();
        table.row_mut().set_unique_properties(&["id", "k"]);

        let sheet = Worksheet::process_edits(
            &table,
            &ctx,
            &[edit("a\\,b,c", "age", "9"), edit("a,b,c", "age", "8")],
        )
        .unwrap();

        let first = sheet.row("a\\,b,c").unwrap().column("age").unwrap();
        assert_eq!(first.original_value(), &Value::Int(1));
        assert_eq!(first.changed_value(), Some(&Value::Int(9)));
        assert_eq!(
            sheet.row("a,b,c").unwrap().column("age").unwrap().error(),
            Some("No row matches 'a,b,c'")
        );
    }

    #[test]
    fn default_editor_parses_dates_with_the_date_preference() {
        let data = vec![Record::new()
            .with("id", 1i64)
            .with("born", chrono::NaiveDate::from_ymd_opt(1732, 2, 22).unwrap())];
        let mut prefs = engine::Preferences::new();
        prefs.set(DATE_PATTERN, "%m/%Y");
        let ctx = CoreContext::new(&data, Limit::new("people")).with_preferences(prefs);
        let mut table = Table::with_columns(&["id", "born"]).unwrap();
        table.row_mut().set_unique_properties(&["id"]);

        let sheet = Worksheet::process_edits(&table, &ctx, &[edit("1", "born", "07/1767")]).unwrap();
        let cell = sheet.row("1").unwrap().column("born").unwrap();
        assert_eq!(
            cell.changed_value(),
            Some(&Value::Date(chrono::NaiveDate::from_ymd_opt(1767, 7, 1).unwrap()))
        );
    }

    #[test]
    fn response_json() {
        let data = people();
        let ctx = CoreContext::new(&data, Limit::new("people"));
        let sheet = Worksheet::process_edits(&table(), &ctx, &[edit("1", "age", "x")]).unwrap();

        let json: serde_json::Value = serde_json::from_str(&sheet.to_json().unwrap()).unwrap();
        assert_eq!(json["id"], "people");
        assert_eq!(json["hasErrors"], true);
        assert_eq!(json["rows"][0]["rowKey"], "1");
        assert_eq!(json["rows"][0]["columns"][0]["error"], "'x' is not a valid whole number");
    }
}
