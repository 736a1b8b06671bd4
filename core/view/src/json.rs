//! FILENAME: core/view/src/json.rs

use crate::error::ViewError;
use crate::export::{rendered_rows, ExportView};
use crate::table::Table;
use engine::CoreContext;
use serde::Serialize;
use serde_json::{Map, Value as JsonValue};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonColumn<'t> {
    property: &'t str,
    title: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonTable<'t> {
    #[serde(skip_serializing_if = "Option::is_none")]
    caption: Option<&'t str>,
    columns: Vec<JsonColumn<'t>>,
    rows: Vec<Map<String, JsonValue>>,
    total_rows: usize,
}

/// `{"caption", "columns": [{property, title}], "rows": [{property: value}], "totalRows"}`.
/// Cell values keep their JSON type.
#[derive(Debug, Clone, Default)]
pub struct JsonView;

impl JsonView {
    pub fn new() -> Self {
        JsonView
    }
}

impl ExportView for JsonView {
    fn content_type(&self) -> &str {
        "application/json"
    }

    fn extension(&self) -> &str {
        "json"
    }

    fn render(&self, table: &Table, ctx: &CoreContext<'_>) -> Result<Vec<u8>, ViewError> {
        let columns = table.row().columns();
        let rows = rendered_rows(table, ctx)?
            .into_iter()
            .map(|values| {
                columns
                    .iter()
                    .zip(values)
                    .map(|(column, value)| (column.property().to_string(), value.to_json()))
                    .collect()
            })
            .collect();

        let payload = JsonTable {
            caption: table.caption(),
            columns: columns
                .iter()
                .map(|c| JsonColumn {
                    property: c.property(),
                    title: c.title(),
                })
                .collect(),
            rows,
            total_rows: ctx.total_rows()?,
        };
        Ok(serde_json::to_vec(&payload)?)
    }
}
