//! FILENAME: core/view/src/excel.rs
//! PURPOSE: XLSX export - one sheet named after the caption, a bold title row
//! and one row per item.
//! CONTEXT: Numbers, and text that parses as a number, become number cells.
//! Everything else is a string cell: null as "" and booleans as
//! "true"/"false".

use crate::error::ViewError;
use crate::export::{column_titles, rendered_rows, ExportView};
use crate::table::Table;
use engine::preferences::EXCEL_DEFAULT_CAPTION;
use engine::{CoreContext, Value};
use rust_xlsxwriter::{Format, Workbook, Worksheet};

const FALLBACK_SHEET_NAME: &str = "Table Export";
const MAX_SHEET_NAME_LEN: usize = 31;

#[derive(Debug, Clone, Default)]
pub struct ExcelView;

impl ExcelView {
    pub fn new() -> Self {
        ExcelView
    }
}

/// Strips the characters Excel rejects in sheet names and truncates to 31
/// characters. Never returns an empty name.
pub fn sanitize_sheet_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .filter(|c| !matches!(c, '[' | ']' | ':' | '*' | '?' | '/' | '\\'))
        .collect();
    let cleaned: String = cleaned
        .trim()
        .trim_matches('\'')
        .chars()
        .take(MAX_SHEET_NAME_LEN)
        .collect();
    if cleaned.trim().is_empty() {
        FALLBACK_SHEET_NAME.to_string()
    } else {
        cleaned
    }
}

fn write_value(sheet: &mut Worksheet, row: u32, col: u16, value: &Value) -> Result<(), ViewError> {
    match value {
        Value::Null => {
            sheet.write_string(row, col, "")?;
        }
        Value::Int(i) => {
            sheet.write_number(row, col, *i as f64)?;
        }
        Value::Float(f) if f.is_finite() => {
            sheet.write_number(row, col, *f)?;
        }
        other => {
            let text = other.to_string();
            // Renderers often hand back numbers already formatted as text.
            match text.parse::<f64>() {
                Ok(n) if n.is_finite() => {
                    sheet.write_number(row, col, n)?;
                }
                _ => {
                    sheet.write_string(row, col, &text)?;
                }
            }
        }
    }
    Ok(())
}

impl ExportView for ExcelView {
    fn content_type(&self) -> &str {
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
    }

    fn extension(&self) -> &str {
        "xlsx"
    }

    fn render(&self, table: &Table, ctx: &CoreContext<'_>) -> Result<Vec<u8>, ViewError> {
        let caption = table
            .caption()
            .or_else(|| ctx.preference(EXCEL_DEFAULT_CAPTION))
            .unwrap_or(FALLBACK_SHEET_NAME);

        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.set_name(sanitize_sheet_name(caption))?;

        let bold = Format::new().set_bold();
        for (col, title) in column_titles(table).iter().enumerate() {
            sheet.write_string_with_format(0, col as u16, title, &bold)?;
        }

        for (i, values) in rendered_rows(table, ctx)?.iter().enumerate() {
            let row = i as u32 + 1;
            for (col, value) in values.iter().enumerate() {
                write_value(sheet, row, col as u16, value)?;
            }
        }

        Ok(workbook.save_to_buffer()?)
    }
}
