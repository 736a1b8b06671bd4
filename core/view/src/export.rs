//! FILENAME: core/view/src/export.rs
//! PURPOSE: Export plumbing - the output sink, response metadata and the
//! lookup from ExportType to the view that encodes it.
//! CONTEXT: The payload is built completely in memory and handed to the
//! sink in a single write. A sink failure fails the export.

use crate::csv::CsvView;
use crate::error::ViewError;
use crate::excel::ExcelView;
use crate::json::JsonView;
use crate::pdf::PdfView;
use crate::table::Table;
use chrono::{Duration, Utc};
use engine::preferences::EXPORT_FILE_NAME;
use engine::{log_info, CoreContext, ExportType, Value};
use std::io::Write;

/// File name stem when neither a preference nor a caption names the export.
pub const DEFAULT_FILE_NAME: &str = "table-data";

// ============================================================================
// SINK
// ============================================================================

/// Where an export goes: response metadata plus a byte stream.
pub trait ExportSink {
    fn set_content_type(&mut self, content_type: &str);
    fn set_header(&mut self, name: &str, value: &str);
    fn writer(&mut self) -> &mut dyn Write;
}

/// A sink that records metadata and writes into any `Write`.
#[derive(Debug)]
pub struct ExportResponse<W: Write> {
    content_type: Option<String>,
    headers: Vec<(String, String)>,
    out: W,
}

impl<W: Write> ExportResponse<W> {
    pub fn new(out: W) -> Self {
        ExportResponse {
            content_type: None,
            headers: Vec::new(),
            out,
        }
    }

    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .rev()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ExportSink for ExportResponse<W> {
    fn set_content_type(&mut self, content_type: &str) {
        self.content_type = Some(content_type.to_string());
    }

    fn set_header(&mut self, name: &str, value: &str) {
        self.headers.push((name.to_string(), value.to_string()));
    }

    fn writer(&mut self) -> &mut dyn Write {
        &mut self.out
    }
}

// ============================================================================
// EXPORT VIEWS
// ============================================================================

/// Encodes the page (the whole filtered collection when exporting) into
/// one payload.
pub trait ExportView {
    fn content_type(&self) -> &str;
    fn extension(&self) -> &str;
    fn render(&self, table: &Table, ctx: &CoreContext<'_>) -> Result<Vec<u8>, ViewError>;
}

/// The default view for an export type.
pub fn export_view(export_type: ExportType) -> Box<dyn ExportView> {
    match export_type {
        ExportType::Csv => Box::new(CsvView::new()),
        ExportType::Excel => Box::new(ExcelView::new()),
        ExportType::Pdf => Box::new(PdfView::new()),
        ExportType::Json => Box::new(JsonView::new()),
    }
}

/// Column titles in row order.
pub fn column_titles(table: &Table) -> Vec<String> {
    table.row().columns().iter().map(|c| c.title()).collect()
}

/// Rendered cell values of every page item, one inner vec per item.
pub fn rendered_rows(table: &Table, ctx: &CoreContext<'_>) -> Result<Vec<Vec<Value>>, ViewError> {
    let columns = table.row().columns();
    ctx.page_items()?
        .into_iter()
        .enumerate()
        .map(|(i, item)| {
            columns
                .iter()
                .map(|column| column.cell_renderer().render(item, column.property(), i + 1))
                .collect::<Result<Vec<Value>, ViewError>>()
        })
        .collect()
}

/// `export.fileName` preference, else the caption, else the default stem,
/// plus the view's extension.
pub fn export_file_name(table: &Table, ctx: &CoreContext<'_>, extension: &str) -> String {
    let stem = ctx
        .preference(EXPORT_FILE_NAME)
        .filter(|s| !s.trim().is_empty())
        .or_else(|| table.caption().filter(|s| !s.trim().is_empty()))
        .unwrap_or(DEFAULT_FILE_NAME);
    let stem: String = stem
        .trim()
        .chars()
        .map(|c| if c == '"' || c == '\\' || c.is_control() { '_' } else { c })
        .collect();
    format!("{}.{}", stem, extension)
}

/// Renders with `view` and writes the result to the sink together with the
/// download headers.
pub fn export(
    view: &dyn ExportView,
    table: &Table,
    ctx: &CoreContext<'_>,
    sink: &mut dyn ExportSink,
) -> Result<(), ViewError> {
    let file_name = export_file_name(table, ctx, view.extension());
    log_info!("EXPORT", "exporting '{}' as {}", ctx.limit().id(), file_name);

    let payload = view.render(table, ctx)?;

    let expires = (Utc::now() + Duration::seconds(1))
        .format("%a, %d %b %Y %H:%M:%S GMT")
        .to_string();
    sink.set_content_type(view.content_type());
    sink.set_header("Content-Disposition", &format!("attachment;filename=\"{}\"", file_name));
    sink.set_header("Cache-Control", "must-revalidate, post-check=0, pre-check=0");
    sink.set_header("Pragma", "public");
    sink.set_header("Expires", &expires);

    let out = sink.writer();
    out.write_all(&payload)?;
    out.flush()?;

    log_info!("EXPORT", "wrote {} bytes for '{}'", payload.len(), ctx.limit().id());
    Ok(())
}
