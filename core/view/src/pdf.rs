//! FILENAME: core/view/src/pdf.rs
//! PURPOSE: Printable export. Rows are laid out as paginated XHTML and handed
//! to a DocumentRenderer which produces the final document bytes.
//! CONTEXT: The default renderer emits the XHTML itself. Plug in a real
//! XHTML-to-PDF renderer with `PdfView::with_renderer`.

use crate::error::ViewError;
use crate::export::{column_titles, rendered_rows, ExportView};
use crate::html::HtmlBuilder;
use crate::table::Table;
use engine::preferences::{PDF_CSS_LOCATION, PDF_ROWS_PER_PAGE};
use engine::{log_debug, CoreContext, Value};

const DEFAULT_ROWS_PER_PAGE: usize = 30;

// ============================================================================
// DOCUMENT RENDERERS
// ============================================================================

/// Turns the paginated XHTML into the bytes of the downloaded document.
pub trait DocumentRenderer {
    fn content_type(&self) -> &str;
    fn extension(&self) -> &str;
    fn render(&self, xhtml: &str) -> Result<Vec<u8>, ViewError>;
}

/// Writes the XHTML unchanged.
#[derive(Debug, Clone, Default)]
pub struct XhtmlDocumentRenderer;

impl DocumentRenderer for XhtmlDocumentRenderer {
    fn content_type(&self) -> &str {
        "application/xhtml+xml"
    }

    fn extension(&self) -> &str {
        "xhtml"
    }

    fn render(&self, xhtml: &str) -> Result<Vec<u8>, ViewError> {
        Ok(xhtml.as_bytes().to_vec())
    }
}

// ============================================================================
// VIEW
// ============================================================================

pub struct PdfView {
    renderer: Box<dyn DocumentRenderer>,
}

impl Default for PdfView {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfView {
    pub fn new() -> Self {
        Self::with_renderer(Box::new(XhtmlDocumentRenderer))
    }

    pub fn with_renderer(renderer: Box<dyn DocumentRenderer>) -> Self {
        PdfView { renderer }
    }

    /// The document markup: one table per page, each repeating the header row.
    pub fn xhtml(&self, table: &Table, ctx: &CoreContext<'_>) -> Result<String, ViewError> {
        let rows_per_page = ctx
            .preferences()
            .get_usize(PDF_ROWS_PER_PAGE)
            .filter(|n| *n > 0)
            .unwrap_or(DEFAULT_ROWS_PER_PAGE);
        let titles = column_titles(table);
        let rows = rendered_rows(table, ctx)?;

        let mut html = HtmlBuilder::new();
        html.append("<?xml version=\"1.0\" encoding=\"UTF-8\"?>");
        html.newline();
        html.append("<!DOCTYPE html PUBLIC \"-//W3C//DTD XHTML 1.0 Strict//EN\" \"http://www.w3.org/TR/xhtml1/DTD/xhtml1-strict.dtd\">");
        html.newline();
        html.open_inline("html").attr("xmlns", "http://www.w3.org/1999/xhtml").close();
        html.open("head", 0).close();
        if let Some(css) = ctx.preference(PDF_CSS_LOCATION).filter(|s| !s.is_empty()) {
            html.open("link", 1)
                .attr("rel", "stylesheet")
                .attr("type", "text/css")
                .attr("href", css)
                .self_close();
        }
        if let Some(caption) = table.caption() {
            html.open("title", 1).close().text(caption).end_inline("title");
        }
        html.end("head", 0);
        html.open("body", 0).close();

        let pages: Vec<&[Vec<Value>]> = if rows.is_empty() {
            vec![&rows[..]]
        } else {
            rows.chunks(rows_per_page).collect()
        };
        log_debug!("PDF", "{} rows over {} pages", rows.len(), pages.len());

        for (index, page) in pages.iter().enumerate() {
            if index > 0 {
                html.open("div", 1)
                    .attr("style", "page-break-before: always")
                    .close()
                    .end_inline("div");
            }
            html.open("table", 1).attr("class", "pdfTable").close();
            if let Some(caption) = table.caption() {
                html.open("caption", 2).close().text(caption).end_inline("caption");
            }
            html.tr(2).close();
            for title in &titles {
                html.open("th", 3).close().text(title).end_inline("th");
            }
            html.tr_end(2);
            for values in page.iter() {
                html.tr(2).close();
                for value in values {
                    html.td(3).close().text(&value.to_string()).td_end();
                }
                html.tr_end(2);
            }
            html.end("table", 1);
        }

        html.end("body", 0);
        html.end("html", 0);
        Ok(html.build())
    }
}

impl ExportView for PdfView {
    fn content_type(&self) -> &str {
        self.renderer.content_type()
    }

    fn extension(&self) -> &str {
        self.renderer.extension()
    }

    fn render(&self, table: &Table, ctx: &CoreContext<'_>) -> Result<Vec<u8>, ViewError> {
        let xhtml = self.xhtml(table, ctx)?;
        self.renderer.render(&xhtml)
    }
}
