//! FILENAME: core/view/src/lib.rs
//! PURPOSE: Table model, cell strategies and the views that render a
//! resolved page.
//! CONTEXT: Builds on the engine crate's CoreContext. The facade is the
//! usual entry point; the individual views can be driven directly.

pub mod csv;
pub mod editor;
pub mod error;
pub mod excel;
pub mod export;
pub mod facade;
pub mod html;
pub mod json;
pub mod pdf;
pub mod renderer;
pub mod table;
pub mod validation;

// Re-export commonly used types at the crate root
pub use crate::csv::CsvView;
pub use editor::{
    BasicCellEditor, BooleanCellEditor, CellEditError, CellEditor, DateCellEditor,
    DecimalCellEditor, IntegerCellEditor, TextCellEditor,
};
pub use error::ViewError;
pub use excel::{sanitize_sheet_name, ExcelView};
pub use export::{export, export_view, ExportResponse, ExportSink, ExportView};
pub use facade::{RenderOutcome, TableFacade};
pub use html::{HtmlBuilder, HtmlSnippets, HtmlView, Toolbar, ToolbarItem};
pub use json::JsonView;
pub use pdf::{DocumentRenderer, PdfView, XhtmlDocumentRenderer};
pub use renderer::{
    BasicCellRenderer, CellRenderer, DateCellRenderer, FilterRenderer, FnCellRenderer,
    HeaderRenderer, HtmlFilterRenderer, HtmlHeaderRenderer,
};
pub use table::{Column, Row, Table};
pub use validation::{Rule, Validation};
