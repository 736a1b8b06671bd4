//! FILENAME: core/worksheet/src/lib.rs
//! PURPOSE: Editable overlay over a table: validates submitted cell edits
//! and reports per-cell results without touching the items.

pub mod column;
pub mod error;
pub mod params;
pub mod worksheet;

pub use column::WorksheetColumn;
pub use error::WorksheetError;
pub use params::{row_key, CellEdit, WorksheetParams, ROW_KEY_SEPARATOR};
pub use worksheet::{Worksheet, WorksheetResponse, WorksheetRow};
