//! FILENAME: core/view/src/error.rs

use engine::{EngineError, ExportType, PropertyError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ViewError {
    #[error("Column '{0}' was already added to the row")]
    DuplicateColumn(String),

    #[error("No column for property '{0}'")]
    UnknownColumn(String),

    #[error("The {strategy} of column '{property}' is already in use and cannot be replaced")]
    StrategyAlreadyBound {
        strategy: &'static str,
        property: String,
    },

    #[error("The table has no columns. Add column properties before rendering.")]
    NoColumns,

    #[error("The items are not set. You need to set the items before rendering.")]
    MissingItems,

    #[error("Export type '{0}' is not enabled for this table")]
    ExportTypeNotEnabled(ExportType),

    #[error("It is too late to set the {object}. You need to set the {object} before using the {stage}.")]
    TooLate {
        object: &'static str,
        stage: &'static str,
    },

    #[error("Invalid validation pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("XLSX write error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("CSV write error: {0}")]
    Csv(#[from] ::csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<PropertyError> for ViewError {
    fn from(err: PropertyError) -> Self {
        ViewError::Engine(EngineError::Property(err))
    }
}
