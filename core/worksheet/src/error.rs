//! FILENAME: core/worksheet/src/error.rs

use engine::{EngineError, PropertyError};
use thiserror::Error;
use view::ViewError;

#[derive(Error, Debug)]
pub enum WorksheetError {
    #[error("The row has no unique properties. Set them before editing so rows can be identified.")]
    MissingUniqueProperties,

    #[error("More than one item has the row key '{0}'. The unique properties must identify a single item.")]
    DuplicateRowKey(String),

    #[error("No column for property '{0}'")]
    UnknownColumn(String),

    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    #[error("View error: {0}")]
    View(#[from] ViewError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<PropertyError> for WorksheetError {
    fn from(err: PropertyError) -> Self {
        WorksheetError::Engine(EngineError::Property(err))
    }
}
