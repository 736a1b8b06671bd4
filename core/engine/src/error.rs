//! FILENAME: core/engine/src/error.rs

use crate::value::ValueType;
use thiserror::Error;

/// Failures of the property accessor.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PropertyError {
    #[error("Property path is empty or has an empty segment: '{0}'")]
    EmptyPath(String),

    #[error("Property not found: {0}")]
    NotFound(String),

    #[error("Property is not writable: {0}")]
    NotWritable(String),
}

/// Configuration errors raised while resolving a Limit against a collection.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Unknown property '{0}'. Filters and sorts must reference a readable property.")]
    UnknownProperty(String),

    #[error("No filter matcher registered for type {value_type} on property '{property}'")]
    MissingMatcher {
        value_type: ValueType,
        property: String,
    },

    #[error("Item collection reported {len} items but has none at index {index}")]
    MissingItem { index: usize, len: usize },

    #[error("Property error: {0}")]
    Property(#[from] PropertyError),

    #[error("Limit state error: {0}")]
    State(#[from] serde_json::Error),
}
