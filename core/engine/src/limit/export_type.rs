//! FILENAME: core/engine/src/limit/export_type.rs

use serde::{Deserialize, Serialize};
use std::fmt;

/// Output encodings that bypass the interactive view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExportType {
    Csv,
    Excel,
    Pdf,
    Json,
}

impl ExportType {
    pub const ALL: [ExportType; 4] = [ExportType::Csv, ExportType::Excel, ExportType::Pdf, ExportType::Json];

    pub fn to_param(self) -> &'static str {
        match self {
            ExportType::Csv => "csv",
            ExportType::Excel => "excel",
            ExportType::Pdf => "pdf",
            ExportType::Json => "json",
        }
    }

    pub fn from_param(param: &str) -> Option<ExportType> {
        match param.trim().to_lowercase().as_str() {
            "csv" => Some(ExportType::Csv),
            "excel" | "xlsx" => Some(ExportType::Excel),
            "pdf" => Some(ExportType::Pdf),
            "json" => Some(ExportType::Json),
            _ => None,
        }
    }
}

impl fmt::Display for ExportType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_param())
    }
}
