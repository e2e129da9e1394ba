//! Error types for the sheetflow library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for sheetflow operations.
#[derive(Debug, Error)]
pub enum SheetflowError {
    /// Input file does not exist.
    #[error("Input file not found: '{path}'")]
    NotFound { path: PathBuf },

    /// Error reading or writing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File is empty or malformed beyond what the detection heuristics recover.
    #[error("Format error: {0}")]
    Format(String),

    /// A validation report's hard failures, surfaced when the caller gates on validation.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Invalid request configuration (chunk threshold, output format, ...).
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error from the CSV library.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Error writing a workbook.
    #[error("Workbook write error: {0}")]
    WorkbookWrite(#[from] rust_xlsxwriter::XlsxError),

    /// Error reading a workbook.
    #[error("Workbook read error: {0}")]
    WorkbookRead(#[from] calamine::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SheetflowError {
    /// Suggested remediation for the user, paired with every fatal error.
    ///
    /// Detection and inference failures are never fatal, so they never reach
    /// this type; what does reach it should tell the user what to try next.
    pub fn remediation(&self) -> Option<&'static str> {
        match self {
            SheetflowError::NotFound { .. } => {
                Some("Check that the path is spelled correctly and the file has not been moved.")
            }
            SheetflowError::Io { .. } => {
                Some("Check file permissions and available disk space, then retry.")
            }
            SheetflowError::Format(_) => {
                Some("Verify the file is a well-formed CSV or workbook and is not truncated.")
            }
            SheetflowError::Validation(_) => {
                Some("Review the validation report and fix the listed errors before converting.")
            }
            SheetflowError::Config(_) => {
                Some("Adjust the conversion request settings and retry.")
            }
            SheetflowError::WorkbookRead(_) => {
                Some("Confirm the workbook opens in a spreadsheet application and is not password protected.")
            }
            SheetflowError::Csv(_) | SheetflowError::WorkbookWrite(_) | SheetflowError::Json(_) => None,
        }
    }
}

/// Result type alias for sheetflow operations.
pub type Result<T> = std::result::Result<T, SheetflowError>;
