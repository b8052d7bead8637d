//! Error types for cohort core.

use cohort_engine::ValidationError;
use thiserror::Error;

/// The uploaded bytes could not be turned into rows.
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unsupported file type: {0}")]
    UnsupportedFormat(String),

    #[error("File is not valid UTF-8 text")]
    InvalidUtf8,

    #[error("Workbook error: {0}")]
    Workbook(#[from] calamine::Error),

    #[error("Workbook has no sheets")]
    NoSheets,

    #[error("File read was interrupted")]
    Interrupted,
}

/// The filtered view could not be encoded.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Spreadsheet writer error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("Unknown export format: {0}")]
    UnknownFormat(String),
}

/// Errors that can occur while driving a session.
#[derive(Error, Debug)]
pub enum CohortError {
    #[error("Could not read file: {0}")]
    Decode(#[from] DecodeError),

    #[error("Invalid file: {0}")]
    Validation(#[from] ValidationError),

    #[error("Export failed: {0}")]
    Export(#[from] ExportError),

    #[error("Upload of {name} is still in progress")]
    UploadPending { name: String },

    #[error("No upload is in progress")]
    NoPendingUpload,
}

pub type Result<T> = std::result::Result<T, CohortError>;
