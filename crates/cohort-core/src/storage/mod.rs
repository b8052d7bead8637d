//! Storage module: spreadsheet/CSV decoding and export encoding

mod csv;
mod export;
mod xlsx;

pub use csv::{decode_csv, encode_csv};
pub use export::{Export, ExportFormat, encode, encode_xlsx, export_file_name};
pub use xlsx::decode_workbook;

use crate::error::DecodeError;
use cohort_engine::RawRow;
use std::path::Path;

/// Accepted upload formats.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SourceFormat {
    Xlsx,
    Xls,
    Csv,
}

impl SourceFormat {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "xlsx" => Some(SourceFormat::Xlsx),
            "xls" => Some(SourceFormat::Xls),
            "csv" => Some(SourceFormat::Csv),
            _ => None,
        }
    }

    pub fn from_mime(mime: &str) -> Option<Self> {
        let essence = mime.split(';').next().unwrap_or_default().trim();
        match essence.to_ascii_lowercase().as_str() {
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet" => {
                Some(SourceFormat::Xlsx)
            }
            "application/vnd.ms-excel" => Some(SourceFormat::Xls),
            "text/csv" => Some(SourceFormat::Csv),
            _ => None,
        }
    }

    /// Detect from a file name, falling back to a MIME type when the
    /// extension is missing or unknown.
    pub fn detect(name: &str, mime: Option<&str>) -> Result<Self, DecodeError> {
        Path::new(name)
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
            .or_else(|| mime.and_then(Self::from_mime))
            .ok_or_else(|| DecodeError::UnsupportedFormat(name.to_string()))
    }
}

/// Decode uploaded bytes into raw rows (first sheet only for workbooks).
pub fn decode(format: SourceFormat, bytes: &[u8]) -> Result<Vec<RawRow>, DecodeError> {
    match format {
        SourceFormat::Csv => decode_csv(bytes),
        SourceFormat::Xlsx | SourceFormat::Xls => decode_workbook(bytes),
    }
}

/// Read and decode a file from disk.
///
/// This does not touch any session, so it can run off the UI thread.
pub fn read_upload(path: &Path) -> Result<Vec<RawRow>, DecodeError> {
    let name = path.to_string_lossy();
    let format = SourceFormat::detect(&name, None)?;
    let bytes = std::fs::read(path)?;
    decode(format, &bytes)
}
