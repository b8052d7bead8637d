//! Export of the filtered view to spreadsheet or delimited-text bytes.

use super::csv::encode_csv;
use crate::error::ExportError;
use chrono::NaiveDate;
use cohort_engine::{Age, Field, Record};
use rust_xlsxwriter::{Workbook, Worksheet};
use std::path::Path;

const SHEET_NAME: &str = "Filtered Youth Data";
const FILE_STEM: &str = "au-youth-data-filtered";

/// Export destination format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ExportFormat {
    /// A single-sheet `.xlsx` workbook.
    Spreadsheet,
    /// Comma-separated, double-quoted `.csv` text.
    #[default]
    DelimitedText,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Spreadsheet => "xlsx",
            ExportFormat::DelimitedText => "csv",
        }
    }

    /// Parse a format name or extension (`csv`, `xlsx`, `excel`, ...).
    pub fn parse(name: &str) -> Result<Self, ExportError> {
        match name.trim().trim_start_matches('.').to_ascii_lowercase().as_str() {
            "csv" | "text" | "delimited" => Ok(ExportFormat::DelimitedText),
            "xlsx" | "excel" | "spreadsheet" => Ok(ExportFormat::Spreadsheet),
            _ => Err(ExportError::UnknownFormat(name.to_string())),
        }
    }

    pub fn from_path(path: &Path) -> Result<Self, ExportError> {
        let ext = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default();
        Self::parse(ext)
    }
}

/// One encoded snapshot of the filtered view.
#[derive(Clone, Debug)]
pub struct Export {
    pub format: ExportFormat,
    pub file_name: String,
    pub records: usize,
    pub bytes: Vec<u8>,
}

impl Export {
    /// Write the bytes into `dir` under the dated file name.
    pub fn write_to_dir(&self, dir: &Path) -> Result<std::path::PathBuf, ExportError> {
        let path = dir.join(&self.file_name);
        std::fs::write(&path, &self.bytes)?;
        Ok(path)
    }
}

/// Default file name carrying the export date, e.g.
/// `au-youth-data-filtered-2024-05-01.csv`.
pub fn export_file_name(format: ExportFormat, date: NaiveDate) -> String {
    format!("{}-{}.{}", FILE_STEM, date.format("%Y-%m-%d"), format.extension())
}

/// Encode records in display field order.
pub fn encode(format: ExportFormat, records: &[Record]) -> Result<Vec<u8>, ExportError> {
    match format {
        ExportFormat::DelimitedText => Ok(encode_csv(records).into_bytes()),
        ExportFormat::Spreadsheet => encode_xlsx(records),
    }
}

/// Encode records as a one-sheet workbook with a header row.
pub fn encode_xlsx(records: &[Record]) -> Result<Vec<u8>, ExportError> {
    let mut workbook = Workbook::new();
    let mut worksheet = Worksheet::new();
    worksheet.set_name(SHEET_NAME)?;

    for field in Field::ALL {
        worksheet.write_string(0, field.index() as u16, field.column_name())?;
    }

    for (idx, record) in records.iter().enumerate() {
        let row = (idx + 1) as u32;
        for field in Field::ALL {
            let col = field.index() as u16;
            match (&field, &record.age) {
                (Field::Age, Age::Years(years)) => {
                    worksheet.write_number(row, col, *years as f64)?;
                }
                _ => {
                    let value = field.value(record);
                    worksheet.write_string(row, col, &*value)?;
                }
            }
        }
    }

    workbook.push_worksheet(worksheet);
    Ok(workbook.save_to_buffer()?)
}
