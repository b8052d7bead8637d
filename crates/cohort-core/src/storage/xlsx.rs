//! Workbook (.xlsx/.xls) import.

use crate::error::DecodeError;
use calamine::{Data, Reader, open_workbook_auto_from_rs};
use cohort_engine::raw::assemble_rows;
use cohort_engine::{RawRow, RawValue};
use std::io::Cursor;

/// Decode the first worksheet of a workbook into keyed rows.
///
/// The workbook type is sniffed from the bytes, so `.xls` and `.xlsx`
/// share this path.
pub fn decode_workbook(bytes: &[u8]) -> Result<Vec<RawRow>, DecodeError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))?;
    let range = workbook.worksheet_range_at(0).ok_or(DecodeError::NoSheets)??;

    let mut rows = range.rows();
    let Some(header_row) = rows.next() else {
        return Ok(Vec::new());
    };
    let header: Vec<String> = header_row
        .iter()
        .map(|cell| cell_value(cell).map(|v| v.to_string()).unwrap_or_default())
        .collect();
    let body = rows.map(|row| row.iter().map(cell_value).collect::<Vec<_>>());

    Ok(assemble_rows(&header, body))
}

/// Map a worksheet cell onto a raw value; empty and error cells yield `None`.
fn cell_value(cell: &Data) -> Option<RawValue> {
    match cell {
        Data::Empty | Data::Error(_) => None,
        Data::String(s) if s.is_empty() => None,
        Data::String(s) => Some(RawValue::Text(s.clone())),
        Data::Int(i) => Some(RawValue::Number(*i as f64)),
        Data::Float(f) => Some(RawValue::Number(*f)),
        Data::Bool(b) => Some(RawValue::Bool(*b)),
        other => Some(RawValue::Text(other.to_string())),
    }
}
