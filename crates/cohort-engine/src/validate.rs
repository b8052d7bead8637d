//! Column validation and conversion of raw rows into records.

use crate::raw::{RawRow, RawValue};
use crate::record::{Age, Field, REQUIRED_COLUMNS, Record};
use thiserror::Error;

/// Rejection of an uploaded batch.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("missing required columns: {}", missing.join(", "))]
    MissingColumns { missing: Vec<&'static str> },
}

/// Required columns absent from the first row's key set.
///
/// An empty batch is missing every column.
pub fn missing_columns(rows: &[RawRow]) -> Vec<&'static str> {
    match rows.first() {
        None => REQUIRED_COLUMNS.to_vec(),
        Some(first) => REQUIRED_COLUMNS
            .iter()
            .copied()
            .filter(|column| !first.contains_key(column))
            .collect(),
    }
}

/// Validate a decoded batch and convert it into records.
///
/// Only the first row's keys are checked; later rows are trusted to share
/// the schema and any key they lack converts to an empty value.
pub fn validate(rows: &[RawRow]) -> Result<Vec<Record>, ValidationError> {
    let missing = missing_columns(rows);
    if !missing.is_empty() {
        return Err(ValidationError::MissingColumns { missing });
    }
    Ok(rows.iter().map(to_record).collect())
}

fn to_record(row: &RawRow) -> Record {
    let text = |field: Field| {
        row.get(field.column_name())
            .map(|value| value.to_string())
            .unwrap_or_default()
    };
    let age = match row.get(Field::Age.column_name()) {
        Some(RawValue::Number(n)) => Age::from_number(*n),
        Some(RawValue::Text(s)) => Age::parse(s),
        Some(other) => Age::Unparsed(other.to_string()),
        None => Age::Unparsed(String::new()),
    };

    Record {
        first_name: text(Field::FirstName),
        last_name: text(Field::LastName),
        gender: text(Field::Gender),
        nationality: text(Field::Nationality),
        age,
        degree: text(Field::Degree),
        qualification: text(Field::Qualification),
        email: text(Field::Email),
        status: text(Field::Status),
    }
}
