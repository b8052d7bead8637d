//! CSV import/export functionality

use crate::error::DecodeError;
use cohort_engine::raw::assemble_rows;
use cohort_engine::{Field, RawRow, RawValue, Record};

const UTF8_BOM: &str = "\u{feff}";

/// Decode CSV bytes into keyed rows. The first line is the header.
pub fn decode_csv(bytes: &[u8]) -> Result<Vec<RawRow>, DecodeError> {
    let content = std::str::from_utf8(bytes).map_err(|_| DecodeError::InvalidUtf8)?;
    let content = content.strip_prefix(UTF8_BOM).unwrap_or(content);

    let mut lines = content.lines();
    let Some(header_line) = lines.next() else {
        return Ok(Vec::new());
    };
    let header = parse_csv_line(header_line);
    let body = lines.map(|line| {
        split_csv_line(line)
            .into_iter()
            .map(|field| field.into_value())
            .collect::<Vec<_>>()
    });

    Ok(assemble_rows(&header, body))
}

/// One field of a CSV line and whether it was written in quotes.
struct CsvField {
    text: String,
    quoted: bool,
}

impl CsvField {
    /// Quoted fields are always text, so `"1.50"` stays `1.50`.
    fn into_value(self) -> Option<RawValue> {
        if !self.quoted {
            return parse_csv_field(&self.text);
        }
        (!self.text.is_empty()).then_some(RawValue::Text(self.text))
    }
}

/// Parse a single CSV line, handling quoted fields
pub(crate) fn parse_csv_line(line: &str) -> Vec<String> {
    split_csv_line(line).into_iter().map(|field| field.text).collect()
}

fn split_csv_line(line: &str) -> Vec<CsvField> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut field_was_quoted = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            if c == '"' {
                // Check for escaped quote
                if chars.peek() == Some(&'"') {
                    current.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            } else {
                current.push(c);
            }
        } else {
            match c {
                '"' => {
                    in_quotes = true;
                    field_was_quoted = true;
                }
                ',' => {
                    fields.push(finish_field(&mut current, field_was_quoted));
                    field_was_quoted = false;
                }
                _ => current.push(c),
            }
        }
    }
    fields.push(finish_field(&mut current, field_was_quoted));
    fields
}

fn finish_field(current: &mut String, quoted: bool) -> CsvField {
    let text = std::mem::take(current);
    let text = if quoted { text } else { text.trim().to_string() };
    CsvField { text, quoted }
}

/// Parse an unquoted CSV field into a cell value
/// - Empty string -> no cell
/// - Valid number -> Number (unless it has leading zeros like "007")
/// - Otherwise -> Text
pub(crate) fn parse_csv_field(field: &str) -> Option<RawValue> {
    let trimmed = field.trim();
    if trimmed.is_empty() {
        return None;
    }

    // Preserve strings that look like numbers but have leading zeros (e.g., "007", "00123")
    // unless they're just "0" or start with "0."
    if trimmed.starts_with('0')
        && trimmed.len() > 1
        && !trimmed.starts_with("0.")
        && trimmed.chars().nth(1).is_some_and(|c| c.is_ascii_digit())
    {
        return Some(RawValue::Text(trimmed.to_string()));
    }

    match trimmed.parse::<f64>() {
        Ok(n) if n.is_finite() => Some(RawValue::Number(n)),
        _ => Some(RawValue::Text(trimmed.to_string())),
    }
}

/// Encode records as delimited text.
///
/// The header line carries the column names; every value is wrapped in
/// double quotes. Embedded quotes are written as-is, not doubled, so values
/// containing `"` do not survive a round trip.
pub fn encode_csv<'a, I>(records: I) -> String
where
    I: IntoIterator<Item = &'a Record>,
{
    let header: Vec<&str> = Field::ALL.iter().map(|f| f.column_name()).collect();
    let mut out = header.join(",");
    out.push('\n');

    for record in records {
        let fields: Vec<String> = record
            .values()
            .iter()
            .map(|value| format!("\"{}\"", value))
            .collect();
        out.push_str(&fields.join(","));
        out.push('\n');
    }

    out
}
