//! Untyped rows as they come out of a spreadsheet decoder.
//!
//! A [`RawRow`] maps header names to the non-empty cells of one data row.
//! Empty cells have no entry at all, so a row's key set can be smaller than
//! the header.

use std::collections::HashMap;
use std::fmt;

/// A decoded, non-empty cell value.
#[derive(Clone, Debug, PartialEq)]
pub enum RawValue {
    Text(String),
    Number(f64),
    Bool(bool),
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawValue::Text(text) => f.write_str(text),
            // Whole numbers print without a trailing ".0" (24.0 -> "24").
            RawValue::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => {
                write!(f, "{}", *n as i64)
            }
            RawValue::Number(n) => write!(f, "{}", n),
            RawValue::Bool(b) => write!(f, "{}", b),
        }
    }
}

/// One decoded data row, keyed by header name, in column order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawRow {
    cells: Vec<(String, RawValue)>,
}

impl RawRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a cell, replacing any value already stored under `key`.
    pub fn insert(&mut self, key: impl Into<String>, value: RawValue) {
        let key = key.into();
        if let Some(slot) = self.cells.iter_mut().find(|(k, _)| *k == key) {
            slot.1 = value;
        } else {
            self.cells.push((key, value));
        }
    }

    pub fn get(&self, key: &str) -> Option<&RawValue> {
        self.cells.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, RawValue)> for RawRow {
    fn from_iter<I: IntoIterator<Item = (K, RawValue)>>(iter: I) -> Self {
        let mut row = RawRow::new();
        for (key, value) in iter {
            row.insert(key, value);
        }
        row
    }
}

/// Turn raw header cells into unique keys.
///
/// Blank headers become `__EMPTY`; repeated names get `_1`, `_2`, ...
/// suffixes in order of appearance.
pub fn header_keys(header: &[String]) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut keys = Vec::with_capacity(header.len());

    for name in header {
        let base = if name.trim().is_empty() {
            "__EMPTY".to_string()
        } else {
            name.clone()
        };

        let key = match seen.get(&base).copied() {
            None => base.clone(),
            Some(mut counter) => loop {
                counter += 1;
                let candidate = format!("{}_{}", base, counter);
                if !seen.contains_key(&candidate) {
                    seen.insert(base.clone(), counter);
                    break candidate;
                }
            },
        };
        seen.entry(key.clone()).or_insert(0);
        seen.entry(base).or_insert(0);
        keys.push(key);
    }

    keys
}

/// Assemble keyed rows from a header and a body of optional cells.
///
/// Rows whose cells are all empty are dropped. Cells beyond the header width
/// are ignored.
pub fn assemble_rows<I>(header: &[String], body: I) -> Vec<RawRow>
where
    I: IntoIterator<Item = Vec<Option<RawValue>>>,
{
    let keys = header_keys(header);
    body.into_iter()
        .filter_map(|cells| {
            let row: RawRow = keys
                .iter()
                .zip(cells)
                .filter_map(|(key, cell)| cell.map(|value| (key.clone(), value)))
                .collect();
            (!row.is_empty()).then_some(row)
        })
        .collect()
}
