//! Youth record schema.
//!
//! A [`Record`] has nine fixed fields. [`Field`] names them in display order
//! and maps each one to the exact spreadsheet column it is read from.

use std::borrow::Cow;
use std::fmt;

/// Column names every uploaded sheet must carry, in display order.
pub const REQUIRED_COLUMNS: [&str; 9] = [
    "First Name",
    "Last Name",
    "Gender",
    "Nationality",
    "Age",
    "Degree",
    "Qualification",
    "Email",
    "Status",
];

/// A column of the youth record schema.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    FirstName,
    LastName,
    Gender,
    Nationality,
    Age,
    Degree,
    Qualification,
    Email,
    Status,
}

impl Field {
    /// All fields in display order.
    pub const ALL: [Field; 9] = [
        Field::FirstName,
        Field::LastName,
        Field::Gender,
        Field::Nationality,
        Field::Age,
        Field::Degree,
        Field::Qualification,
        Field::Email,
        Field::Status,
    ];

    /// Exact column name used in uploaded and exported sheets.
    pub fn column_name(self) -> &'static str {
        REQUIRED_COLUMNS[self.index()]
    }

    /// Position in display order.
    pub fn index(self) -> usize {
        match self {
            Field::FirstName => 0,
            Field::LastName => 1,
            Field::Gender => 2,
            Field::Nationality => 3,
            Field::Age => 4,
            Field::Degree => 5,
            Field::Qualification => 6,
            Field::Email => 7,
            Field::Status => 8,
        }
    }

    /// Parse a field from its exact column name, or from a short alias
    /// (case-insensitive) such as `first`, `last_name` or `age`.
    pub fn from_name(name: &str) -> Option<Field> {
        if let Some(field) = Field::ALL.iter().find(|f| f.column_name() == name) {
            return Some(*field);
        }
        let alias: String = name
            .trim()
            .chars()
            .filter(|c| !matches!(c, ' ' | '_' | '-'))
            .flat_map(char::to_lowercase)
            .collect();
        match alias.as_str() {
            "first" | "firstname" => Some(Field::FirstName),
            "last" | "lastname" | "surname" => Some(Field::LastName),
            "gender" => Some(Field::Gender),
            "nationality" | "country" => Some(Field::Nationality),
            "age" => Some(Field::Age),
            "degree" => Some(Field::Degree),
            "qualification" => Some(Field::Qualification),
            "email" => Some(Field::Email),
            "status" => Some(Field::Status),
            _ => None,
        }
    }

    /// Display value of this field for a record.
    pub fn value(self, record: &Record) -> Cow<'_, str> {
        match self {
            Field::FirstName => Cow::Borrowed(&record.first_name),
            Field::LastName => Cow::Borrowed(&record.last_name),
            Field::Gender => Cow::Borrowed(&record.gender),
            Field::Nationality => Cow::Borrowed(&record.nationality),
            Field::Age => match &record.age {
                Age::Years(years) => Cow::Owned(years.to_string()),
                Age::Unparsed(text) => Cow::Borrowed(text),
            },
            Field::Degree => Cow::Borrowed(&record.degree),
            Field::Qualification => Cow::Borrowed(&record.qualification),
            Field::Email => Cow::Borrowed(&record.email),
            Field::Status => Cow::Borrowed(&record.status),
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column_name())
    }
}

/// Age column value.
///
/// Spreadsheets do not guarantee a number here, so the raw text is kept when
/// it does not parse. Only whole numbers count as numeric.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Age {
    Years(i64),
    Unparsed(String),
}

impl Age {
    /// Parse age text. Surrounding whitespace is ignored for the numeric check,
    /// but kept in the unparsed fallback.
    pub fn parse(text: &str) -> Age {
        let trimmed = text.trim();
        if let Ok(years) = trimmed.parse::<i64>() {
            return Age::Years(years);
        }
        match trimmed.parse::<f64>() {
            Ok(n) => match whole_number(n) {
                Some(years) => Age::Years(years),
                None => Age::Unparsed(text.to_string()),
            },
            Err(_) => Age::Unparsed(text.to_string()),
        }
    }

    /// Convert a decoded numeric cell.
    pub fn from_number(n: f64) -> Age {
        match whole_number(n) {
            Some(years) => Age::Years(years),
            None => Age::Unparsed(n.to_string()),
        }
    }

    pub fn years(&self) -> Option<i64> {
        match self {
            Age::Years(years) => Some(*years),
            Age::Unparsed(_) => None,
        }
    }
}

fn whole_number(n: f64) -> Option<i64> {
    // i64::MAX as f64 rounds up to 2^63, so the upper bound is exclusive.
    if n.is_finite() && n.fract() == 0.0 && n >= i64::MIN as f64 && n < i64::MAX as f64 {
        Some(n as i64)
    } else {
        None
    }
}

impl fmt::Display for Age {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Age::Years(years) => write!(f, "{}", years),
            Age::Unparsed(text) => f.write_str(text),
        }
    }
}

/// One validated youth-program entry.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Record {
    pub first_name: String,
    pub last_name: String,
    pub gender: String,
    pub nationality: String,
    pub age: Age,
    pub degree: String,
    pub qualification: String,
    pub email: String,
    pub status: String,
}

impl Record {
    /// Status classification used for display.
    ///
    /// Matches any status containing "active" regardless of case, which
    /// includes values such as "Inactive".
    pub fn is_active(&self) -> bool {
        self.status.to_lowercase().contains("active")
    }

    /// Display values in field order.
    pub fn values(&self) -> [Cow<'_, str>; 9] {
        Field::ALL.map(|field| field.value(self))
    }
}
