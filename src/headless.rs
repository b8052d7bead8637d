//! Non-interactive mode: apply command-line filters, then print or export.

use crate::config::Config;
use anyhow::{Context as _, Result, anyhow, bail};
use cohort_core::{ExportFormat, Session};
use cohort_engine::{Facet, Field, SortState};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Filter and sort settings given on the command line.
#[derive(Debug, Default, PartialEq)]
pub struct Query {
    pub filters: Vec<(Facet, String)>,
    pub search: Option<String>,
    pub age: Option<(Option<i64>, Option<i64>)>,
    pub sort: Option<SortState>,
}

impl Query {
    pub fn is_empty(&self) -> bool {
        *self == Query::default()
    }

    /// Parse `FIELD=VALUE` where FIELD is a filterable column.
    pub fn parse_filter(arg: &str) -> Result<(Facet, String)> {
        let Some((name, value)) = arg.split_once('=') else {
            bail!("--filter expects FIELD=VALUE, got '{}'", arg);
        };
        let facet = Field::from_name(name)
            .and_then(Facet::from_field)
            .with_context(|| format!("'{}' is not a filterable field", name.trim()))?;
        Ok((facet, value.to_string()))
    }

    /// Parse `MIN:MAX`; either side may be left blank.
    pub fn parse_age(arg: &str) -> Result<(Option<i64>, Option<i64>)> {
        let Some((min, max)) = arg.split_once(':') else {
            bail!("--age expects MIN:MAX, got '{}'", arg);
        };
        let bound = |s: &str| -> Result<Option<i64>> {
            let s = s.trim();
            if s.is_empty() {
                return Ok(None);
            }
            s.parse()
                .map(Some)
                .with_context(|| format!("Invalid age bound: '{}'", s))
        };
        Ok((bound(min)?, bound(max)?))
    }

    pub fn parse_sort(arg: &str) -> Result<SortState> {
        SortState::parse(arg).with_context(|| format!("Invalid sort: '{}'", arg))
    }

    pub fn apply(&self, session: &mut Session) {
        for (facet, value) in &self.filters {
            if !session.filters().is_selected(*facet, value) {
                session.toggle_filter(*facet, value);
            }
        }
        if let Some(search) = &self.search {
            session.set_search(search.clone());
        }
        if let Some((min, max)) = self.age {
            session.set_age_range(min, max);
        }
        if let Some(sort) = self.sort {
            session.set_sort(sort);
        }
    }
}

pub fn print_stats(session: &Session, out: &mut impl Write) -> Result<()> {
    let stats = session.stats();
    let average = stats
        .average_age
        .map(|age| age.to_string())
        .unwrap_or_else(|| "-".to_string());
    writeln!(out, "Records:        {}", stats.total)?;
    writeln!(out, "Filtered:       {}", stats.filtered)?;
    writeln!(out, "Countries:      {}", stats.countries)?;
    writeln!(out, "Average age:    {}", average)?;
    writeln!(out, "Active:         {}", stats.active)?;
    writeln!(out, "Inactive:       {}", stats.inactive)?;
    writeln!(out, "Active filters: {}", session.active_filter_count())?;
    Ok(())
}

/// Print the sorted view as space-aligned columns.
pub fn print_list(session: &Session, out: &mut impl Write) -> Result<()> {
    let rows: Vec<Vec<String>> = session
        .ordered()
        .iter()
        .map(|record| record.values().iter().map(|v| v.to_string()).collect())
        .collect();

    let mut widths: Vec<usize> = Field::ALL
        .iter()
        .map(|f| f.column_name().chars().count())
        .collect();
    for row in &rows {
        for (width, value) in widths.iter_mut().zip(row) {
            *width = (*width).max(value.chars().count());
        }
    }

    let header: Vec<String> = Field::ALL.iter().map(|f| f.column_name().to_string()).collect();
    for row in std::iter::once(&header).chain(&rows) {
        let line: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|(value, width)| format!("{:<width$}", value, width = *width))
            .collect();
        writeln!(out, "{}", line.join("  ").trim_end())?;
    }
    Ok(())
}

/// Export the filtered view. A directory target gets the dated default
/// name and the configured format; a file target picks the format from its
/// extension.
pub fn export_to(session: &Session, target: &Path, config: &Config) -> Result<(PathBuf, usize)> {
    if target.is_dir() {
        let export = session.export(config.export_format())?;
        let path = export.write_to_dir(target)?;
        return Ok((path, export.records));
    }

    let format = ExportFormat::from_path(target)?;
    let export = session.export(format)?;
    std::fs::write(target, &export.bytes)
        .map_err(|e| anyhow!("Failed to write {}: {}", target.display(), e))?;
    Ok((target.to_path_buf(), export.records))
}

#[cfg(test)]
mod tests {
    use super::*;
    use cohort_engine::{Age, Record, SortDirection};

    fn record(first: &str, gender: &str, age: i64) -> Record {
        Record {
            first_name: first.into(),
            last_name: "Phiri".into(),
            gender: gender.into(),
            nationality: "Zambia".into(),
            age: Age::Years(age),
            degree: "BSc".into(),
            qualification: "Nursing".into(),
            email: format!("{}@example.org", first.to_lowercase()),
            status: "Active".into(),
        }
    }

    fn session() -> Session {
        Session::with_records(
            vec![
                record("Mutale", "Female", 27),
                record("Bwalya", "Male", 21),
                record("Chanda", "Female", 33),
            ],
            None,
        )
    }

    #[test]
    fn test_parse_filter() {
        assert_eq!(
            Query::parse_filter("gender=Female").unwrap(),
            (Facet::Gender, "Female".to_string())
        );
        assert_eq!(
            Query::parse_filter("Nationality=Côte d'Ivoire").unwrap(),
            (Facet::Nationality, "Côte d'Ivoire".to_string())
        );
        assert!(Query::parse_filter("email=x@y.z").is_err());
        assert!(Query::parse_filter("gender").is_err());
    }

    #[test]
    fn test_parse_age() {
        assert_eq!(Query::parse_age("18:30").unwrap(), (Some(18), Some(30)));
        assert_eq!(Query::parse_age(":30").unwrap(), (None, Some(30)));
        assert_eq!(Query::parse_age("18:").unwrap(), (Some(18), None));
        assert!(Query::parse_age("18").is_err());
        assert!(Query::parse_age("x:30").is_err());
    }

    #[test]
    fn test_apply_is_idempotent_for_repeated_values() {
        let mut s = session();
        let query = Query {
            filters: vec![
                (Facet::Gender, "Female".into()),
                (Facet::Gender, "Female".into()),
            ],
            ..Query::default()
        };
        query.apply(&mut s);
        assert_eq!(s.filtered().len(), 2);
        assert_eq!(s.active_filter_count(), 1);
    }

    #[test]
    fn test_print_list_is_sorted_and_aligned() {
        let mut s = session();
        Query {
            sort: Some(SortState::new(Field::Age, SortDirection::Descending)),
            ..Query::default()
        }
        .apply(&mut s);

        let mut out = Vec::new();
        print_list(&s, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("First Name  Last Name"));
        assert!(lines[1].starts_with("Chanda "));
        assert!(lines[3].starts_with("Bwalya "));
    }

    #[test]
    fn test_print_stats() {
        let mut s = session();
        s.set_age_min(Some(25));
        let mut out = Vec::new();
        print_stats(&s, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Records:        3\n"));
        assert!(text.contains("Filtered:       2\n"));
        assert!(text.contains("Average age:    27\n"));
        assert!(text.contains("Active filters: 1\n"));
    }

    #[test]
    fn test_export_to_directory_uses_dated_name() {
        let dir = tempfile::tempdir().unwrap();
        let (path, records) = export_to(&session(), dir.path(), &Config::default()).unwrap();
        assert_eq!(records, 3);
        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("au-youth-data-filtered-"));
        assert!(name.ends_with(".csv"));
    }

    #[test]
    fn test_export_to_unknown_extension_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(export_to(&session(), &dir.path().join("out.pdf"), &Config::default()).is_err());
    }
}
