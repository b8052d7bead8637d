//! Declarative multi-field filter.
//!
//! A [`FilterSpec`] is plain data; [`apply`] is a pure function of the record
//! slice and the spec, so callers recompute the filtered view whenever either
//! changes instead of patching a cached result.

use crate::record::{Age, Field, Record};
use std::collections::{BTreeSet, HashSet};

/// Columns that can be constrained by a set of accepted values.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Facet {
    Gender,
    Nationality,
    Degree,
    Qualification,
    Status,
}

impl Facet {
    pub const ALL: [Facet; 5] = [
        Facet::Gender,
        Facet::Nationality,
        Facet::Degree,
        Facet::Qualification,
        Facet::Status,
    ];

    pub fn field(self) -> Field {
        match self {
            Facet::Gender => Field::Gender,
            Facet::Nationality => Field::Nationality,
            Facet::Degree => Field::Degree,
            Facet::Qualification => Field::Qualification,
            Facet::Status => Field::Status,
        }
    }

    pub fn from_field(field: Field) -> Option<Facet> {
        Facet::ALL.into_iter().find(|facet| facet.field() == field)
    }

    pub fn label(self) -> &'static str {
        match self {
            Facet::Gender => "gender",
            Facet::Nationality => "nationality",
            Facet::Degree => "degree",
            Facet::Qualification => "qualification",
            Facet::Status => "status",
        }
    }

    pub fn value(self, record: &Record) -> &str {
        match self {
            Facet::Gender => &record.gender,
            Facet::Nationality => &record.nationality,
            Facet::Degree => &record.degree,
            Facet::Qualification => &record.qualification,
            Facet::Status => &record.status,
        }
    }
}

/// Inclusive age bounds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct AgeRange {
    pub min: i64,
    pub max: i64,
}

impl AgeRange {
    /// Bounds used when no record has a numeric age.
    pub const FULL: AgeRange = AgeRange {
        min: i64::MIN,
        max: i64::MAX,
    };

    pub fn new(min: i64, max: i64) -> Self {
        Self { min, max }
    }

    /// Observed min/max over the numeric ages of `records`, or [`AgeRange::FULL`]
    /// when there are none.
    pub fn observed(records: &[Record]) -> Self {
        let mut ages = records.iter().filter_map(|r| r.age.years());
        let Some(first) = ages.next() else {
            return AgeRange::FULL;
        };
        ages.fold(AgeRange::new(first, first), |range, age| {
            AgeRange::new(range.min.min(age), range.max.max(age))
        })
    }

    /// Non-numeric ages never fall inside a range.
    pub fn contains(&self, age: &Age) -> bool {
        match age {
            Age::Years(years) => *years >= self.min && *years <= self.max,
            Age::Unparsed(_) => false,
        }
    }
}

impl Default for AgeRange {
    fn default() -> Self {
        AgeRange::FULL
    }
}

/// The user's current inclusion predicates.
///
/// Empty sets place no constraint. Values within a set are OR'd, sets and the
/// other predicates are AND'd.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FilterSpec {
    pub gender: BTreeSet<String>,
    pub nationality: BTreeSet<String>,
    pub degree: BTreeSet<String>,
    pub qualification: BTreeSet<String>,
    pub status: BTreeSet<String>,
    pub age_range: AgeRange,
    pub search: String,
}

impl FilterSpec {
    /// The default spec for a dataset with the given observed age bounds.
    pub fn for_bounds(bounds: AgeRange) -> Self {
        Self {
            age_range: bounds,
            ..Self::default()
        }
    }

    pub fn values(&self, facet: Facet) -> &BTreeSet<String> {
        match facet {
            Facet::Gender => &self.gender,
            Facet::Nationality => &self.nationality,
            Facet::Degree => &self.degree,
            Facet::Qualification => &self.qualification,
            Facet::Status => &self.status,
        }
    }

    fn values_mut(&mut self, facet: Facet) -> &mut BTreeSet<String> {
        match facet {
            Facet::Gender => &mut self.gender,
            Facet::Nationality => &mut self.nationality,
            Facet::Degree => &mut self.degree,
            Facet::Qualification => &mut self.qualification,
            Facet::Status => &mut self.status,
        }
    }

    pub fn is_selected(&self, facet: Facet, value: &str) -> bool {
        self.values(facet).contains(value)
    }

    /// Add `value` to the facet's set, or remove it if already present.
    /// Returns whether the value is selected afterwards.
    pub fn toggle(&mut self, facet: Facet, value: &str) -> bool {
        let values = self.values_mut(facet);
        if values.remove(value) {
            false
        } else {
            values.insert(value.to_string());
            true
        }
    }

    pub fn set_search(&mut self, text: impl Into<String>) {
        self.search = text.into();
    }

    /// Set the lower age bound; `None` restores the data-derived bound.
    pub fn set_age_min(&mut self, min: Option<i64>, bounds: AgeRange) {
        self.age_range.min = min.unwrap_or(bounds.min);
    }

    /// Set the upper age bound; `None` restores the data-derived bound.
    pub fn set_age_max(&mut self, max: Option<i64>, bounds: AgeRange) {
        self.age_range.max = max.unwrap_or(bounds.max);
    }

    /// Reset every predicate to the default for the current dataset.
    pub fn clear(&mut self, bounds: AgeRange) {
        *self = Self::for_bounds(bounds);
    }

    pub fn is_default(&self, bounds: AgeRange) -> bool {
        self.active_filter_count(bounds) == 0
    }

    /// Number of active constraints: one per non-empty set, one for a
    /// non-empty search and one when the age range differs from `bounds`.
    pub fn active_filter_count(&self, bounds: AgeRange) -> usize {
        let sets = Facet::ALL
            .iter()
            .filter(|facet| !self.values(**facet).is_empty())
            .count();
        sets + usize::from(!self.search.is_empty()) + usize::from(self.age_range != bounds)
    }

    /// Whether a single record passes every predicate.
    pub fn matches(&self, record: &Record) -> bool {
        Matcher::new(self).matches(record)
    }
}

/// A spec with its search needle lowered once.
struct Matcher<'a> {
    spec: &'a FilterSpec,
    needle: String,
}

impl<'a> Matcher<'a> {
    fn new(spec: &'a FilterSpec) -> Self {
        Self {
            spec,
            needle: spec.search.to_lowercase(),
        }
    }

    fn matches(&self, record: &Record) -> bool {
        self.matches_search(record)
            && self.in_set(Facet::Gender, record)
            && self.in_set(Facet::Nationality, record)
            && self.spec.age_range.contains(&record.age)
            && self.in_set(Facet::Degree, record)
            && self.in_set(Facet::Qualification, record)
            && self.in_set(Facet::Status, record)
    }

    fn matches_search(&self, record: &Record) -> bool {
        if self.needle.is_empty() {
            return true;
        }
        [
            &record.first_name,
            &record.last_name,
            &record.email,
            &record.nationality,
            &record.degree,
            &record.qualification,
        ]
        .iter()
        .any(|value| value.to_lowercase().contains(&self.needle))
    }

    fn in_set(&self, facet: Facet, record: &Record) -> bool {
        let values = self.spec.values(facet);
        values.is_empty() || values.contains(facet.value(record))
    }
}

/// Records passing `spec`, in their original relative order.
pub fn apply<'a>(records: &'a [Record], spec: &FilterSpec) -> Vec<&'a Record> {
    let matcher = Matcher::new(spec);
    records.iter().filter(|r| matcher.matches(r)).collect()
}

/// Distinct non-empty values of a facet column, in first-seen order.
pub fn facet_values(records: &[Record], facet: Facet) -> Vec<&str> {
    let mut seen = HashSet::new();
    records
        .iter()
        .map(|r| facet.value(r))
        .filter(|value| !value.is_empty() && seen.insert(*value))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(first: &str, age: Age, status: &str) -> Record {
        Record {
            first_name: first.to_string(),
            last_name: "Doe".to_string(),
            gender: "Female".to_string(),
            nationality: "Kenya".to_string(),
            age,
            degree: "BSc".to_string(),
            qualification: "Nursing".to_string(),
            email: format!("{}@example.org", first.to_lowercase()),
            status: status.to_string(),
        }
    }

    #[test]
    fn test_observed_bounds_skip_unparsed() {
        let records = vec![
            record("A", Age::Years(30), "Active"),
            record("B", Age::Unparsed("?".into()), "Active"),
            record("C", Age::Years(19), "Active"),
        ];
        assert_eq!(AgeRange::observed(&records), AgeRange::new(19, 30));
    }

    #[test]
    fn test_observed_bounds_fall_back_to_full_range() {
        let records = vec![record("A", Age::Unparsed("?".into()), "Active")];
        assert_eq!(AgeRange::observed(&records), AgeRange::FULL);
        assert_eq!(AgeRange::observed(&[]), AgeRange::FULL);
    }

    #[test]
    fn test_unparsed_age_always_fails_age_predicate() {
        let records = vec![record("A", Age::Unparsed("?".into()), "Active")];
        let spec = FilterSpec::for_bounds(AgeRange::FULL);
        assert!(apply(&records, &spec).is_empty());
    }

    #[test]
    fn test_search_is_case_insensitive_across_fields() {
        let records = vec![
            record("Amara", Age::Years(24), "Active"),
            record("Kofi", Age::Years(31), "Alumni"),
        ];
        let mut spec = FilterSpec::for_bounds(AgeRange::observed(&records));
        spec.set_search("AMA");
        assert_eq!(apply(&records, &spec).len(), 1);
        spec.set_search("EXAMPLE.ORG");
        assert_eq!(apply(&records, &spec).len(), 2);
        spec.set_search("nursing");
        assert_eq!(apply(&records, &spec).len(), 2);
        // Status is not a search field.
        spec.set_search("alumni");
        assert!(apply(&records, &spec).is_empty());
    }

    #[test]
    fn test_set_membership_is_case_sensitive() {
        let records = vec![record("Amara", Age::Years(24), "Active")];
        let mut spec = FilterSpec::for_bounds(AgeRange::observed(&records));
        spec.toggle(Facet::Status, "active");
        assert!(apply(&records, &spec).is_empty());
        spec.toggle(Facet::Status, "Active");
        assert_eq!(apply(&records, &spec).len(), 1);
    }

    #[test]
    fn test_toggle_adds_then_removes() {
        let mut spec = FilterSpec::default();
        assert!(spec.toggle(Facet::Gender, "Male"));
        assert!(spec.is_selected(Facet::Gender, "Male"));
        assert!(!spec.toggle(Facet::Gender, "Male"));
        assert!(spec.gender.is_empty());
    }

    #[test]
    fn test_active_filter_count() {
        let bounds = AgeRange::new(18, 35);
        let mut spec = FilterSpec::for_bounds(bounds);
        assert_eq!(spec.active_filter_count(bounds), 0);
        assert!(spec.is_default(bounds));

        spec.toggle(Facet::Gender, "Male");
        spec.toggle(Facet::Gender, "Female");
        assert_eq!(spec.active_filter_count(bounds), 1);

        spec.set_search("a");
        spec.set_age_min(Some(20), bounds);
        assert_eq!(spec.active_filter_count(bounds), 3);

        spec.set_age_min(None, bounds);
        assert_eq!(spec.active_filter_count(bounds), 2);

        spec.clear(bounds);
        assert_eq!(spec, FilterSpec::for_bounds(bounds));
    }

    #[test]
    fn test_facet_values_first_seen_order_without_blanks() {
        let mut records = vec![
            record("A", Age::Years(20), "Alumni"),
            record("B", Age::Years(21), "Active"),
            record("C", Age::Years(22), "Alumni"),
            record("D", Age::Years(23), ""),
        ];
        records[1].gender = "Male".to_string();
        assert_eq!(facet_values(&records, Facet::Status), vec!["Alumni", "Active"]);
        assert_eq!(facet_values(&records, Facet::Gender), vec!["Female", "Male"]);
    }

    #[test]
    fn test_facet_from_field() {
        assert_eq!(Facet::from_field(Field::Status), Some(Facet::Status));
        assert_eq!(Facet::from_field(Field::Age), None);
    }
}
