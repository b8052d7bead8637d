use super::Session;
use cohort_engine::{Facet, Field, SortState};

impl Session {
    /// Toggle one accepted value of a facet. Returns whether it is selected
    /// afterwards.
    pub fn toggle_filter(&mut self, facet: Facet, value: &str) -> bool {
        let selected = self.filters.toggle(facet, value);
        tracing::debug!(facet = facet.label(), value, selected, "toggled filter");
        selected
    }

    pub fn set_search(&mut self, text: impl Into<String>) {
        self.filters.set_search(text);
    }

    /// `None` restores the data-derived lower bound.
    pub fn set_age_min(&mut self, min: Option<i64>) {
        self.filters.set_age_min(min, self.bounds);
    }

    /// `None` restores the data-derived upper bound.
    pub fn set_age_max(&mut self, max: Option<i64>) {
        self.filters.set_age_max(max, self.bounds);
    }

    /// Set both ends of the age range. An inverted range is accepted and
    /// simply matches nothing.
    pub fn set_age_range(&mut self, min: Option<i64>, max: Option<i64>) {
        self.set_age_min(min);
        self.set_age_max(max);
    }

    pub fn clear_filters(&mut self) {
        self.filters.clear(self.bounds);
        tracing::debug!("cleared filters");
    }

    pub fn active_filter_count(&self) -> usize {
        self.filters.active_filter_count(self.bounds)
    }

    pub fn has_active_filters(&self) -> bool {
        !self.filters.is_default(self.bounds)
    }

    /// Click-a-header behaviour: same field flips direction, a new field
    /// starts ascending.
    pub fn toggle_sort(&mut self, field: Field) {
        self.sort.toggle(field);
    }

    pub fn set_sort(&mut self, state: SortState) {
        self.sort = state;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cohort_engine::{Age, AgeRange, Record, SortDirection};

    fn record(first: &str, age: Age, gender: &str) -> Record {
        Record {
            first_name: first.into(),
            last_name: "Mensah".into(),
            gender: gender.into(),
            nationality: "Ghana".into(),
            age,
            degree: "BA".into(),
            qualification: "Law".into(),
            email: String::new(),
            status: "Active".into(),
        }
    }

    fn session() -> Session {
        Session::with_records(
            vec![
                record("Ama", Age::Years(22), "Female"),
                record("Kojo", Age::Years(28), "Male"),
            ],
            None,
        )
    }

    #[test]
    fn test_age_bounds_follow_dataset() {
        let s = session();
        assert_eq!(s.age_bounds(), AgeRange::new(22, 28));
        assert_eq!(s.filters().age_range, AgeRange::new(22, 28));
        assert_eq!(s.active_filter_count(), 0);
    }

    #[test]
    fn test_each_predicate_counts_once() {
        let mut s = session();
        s.toggle_filter(Facet::Gender, "Female");
        s.toggle_filter(Facet::Gender, "Male");
        s.set_search("ama");
        s.set_age_min(Some(25));
        assert_eq!(s.active_filter_count(), 3);

        s.set_age_min(None);
        assert_eq!(s.active_filter_count(), 2);

        s.clear_filters();
        assert!(!s.has_active_filters());
    }

    #[test]
    fn test_toggle_sort_flips_then_resets() {
        let mut s = session();
        s.toggle_sort(Field::FirstName);
        assert_eq!(s.sort_state().direction, SortDirection::Descending);
        s.toggle_sort(Field::Age);
        assert_eq!(s.sort_state(), SortState::new(Field::Age, SortDirection::Ascending));
    }
}
