//! Summary figures shown above the records table.

use crate::record::Record;
use std::collections::HashSet;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DatasetStats {
    /// Records in the dataset.
    pub total: usize,
    /// Records in the filtered view.
    pub filtered: usize,
    /// Distinct non-empty nationalities in the dataset.
    pub countries: usize,
    /// Mean of the numeric ages, rounded to the nearest year.
    pub average_age: Option<i64>,
    pub active: usize,
    pub inactive: usize,
}

impl DatasetStats {
    pub fn compute(records: &[Record], filtered: usize) -> Self {
        let countries = records
            .iter()
            .map(|r| r.nationality.as_str())
            .filter(|n| !n.is_empty())
            .collect::<HashSet<_>>()
            .len();

        let (sum, count) = records
            .iter()
            .filter_map(|r| r.age.years())
            .fold((0i128, 0i128), |(sum, count), age| (sum + i128::from(age), count + 1));
        let average_age = (count > 0).then(|| (sum as f64 / count as f64).round() as i64);

        let active = records.iter().filter(|r| r.is_active()).count();

        Self {
            total: records.len(),
            filtered,
            countries,
            average_age,
            active,
            inactive: records.len() - active,
        }
    }

    /// Whether the filtered view hides any record.
    pub fn is_filtered(&self) -> bool {
        self.filtered != self.total
    }
}
