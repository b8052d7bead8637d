//! Derived views. Nothing here is cached: every call recomputes from the
//! dataset and the current filter and sort state.

use super::Session;
use crate::error::Result;
use crate::storage::{self, Export, ExportFormat, export_file_name};
use chrono::NaiveDate;
use cohort_engine::filter::{self, Facet};
use cohort_engine::sort::sorted;
use cohort_engine::{DatasetStats, Record};

impl Session {
    /// Records passing the filter spec, in dataset order.
    pub fn filtered(&self) -> Vec<&Record> {
        filter::apply(&self.dataset, &self.filters)
    }

    /// The filtered view ordered by the sort state. This is what the table
    /// shows.
    pub fn ordered(&self) -> Vec<&Record> {
        sorted(self.filtered(), self.sort)
    }

    pub fn stats(&self) -> DatasetStats {
        DatasetStats::compute(&self.dataset, self.filtered().len())
    }

    /// Selectable values for a facet, in first-seen order.
    pub fn facet_values(&self, facet: Facet) -> Vec<&str> {
        filter::facet_values(&self.dataset, facet)
    }

    /// Encode the filtered view, named with today's local date.
    pub fn export(&self, format: ExportFormat) -> Result<Export> {
        self.export_on(format, chrono::Local::now().date_naive())
    }

    /// Encode the filtered view as of the call, dataset order preserved.
    pub fn export_on(&self, format: ExportFormat, date: NaiveDate) -> Result<Export> {
        let view: Vec<Record> = self.filtered().into_iter().cloned().collect();
        let bytes = storage::encode(format, &view)?;
        let export = Export {
            format,
            file_name: export_file_name(format, date),
            records: view.len(),
            bytes,
        };
        tracing::info!(
            file = %export.file_name,
            records = export.records,
            "exported filtered view"
        );
        Ok(export)
    }
}
