use super::upload::PendingUpload;
use cohort_engine::{AgeRange, FilterSpec, Record, SortState};
use std::sync::Arc;

/// UI-agnostic state for one exploring session.
pub struct Session {
    /// Accepted records. Replaced wholesale on a successful load, never
    /// patched, so an `Arc` clone is a stable snapshot.
    pub(crate) dataset: Arc<[Record]>,
    /// Observed numeric age bounds of the dataset
    pub(crate) bounds: AgeRange,
    pub(crate) filters: FilterSpec,
    pub(crate) sort: SortState,
    /// Display name of the file the dataset came from
    pub(crate) source_name: Option<String>,
    pub(crate) pending: Option<PendingUpload>,
    pub(crate) next_ticket: u64,
}

impl Session {
    /// Create an empty session.
    ///
    /// This constructor is side-effect free: it does not touch the filesystem.
    pub fn new() -> Self {
        Session {
            dataset: Arc::from(Vec::new()),
            bounds: AgeRange::FULL,
            filters: FilterSpec::for_bounds(AgeRange::FULL),
            sort: SortState::default(),
            source_name: None,
            pending: None,
            next_ticket: 0,
        }
    }

    /// Create a session over already-validated records.
    pub fn with_records(records: Vec<Record>, source_name: Option<String>) -> Self {
        let mut session = Self::new();
        session.replace_dataset(records, source_name);
        session
    }

    /// Swap in a new dataset. The age range snaps to the new bounds; the
    /// other predicates and the sort state carry over.
    pub(crate) fn replace_dataset(&mut self, records: Vec<Record>, source_name: Option<String>) {
        self.bounds = AgeRange::observed(&records);
        self.filters.age_range = self.bounds;
        self.dataset = Arc::from(records);
        self.source_name = source_name;
    }

    /// Cheap shared handle on the current dataset.
    pub fn snapshot(&self) -> Arc<[Record]> {
        Arc::clone(&self.dataset)
    }

    pub fn dataset(&self) -> &[Record] {
        &self.dataset
    }

    pub fn is_empty(&self) -> bool {
        self.dataset.is_empty()
    }

    pub fn source_name(&self) -> Option<&str> {
        self.source_name.as_deref()
    }

    /// Observed age bounds, or [`AgeRange::FULL`] when no age is numeric.
    pub fn age_bounds(&self) -> AgeRange {
        self.bounds
    }

    pub fn filters(&self) -> &FilterSpec {
        &self.filters
    }

    pub fn sort_state(&self) -> SortState {
        self.sort
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
