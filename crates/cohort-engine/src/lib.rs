//! cohort_engine - Youth record pipeline: schema, validation, filtering, sorting.
//!
//! Everything here is pure: functions take record slices and plain specs and
//! return new values. State and I/O live in `cohort-core`.

pub mod filter;
pub mod raw;
pub mod record;
pub mod sort;
pub mod stats;
pub mod validate;

pub use filter::{AgeRange, Facet, FilterSpec};
pub use raw::{RawRow, RawValue};
pub use record::{Age, Field, REQUIRED_COLUMNS, Record};
pub use sort::{SortDirection, SortState};
pub use stats::DatasetStats;
pub use validate::{ValidationError, validate};
