//! cohort-core - UI-agnostic session state + storage.

pub mod error;
pub mod session;
pub mod storage;

pub use error::{CohortError, DecodeError, ExportError, Result};
pub use session::{LoadSummary, Session, UploadTicket};
pub use storage::{Export, ExportFormat, SourceFormat};
