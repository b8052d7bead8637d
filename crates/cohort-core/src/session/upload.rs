use super::Session;
use crate::error::{CohortError, DecodeError, Result};
use crate::storage::{self, SourceFormat};
use cohort_engine::{AgeRange, RawRow, validate};
use std::path::Path;

/// An upload in flight, as seen by the session.
#[derive(Debug)]
pub(crate) struct PendingUpload {
    pub(crate) id: u64,
    pub(crate) name: String,
}

/// Proof that [`Session::begin_upload`] granted the one upload slot.
///
/// Hand it back to [`Session::finish_upload`] with the decoded rows; the
/// ticket is not `Clone`, so a slot is finished at most once.
#[derive(Debug, PartialEq, Eq)]
pub struct UploadTicket {
    id: u64,
    name: String,
}

impl UploadTicket {
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// What a successful load put into the session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoadSummary {
    pub source_name: String,
    pub records: usize,
    pub age_bounds: AgeRange,
}

impl Session {
    /// Claim the upload slot. A second upload while one is pending is
    /// rejected, and the pending one is left to complete.
    pub fn begin_upload(&mut self, name: impl Into<String>) -> Result<UploadTicket> {
        let name = name.into();
        if let Some(pending) = &self.pending {
            tracing::warn!(pending = %pending.name, rejected = %name, "upload already pending");
            return Err(CohortError::UploadPending {
                name: pending.name.clone(),
            });
        }

        self.next_ticket += 1;
        let id = self.next_ticket;
        self.pending = Some(PendingUpload {
            id,
            name: name.clone(),
        });
        tracing::debug!(id, file = %name, "upload started");
        Ok(UploadTicket { id, name })
    }

    pub fn is_upload_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Name of the file currently being read, if any.
    pub fn pending_upload(&self) -> Option<&str> {
        self.pending.as_ref().map(|p| p.name.as_str())
    }

    /// Release the upload slot and, if decoding worked, validate and swap in
    /// the new dataset.
    ///
    /// On any error the previous dataset and filter spec stay as they were.
    pub fn finish_upload(
        &mut self,
        ticket: UploadTicket,
        decoded: std::result::Result<Vec<RawRow>, DecodeError>,
    ) -> Result<LoadSummary> {
        if self.pending.as_ref().map(|p| p.id) != Some(ticket.id) {
            return Err(CohortError::NoPendingUpload);
        }
        self.pending = None;

        let rows = decoded.inspect_err(|e| {
            tracing::warn!(file = %ticket.name, error = %e, "upload could not be decoded");
        })?;
        let records = validate(&rows).inspect_err(|e| {
            tracing::warn!(file = %ticket.name, error = %e, "upload rejected");
        })?;

        let summary = LoadSummary {
            source_name: ticket.name.clone(),
            records: records.len(),
            age_bounds: AgeRange::observed(&records),
        };
        self.replace_dataset(records, Some(ticket.name));
        tracing::info!(
            file = %summary.source_name,
            records = summary.records,
            "dataset loaded"
        );
        Ok(summary)
    }

    /// Decode, validate and load uploaded bytes in one step.
    pub fn load_bytes(
        &mut self,
        name: &str,
        format: SourceFormat,
        bytes: &[u8],
    ) -> Result<LoadSummary> {
        let ticket = self.begin_upload(name)?;
        let decoded = storage::decode(format, bytes);
        self.finish_upload(ticket, decoded)
    }

    /// Read and load a file from disk, detecting the format by extension.
    pub fn load_file(&mut self, path: &Path) -> Result<LoadSummary> {
        let ticket = self.begin_upload(display_name(path))?;
        let decoded = storage::read_upload(path);
        self.finish_upload(ticket, decoded)
    }
}

/// File name without its directories, for status lines and logs.
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
