//! Session state and logic (UI-agnostic).

mod ops;
mod state;
mod upload;
mod view;

pub use state::Session;
pub use upload::{LoadSummary, UploadTicket, display_name};
