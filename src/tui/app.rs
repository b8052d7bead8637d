//! Application state and logic.
//!
//! [`App`] wraps a [`Session`] with everything the terminal UI needs on top:
//! cursor positions, prompt buffers, the status line and the background
//! upload. The app operates in different [`Mode`]s similar to Vim's modal
//! editing.

use crate::config::Config;
use cohort_core::session::display_name;
use cohort_core::storage::read_upload;
use cohort_core::{DecodeError, Session, UploadTicket};
use cohort_engine::{Facet, Field, RawRow, Record};
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

/// Modal input state for the application.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    /// Navigate, sort and toggle filters with single keys.
    Normal,
    /// Type into the search box; the view updates as you type.
    Search,
    /// Enter ex-style commands (`:open`, `:export`, `:q`, ...).
    Command,
}

/// Which panel receives movement and toggle keys.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Focus {
    Table,
    Filters,
}

type DecodeResult = Result<Vec<RawRow>, DecodeError>;

/// A file being read on a worker thread.
struct PendingLoad {
    ticket: UploadTicket,
    rx: Receiver<DecodeResult>,
}

pub struct App {
    pub session: Session,
    pub config: Config,
    pub mode: Mode,
    pub focus: Focus,
    /// Row in the ordered view
    pub cursor_row: usize,
    /// Column in display order; also the column `s` sorts by
    pub cursor_col: usize,
    /// First visible table row
    pub viewport_row: usize,
    /// Number of table rows that fit on screen
    pub visible_rows: usize,
    /// Index into [`App::filter_entries`]
    pub filter_cursor: usize,
    pub search_buffer: String,
    /// Cursor position within search buffer (byte offset)
    pub search_cursor: usize,
    /// Search text to restore if the prompt is cancelled
    search_before: String,
    pub command_buffer: String,
    /// Cursor position within command buffer (byte offset)
    pub command_cursor: usize,
    pub status_message: String,
    pub help_modal: bool,
    pub help_scroll: usize,
    upload: Option<PendingLoad>,
}

impl App {
    pub fn new(session: Session, config: Config) -> Self {
        let status_message = match session.source_name() {
            Some(name) => format!("Loaded {} ({} records)", name, session.dataset().len()),
            None => "No data loaded. Use :open <file.xlsx|file.csv>".to_string(),
        };
        App {
            session,
            config,
            mode: Mode::Normal,
            focus: Focus::Table,
            cursor_row: 0,
            cursor_col: 0,
            viewport_row: 0,
            visible_rows: 20,
            filter_cursor: 0,
            search_buffer: String::new(),
            search_cursor: 0,
            search_before: String::new(),
            command_buffer: String::new(),
            command_cursor: 0,
            status_message,
            help_modal: false,
            help_scroll: 0,
            upload: None,
        }
    }

    /// The rows the table shows, in order.
    pub fn view(&self) -> Vec<&Record> {
        self.session.ordered()
    }

    pub fn cursor_field(&self) -> Field {
        Field::ALL[self.cursor_col.min(Field::ALL.len() - 1)]
    }

    /// Every selectable facet value, grouped by facet in panel order.
    pub fn filter_entries(&self) -> Vec<(Facet, String)> {
        Facet::ALL
            .iter()
            .flat_map(|&facet| {
                self.session
                    .facet_values(facet)
                    .into_iter()
                    .map(move |value| (facet, value.to_string()))
            })
            .collect()
    }

    pub fn move_cursor(&mut self, dx: i32, dy: i32) {
        match self.focus {
            Focus::Table => {
                let last_col = Field::ALL.len() as i64 - 1;
                self.cursor_col = (self.cursor_col as i64 + dx as i64).clamp(0, last_col) as usize;
                self.cursor_row = offset(self.cursor_row, dy);
            }
            Focus::Filters => {
                self.filter_cursor = offset(self.filter_cursor, dy);
            }
        }
        self.clamp_cursors();
    }

    pub fn goto_first(&mut self) {
        match self.focus {
            Focus::Table => self.cursor_row = 0,
            Focus::Filters => self.filter_cursor = 0,
        }
        self.clamp_cursors();
    }

    pub fn goto_last(&mut self) {
        match self.focus {
            Focus::Table => self.cursor_row = usize::MAX,
            Focus::Filters => self.filter_cursor = usize::MAX,
        }
        self.clamp_cursors();
    }

    /// Keep both cursors inside their lists and the table cursor on screen.
    /// Call after anything that can shrink the view.
    pub fn clamp_cursors(&mut self) {
        let rows = self.session.filtered().len();
        self.cursor_row = self.cursor_row.min(rows.saturating_sub(1));
        let entries = self.filter_entries().len();
        self.filter_cursor = self.filter_cursor.min(entries.saturating_sub(1));
        self.update_viewport();
    }

    pub fn update_viewport(&mut self) {
        let visible = self.visible_rows.max(1);
        if self.cursor_row < self.viewport_row {
            self.viewport_row = self.cursor_row;
        } else if self.cursor_row >= self.viewport_row + visible {
            self.viewport_row = self.cursor_row + 1 - visible;
        }
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Table => Focus::Filters,
            Focus::Filters => Focus::Table,
        };
    }

    pub fn toggle_sort_at_cursor(&mut self) {
        let field = self.cursor_field();
        self.session.toggle_sort(field);
        let sort = self.session.sort_state();
        self.status_message = format!("Sorted by {} ({:?})", sort.field, sort.direction);
    }

    /// Only acts while the filter panel has focus.
    pub fn toggle_filter_at_cursor(&mut self) {
        if self.focus != Focus::Filters {
            return;
        }
        let entries = self.filter_entries();
        let Some((facet, value)) = entries.get(self.filter_cursor) else {
            return;
        };
        let selected = self.session.toggle_filter(*facet, value);
        self.status_message = format!(
            "{} {}: {}",
            if selected { "Showing only" } else { "No longer filtering" },
            facet.label(),
            value
        );
        self.clamp_cursors();
    }

    pub fn clear_filters(&mut self) {
        self.session.clear_filters();
        self.search_buffer.clear();
        self.search_cursor = 0;
        self.status_message = "Filters cleared".to_string();
        self.clamp_cursors();
    }

    pub fn enter_search_mode(&mut self) {
        self.mode = Mode::Search;
        self.search_before = self.session.filters().search.clone();
        self.search_buffer = self.search_before.clone();
        self.search_cursor = self.search_buffer.len();
    }

    /// Push the prompt text into the filter spec. Called on every keystroke.
    pub fn sync_search(&mut self) {
        self.session.set_search(self.search_buffer.clone());
        self.clamp_cursors();
    }

    pub fn commit_search(&mut self) {
        self.sync_search();
        self.mode = Mode::Normal;
    }

    pub fn cancel_search(&mut self) {
        self.search_buffer = std::mem::take(&mut self.search_before);
        self.search_cursor = self.search_buffer.len();
        self.sync_search();
        self.mode = Mode::Normal;
    }

    pub fn open_help_modal(&mut self) {
        self.help_modal = true;
        self.help_scroll = 0;
    }

    pub fn close_help_modal(&mut self) {
        self.help_modal = false;
    }

    pub fn scroll_help_by(&mut self, delta: i32) {
        self.help_scroll = offset(self.help_scroll, delta);
    }

    pub fn is_loading(&self) -> bool {
        self.upload.is_some()
    }

    /// Start reading `path` on a worker thread. The session refuses a second
    /// upload while this one is pending.
    pub fn start_upload(&mut self, path: PathBuf) {
        let name = display_name(&path);
        let ticket = match self.session.begin_upload(name.clone()) {
            Ok(ticket) => ticket,
            Err(e) => {
                self.status_message = format!("Error: {}", e);
                return;
            }
        };

        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let _ = tx.send(read_upload(&path));
        });
        self.upload = Some(PendingLoad { ticket, rx });
        self.status_message = format!("Loading {}...", name);
    }

    /// Collect a finished upload, if any. Called once per event-loop tick.
    pub fn poll_upload(&mut self) {
        let Some(pending) = &self.upload else {
            return;
        };
        let decoded = match pending.rx.try_recv() {
            Ok(decoded) => decoded,
            Err(TryRecvError::Empty) => return,
            Err(TryRecvError::Disconnected) => Err(DecodeError::Interrupted),
        };
        let Some(pending) = self.upload.take() else {
            return;
        };
        self.finish_upload(pending.ticket, decoded);
    }

    fn finish_upload(&mut self, ticket: UploadTicket, decoded: DecodeResult) {
        match self.session.finish_upload(ticket, decoded) {
            Ok(summary) => {
                self.cursor_row = 0;
                self.viewport_row = 0;
                self.filter_cursor = 0;
                self.status_message =
                    format!("Loaded {} ({} records)", summary.source_name, summary.records);
            }
            Err(e) => {
                self.status_message = format!("Error: {}", e);
            }
        }
        self.clamp_cursors();
    }

    /// Block until the pending upload, if any, has been collected.
    #[cfg(test)]
    pub fn wait_for_upload(&mut self) {
        while self.is_loading() {
            self.poll_upload();
            thread::sleep(std::time::Duration::from_millis(5));
        }
    }
}

fn offset(value: usize, delta: i32) -> usize {
    if delta < 0 {
        value.saturating_sub(delta.unsigned_abs() as usize)
    } else {
        value.saturating_add(delta as usize)
    }
}
