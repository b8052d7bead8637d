use crossterm::event::{self, KeyCode, KeyModifiers};
use std::path::PathBuf;

use super::app::{App, Mode};
use super::keymap::Action;
use cohort_core::ExportFormat;
use cohort_engine::{Field, SortDirection, SortState};

/// Handle text editing operations on a buffer with UTF-8 aware cursor movement.
fn handle_text_input(buffer: &mut String, cursor: &mut usize, key: event::KeyEvent) {
    match key.code {
        KeyCode::Left => {
            if *cursor > 0 {
                let mut new_pos = *cursor - 1;
                while new_pos > 0 && !buffer.is_char_boundary(new_pos) {
                    new_pos -= 1;
                }
                *cursor = new_pos;
            }
        }
        KeyCode::Right => {
            if *cursor < buffer.len() {
                let mut new_pos = *cursor + 1;
                while new_pos < buffer.len() && !buffer.is_char_boundary(new_pos) {
                    new_pos += 1;
                }
                *cursor = new_pos;
            }
        }
        KeyCode::Home => {
            *cursor = 0;
        }
        KeyCode::End => {
            *cursor = buffer.len();
        }
        KeyCode::Backspace => {
            if *cursor > 0 {
                let mut del_start = *cursor - 1;
                while del_start > 0 && !buffer.is_char_boundary(del_start) {
                    del_start -= 1;
                }
                buffer.drain(del_start..*cursor);
                *cursor = del_start;
            }
        }
        KeyCode::Delete => {
            if *cursor < buffer.len() {
                let mut del_end = *cursor + 1;
                while del_end < buffer.len() && !buffer.is_char_boundary(del_end) {
                    del_end += 1;
                }
                buffer.drain(*cursor..del_end);
            }
        }
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            buffer.drain(..*cursor);
            *cursor = 0;
        }
        KeyCode::Char(c) => {
            if key.modifiers.is_empty() || key.modifiers == KeyModifiers::SHIFT {
                buffer.insert(*cursor, c);
                *cursor += c.len_utf8();
            }
        }
        _ => {}
    }
}

/// Result of applying an action.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ApplyResult {
    Continue,
    Quit,
}

/// Apply an action to the application state.
///
/// Returns `ApplyResult::Quit` if the application should exit.
pub fn apply_action(app: &mut App, action: Action) -> ApplyResult {
    match action {
        Action::Cancel => match app.mode {
            Mode::Search => app.cancel_search(),
            Mode::Command => {
                app.mode = Mode::Normal;
                app.command_buffer.clear();
                app.command_cursor = 0;
            }
            Mode::Normal => {}
        },

        Action::EnterCommand => {
            app.mode = Mode::Command;
            app.command_buffer.clear();
            app.command_cursor = 0;
        }
        Action::ExecuteCommand => {
            if execute_command(app) {
                return ApplyResult::Quit;
            }
        }
        Action::EnterSearch => app.enter_search_mode(),
        Action::CommitSearch => app.commit_search(),

        Action::Move(dx, dy) => app.move_cursor(dx, dy),
        Action::Page(dir) => {
            let delta = app.visible_rows as i32 * dir;
            app.move_cursor(0, delta);
        }
        Action::GotoFirst => app.goto_first(),
        Action::GotoLast => app.goto_last(),

        Action::ToggleSort => app.toggle_sort_at_cursor(),
        Action::ToggleFocus => app.toggle_focus(),
        Action::ToggleFilter => app.toggle_filter_at_cursor(),
        Action::ClearFilters => app.clear_filters(),
        Action::OpenHelp => app.open_help_modal(),
        Action::Quit => return ApplyResult::Quit,
    }
    ApplyResult::Continue
}

pub fn handle_search_text(app: &mut App, key: event::KeyEvent) {
    handle_text_input(&mut app.search_buffer, &mut app.search_cursor, key);
    app.sync_search();
}

pub fn handle_command_text(app: &mut App, key: event::KeyEvent) {
    handle_text_input(&mut app.command_buffer, &mut app.command_cursor, key);
}

/// Run the command in the `:` buffer. Returns true if the app should quit.
pub fn execute_command(app: &mut App) -> bool {
    let cmd = app.command_buffer.trim().to_string();
    app.command_buffer.clear();
    app.command_cursor = 0;
    app.mode = Mode::Normal;

    let (command, args) = match cmd.split_once(' ') {
        Some((command, args)) => (command, Some(args.trim()).filter(|a| !a.is_empty())),
        None => (cmd.as_str(), None),
    };

    match command {
        "" => {}
        "q" | "quit" => return true,
        "e" | "open" => match args {
            Some(path) => app.start_upload(PathBuf::from(path)),
            None => app.status_message = "Usage: :open <file.xlsx|file.xls|file.csv>".to_string(),
        },
        "w" | "export" => export(app, args),
        "age" => set_age(app, args),
        "sort" => match args.and_then(parse_sort_args) {
            Some(sort) => {
                app.session.set_sort(sort);
                app.status_message = format!("Sorted by {} ({:?})", sort.field, sort.direction);
            }
            None => app.status_message = "Usage: :sort FIELD [asc|desc]".to_string(),
        },
        "search" => {
            app.search_buffer = args.unwrap_or_default().to_string();
            app.search_cursor = app.search_buffer.len();
            app.sync_search();
        }
        "clear" => app.clear_filters(),
        "help" | "h" => app.open_help_modal(),
        _ => app.status_message = format!("Unknown command: {}", command),
    }
    false
}

/// `:export [csv|xlsx] [DIR]`; either argument may be omitted.
fn export(app: &mut App, args: Option<&str>) {
    let mut format = app.config.export_format();
    let mut dir = app.config.export_dir();
    if let Some(args) = args {
        let (first, rest) = match args.split_once(' ') {
            Some((first, rest)) => (first, Some(rest.trim())),
            None => (args, None),
        };
        match ExportFormat::parse(first) {
            Ok(parsed) => {
                format = parsed;
                if let Some(rest) = rest {
                    dir = PathBuf::from(rest);
                }
            }
            Err(_) => dir = PathBuf::from(args),
        }
    }

    let result = app
        .session
        .export(format)
        .and_then(|export| Ok((export.write_to_dir(&dir)?, export.records)));
    app.status_message = match result {
        Ok((path, records)) => format!("Exported {} records to {}", records, path.display()),
        Err(e) => format!("Error: {}", e),
    };
}

/// `:age MIN MAX`, where `-` or `*` leaves that side at the data bound and
/// no arguments resets both.
fn set_age(app: &mut App, args: Option<&str>) {
    let Some(args) = args else {
        app.session.set_age_range(None, None);
        app.status_message = "Age range reset".to_string();
        app.clamp_cursors();
        return;
    };

    let parts: Vec<&str> = args.split_whitespace().collect();
    let bound = |s: &str| -> Result<Option<i64>, ()> {
        match s {
            "-" | "*" => Ok(None),
            _ => s.parse().map(Some).map_err(|_| ()),
        }
    };
    match parts.as_slice() {
        [min, max] => match (bound(*min), bound(*max)) {
            (Ok(min), Ok(max)) => {
                app.session.set_age_range(min, max);
                let range = app.session.filters().age_range;
                app.status_message = format!("Age {} to {}", range.min, range.max);
                app.clamp_cursors();
            }
            _ => app.status_message = "Error: ages must be whole numbers".to_string(),
        },
        _ => app.status_message = "Usage: :age MIN MAX (use - for no limit)".to_string(),
    }
}

fn parse_sort_args(args: &str) -> Option<SortState> {
    let (name, direction) = match args.rsplit_once(' ') {
        Some((name, dir)) => match SortDirection::parse(dir) {
            Some(direction) => (name, direction),
            None => (args, SortDirection::Ascending),
        },
        None => (args, SortDirection::Ascending),
    };
    Some(SortState::new(Field::from_name(name)?, direction))
}
