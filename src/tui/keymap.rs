use super::app::Mode;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Actions that can be triggered by key presses.
///
/// The keymap translates key events into actions, which are then applied to
/// the application state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    /// Leave the search or command prompt without applying it.
    Cancel,
    /// Open the `:` prompt.
    EnterCommand,
    ExecuteCommand,
    /// Open the `/` search prompt.
    EnterSearch,
    CommitSearch,
    Move(i32, i32),
    Page(i32),
    GotoFirst,
    GotoLast,
    /// Sort by the column under the cursor, flipping direction on repeat.
    ToggleSort,
    /// Switch between the records table and the filter panel.
    ToggleFocus,
    /// Select or deselect the facet value under the filter cursor.
    ToggleFilter,
    ClearFilters,
    OpenHelp,
    Quit,
}

pub fn translate(mode: Mode, key: KeyEvent) -> Option<Action> {
    match mode {
        Mode::Normal => match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                Some(Action::Quit)
            }

            KeyCode::Up | KeyCode::Char('k') => Some(Action::Move(0, -1)),
            KeyCode::Down | KeyCode::Char('j') => Some(Action::Move(0, 1)),
            KeyCode::Left | KeyCode::Char('h') => Some(Action::Move(-1, 0)),
            KeyCode::Right | KeyCode::Char('l') => Some(Action::Move(1, 0)),

            KeyCode::PageUp => Some(Action::Page(-1)),
            KeyCode::PageDown => Some(Action::Page(1)),
            KeyCode::Home | KeyCode::Char('g') => Some(Action::GotoFirst),
            KeyCode::End | KeyCode::Char('G') => Some(Action::GotoLast),

            KeyCode::Tab | KeyCode::BackTab => Some(Action::ToggleFocus),
            KeyCode::Enter | KeyCode::Char('s') => Some(Action::ToggleSort),
            KeyCode::Char(' ') | KeyCode::Char('x') => Some(Action::ToggleFilter),
            KeyCode::Char('c') => Some(Action::ClearFilters),
            KeyCode::Char('/') => Some(Action::EnterSearch),
            KeyCode::Char(':') => Some(Action::EnterCommand),
            KeyCode::Char('?') => Some(Action::OpenHelp),
            KeyCode::Char('q') => Some(Action::Quit),
            _ => None,
        },

        Mode::Search => match key.code {
            KeyCode::Esc => Some(Action::Cancel),
            KeyCode::Enter => Some(Action::CommitSearch),
            _ => None,
        },

        Mode::Command => match key.code {
            KeyCode::Esc => Some(Action::Cancel),
            KeyCode::Enter => Some(Action::ExecuteCommand),
            _ => None,
        },
    }
}

/// One-line hint shown in the status bar when no message is pending.
pub fn status_hint() -> &'static str {
    "hjkl:move  s:sort  /:search  Tab:filters  Space:toggle  c:clear  :export  ?:help  q:quit"
}
