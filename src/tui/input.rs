use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use ratatui::prelude::*;
use std::io;
use std::time::Duration;

use super::actions::{ApplyResult, apply_action, handle_command_text, handle_search_text};
use super::app::{App, Mode};
use super::keymap::translate;
use super::ui;

/// How long to wait for input before checking on a background upload.
const TICK: Duration = Duration::from_millis(100);

pub fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    loop {
        app.poll_upload();
        terminal.draw(|f| ui::draw(f, app))?;

        if !event::poll(TICK)? {
            continue;
        }

        let Event::Key(key) = event::read()? else {
            continue;
        };
        // Only process key press events (Windows reports Press + Release)
        if key.kind != KeyEventKind::Press {
            continue;
        }

        // Help modal takes over input
        if app.help_modal {
            match key.code {
                KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?') => {
                    app.close_help_modal();
                }
                KeyCode::Char('g') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    app.close_help_modal();
                }
                KeyCode::Down | KeyCode::Char('j') => app.scroll_help_by(1),
                KeyCode::Up | KeyCode::Char('k') => app.scroll_help_by(-1),
                KeyCode::PageDown => app.scroll_help_by(12),
                KeyCode::PageUp => app.scroll_help_by(-12),
                KeyCode::Home | KeyCode::Char('g') => app.help_scroll = 0,
                _ => {}
            }
            continue;
        }

        // Any key clears a stale status message in Normal mode
        if app.mode == Mode::Normal && !app.is_loading() {
            app.status_message.clear();
        }

        match translate(app.mode, key) {
            Some(action) => {
                if apply_action(app, action) == ApplyResult::Quit {
                    return Ok(());
                }
            }
            None => match app.mode {
                Mode::Search => handle_search_text(app, key),
                Mode::Command => handle_command_text(app, key),
                Mode::Normal => {}
            },
        }
    }
}
