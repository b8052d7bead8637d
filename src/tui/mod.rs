//! Terminal user interface.

mod actions;
mod app;
mod help;
mod input;
mod keymap;
mod ui;

pub use app::App;

use anyhow::{Context as _, Result};
use crossterm::{
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io;

/// Take over the terminal, run the event loop and restore the terminal even
/// if the loop fails.
pub fn run(app: &mut App) -> Result<()> {
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    if let Err(e) = execute!(stdout, EnterAlternateScreen) {
        let _ = disable_raw_mode();
        return Err(e).context("Failed to enter alternate screen");
    }

    let result = Terminal::new(CrosstermBackend::new(stdout))
        .and_then(|mut terminal| {
            let result = input::run_app(&mut terminal, app);
            terminal.show_cursor()?;
            result
        });

    let _ = disable_raw_mode();
    let _ = execute!(io::stdout(), LeaveAlternateScreen);
    tracing::info!("terminal restored");

    result.context("Terminal UI failed")
}
