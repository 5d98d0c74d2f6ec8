//! Terminal User Interface (TUI) for boxbreath.
//!
//! Draws the breathing square and forwards key presses to the session.
//! Built with ratatui and crossterm.

mod animation;
mod app;
mod event;
mod ui;

pub use app::{App, CenterText};

use std::io;
use std::time::Instant;

use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use tracing::info;

use crate::breath::{BreathSession, SessionStats};
use crate::error::BreathError;

/// Run the TUI application until the user quits.
///
/// # Errors
///
/// Returns an error if the TUI fails to initialize or run.
pub fn run(session: BreathSession) -> Result<SessionStats, BreathError> {
    // Setup terminal
    enable_raw_mode()
        .map_err(|e| BreathError::Terminal(format!("Failed to enable raw mode: {e}")))?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)
        .map_err(|e| BreathError::Terminal(format!("Failed to setup terminal: {e}")))?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)
        .map_err(|e| BreathError::Terminal(format!("Failed to create terminal: {e}")))?;

    // Create app state and run main loop
    let mut app = App::new(session);
    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode().ok();
    execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
    terminal.show_cursor().ok();

    info!(stage = %app.stage(), "screen closed");
    result.map(|()| app.stats())
}

/// Run the main application loop.
fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<(), BreathError> {
    while !app.should_quit {
        app.tick(Instant::now());

        terminal
            .draw(|frame| ui::render(frame, app))
            .map_err(|e| BreathError::Terminal(format!("Failed to draw: {e}")))?;

        if let Some(action) = event::handle_events(app)? {
            match action {
                event::Action::Quit => app.should_quit = true,
                event::Action::Toggle => app.toggle(),
                event::Action::VolumeUp => app.adjust_volume(1),
                event::Action::VolumeDown => app.adjust_volume(-1),
                event::Action::Mute => app.toggle_mute(),
                event::Action::Help => app.toggle_help(),
            }
        }
    }

    Ok(())
}
