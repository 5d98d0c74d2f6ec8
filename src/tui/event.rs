//! Event handling for the TUI.

use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::error::BreathError;
use crate::tui::app::App;

/// How long to wait for input before redrawing.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Action to take after handling an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Quit the application.
    Quit,
    /// Start or stop the session.
    Toggle,
    VolumeUp,
    VolumeDown,
    Mute,
    /// Show or hide key help.
    Help,
}

/// Map a key press to an action.
#[must_use]
pub fn action_for(key: KeyEvent) -> Option<Action> {
    // Handle Ctrl+C
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(Action::Quit);
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => Some(Action::Quit),
        KeyCode::Char(' ') | KeyCode::Enter => Some(Action::Toggle),
        KeyCode::Char('+' | '=') | KeyCode::Up => Some(Action::VolumeUp),
        KeyCode::Char('-' | '_') | KeyCode::Down => Some(Action::VolumeDown),
        KeyCode::Char('m') => Some(Action::Mute),
        KeyCode::Char('?') => Some(Action::Help),
        _ => None,
    }
}

/// Handle terminal events.
///
/// Every key press is passed to the app as a user gesture before it is
/// mapped. Returns an action to take, or None if no action is needed.
///
/// # Errors
///
/// Returns an error if event polling fails.
pub fn handle_events(app: &mut App) -> Result<Option<Action>, BreathError> {
    if !event::poll(POLL_INTERVAL)
        .map_err(|e| BreathError::Terminal(format!("Event poll failed: {e}")))?
    {
        return Ok(None);
    }

    match event::read().map_err(|e| BreathError::Terminal(format!("Event read failed: {e}")))? {
        Event::Key(key) if key.kind == KeyEventKind::Press => {
            app.on_key();
            Ok(action_for(key))
        }
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_quit_keys() {
        assert_eq!(action_for(key(KeyCode::Char('q'))), Some(Action::Quit));
        assert_eq!(action_for(key(KeyCode::Esc)), Some(Action::Quit));
        assert_eq!(
            action_for(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(Action::Quit)
        );
    }

    #[test]
    fn test_toggle_keys() {
        assert_eq!(action_for(key(KeyCode::Char(' '))), Some(Action::Toggle));
        assert_eq!(action_for(key(KeyCode::Enter)), Some(Action::Toggle));
    }

    #[test]
    fn test_volume_keys() {
        assert_eq!(action_for(key(KeyCode::Char('+'))), Some(Action::VolumeUp));
        assert_eq!(action_for(key(KeyCode::Char('-'))), Some(Action::VolumeDown));
        assert_eq!(action_for(key(KeyCode::Char('m'))), Some(Action::Mute));
    }

    #[test]
    fn test_plain_c_is_not_quit() {
        assert_eq!(action_for(key(KeyCode::Char('c'))), None);
        assert_eq!(action_for(key(KeyCode::Char('x'))), None);
    }
}
