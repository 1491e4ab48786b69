//! Keybinding definitions

use crossterm::event::{KeyCode, KeyModifiers};

/// Keybinding action in normal mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Save and quit (runs `exit`)
    Quit,
    /// Enter command mode
    EnterCommandMode,
    /// Move the cursor up
    MoveUp,
    /// Move the cursor down
    MoveDown,
    /// Show details of the source under the cursor
    Select,
    /// Pin or unpin the source under the cursor
    TogglePin,
    Undo,
    Redo,
    /// Switch between the active list and the recycle bin
    ToggleBin,
    /// Toggle help
    ToggleHelp,
    /// Close overlays and clear the status line
    Cancel,
}

/// Get the action for a key in normal mode
pub fn normal_mode_action(code: KeyCode, modifiers: KeyModifiers) -> Option<Action> {
    match code {
        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => Some(Action::Quit),
        KeyCode::Char('r') if modifiers.contains(KeyModifiers::CONTROL) => Some(Action::Redo),
        KeyCode::Char('q') => Some(Action::Quit),
        KeyCode::Char(':') => Some(Action::EnterCommandMode),
        KeyCode::Char('?') => Some(Action::ToggleHelp),
        KeyCode::Char('j') | KeyCode::Down => Some(Action::MoveDown),
        KeyCode::Char('k') | KeyCode::Up => Some(Action::MoveUp),
        KeyCode::Char('p') => Some(Action::TogglePin),
        KeyCode::Char('u') => Some(Action::Undo),
        KeyCode::Char('b') => Some(Action::ToggleBin),
        KeyCode::Enter => Some(Action::Select),
        KeyCode::Esc => Some(Action::Cancel),
        _ => None,
    }
}
