use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    FocusNext,
    FocusPrev,
    FocusFirst,
    FocusLast,
    ToggleSelection,
    StartClone,
    Quit,
}

/// Maps a key press to an action. Unmapped keys return `None` and are left
/// alone.
pub fn dispatch_key(key: KeyEvent) -> Option<Action> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(Action::Quit);
    }

    match key.code {
        KeyCode::Char('j') | KeyCode::Down => Some(Action::FocusNext),
        KeyCode::Char('k') | KeyCode::Up => Some(Action::FocusPrev),
        KeyCode::Char('g') | KeyCode::Home => Some(Action::FocusFirst),
        KeyCode::Char('G') | KeyCode::End => Some(Action::FocusLast),
        KeyCode::Char(' ') => Some(Action::ToggleSelection),
        KeyCode::Enter => Some(Action::StartClone),
        KeyCode::Char('q') => Some(Action::Quit),
        _ => None,
    }
}
