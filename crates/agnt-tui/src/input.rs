//! Input handling

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Processed input action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Regular character input
    Char(char),
    /// Enter/submit
    Submit,
    Backspace,
    Delete,
    Left,
    Right,
    Home,
    End,
    /// Scroll history up
    PageUp,
    /// Scroll history down
    PageDown,
    /// Scroll the execution panel up
    PanelUp,
    /// Scroll the execution panel down
    PanelDown,
    /// Show or hide the execution panel
    TogglePanel,
    /// Show or hide the source content in the panel
    ToggleSource,
    /// Drop the pending attachment
    Escape,
    /// Ctrl+C
    Interrupt,
    /// Ctrl+D
    Eof,
    /// Ctrl+U (clear line)
    ClearLine,
    /// Ctrl+W (delete word)
    DeleteWord,
    /// Bracketed paste
    Paste(String),
    Unknown,
}

/// Convert a crossterm key event to an action
pub fn key_to_action(event: KeyEvent) -> Action {
    let KeyEvent {
        code, modifiers, ..
    } = event;

    if modifiers.contains(KeyModifiers::CONTROL) {
        return match code {
            KeyCode::Char('c') => Action::Interrupt,
            KeyCode::Char('d') => Action::Eof,
            KeyCode::Char('u') => Action::ClearLine,
            KeyCode::Char('w') => Action::DeleteWord,
            KeyCode::Char('p') => Action::TogglePanel,
            KeyCode::Char('s') => Action::ToggleSource,
            KeyCode::Up => Action::PanelUp,
            KeyCode::Down => Action::PanelDown,
            _ => Action::Unknown,
        };
    }

    if modifiers.contains(KeyModifiers::ALT) {
        return Action::Unknown;
    }

    if modifiers.contains(KeyModifiers::SHIFT) {
        match code {
            KeyCode::PageUp => return Action::PanelUp,
            KeyCode::PageDown => return Action::PanelDown,
            _ => {}
        }
    }

    match code {
        KeyCode::Char(c) => Action::Char(c),
        KeyCode::Enter => Action::Submit,
        KeyCode::Backspace => Action::Backspace,
        KeyCode::Delete => Action::Delete,
        KeyCode::Left => Action::Left,
        KeyCode::Right => Action::Right,
        KeyCode::Home => Action::Home,
        KeyCode::End => Action::End,
        KeyCode::PageUp | KeyCode::Up => Action::PageUp,
        KeyCode::PageDown | KeyCode::Down => Action::PageDown,
        KeyCode::Tab => Action::TogglePanel,
        KeyCode::Esc => Action::Escape,
        _ => Action::Unknown,
    }
}

/// Convert a crossterm event to an action
pub fn event_to_action(event: Event) -> Option<Action> {
    match event {
        Event::Key(key_event) if key_event.kind != KeyEventKind::Release => {
            Some(key_to_action(key_event))
        }
        Event::Paste(text) => Some(Action::Paste(text)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn test_plain_keys() {
        assert_eq!(
            key_to_action(key(KeyCode::Char('a'), KeyModifiers::NONE)),
            Action::Char('a')
        );
        assert_eq!(
            key_to_action(key(KeyCode::Char('A'), KeyModifiers::SHIFT)),
            Action::Char('A')
        );
        assert_eq!(
            key_to_action(key(KeyCode::Enter, KeyModifiers::NONE)),
            Action::Submit
        );
        assert_eq!(
            key_to_action(key(KeyCode::Tab, KeyModifiers::NONE)),
            Action::TogglePanel
        );
    }

    #[test]
    fn test_control_keys() {
        assert_eq!(
            key_to_action(key(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Action::Interrupt
        );
        assert_eq!(
            key_to_action(key(KeyCode::Char('s'), KeyModifiers::CONTROL)),
            Action::ToggleSource
        );
        assert_eq!(
            key_to_action(key(KeyCode::Char('x'), KeyModifiers::CONTROL)),
            Action::Unknown
        );
    }

    #[test]
    fn test_panel_scroll_keys() {
        assert_eq!(
            key_to_action(key(KeyCode::Down, KeyModifiers::CONTROL)),
            Action::PanelDown
        );
        assert_eq!(
            key_to_action(key(KeyCode::Up, KeyModifiers::CONTROL)),
            Action::PanelUp
        );
        assert_eq!(
            key_to_action(key(KeyCode::PageDown, KeyModifiers::SHIFT)),
            Action::PanelDown
        );
        assert_eq!(
            key_to_action(key(KeyCode::PageUp, KeyModifiers::SHIFT)),
            Action::PanelUp
        );
        assert_eq!(
            key_to_action(key(KeyCode::PageDown, KeyModifiers::NONE)),
            Action::PageDown
        );
    }

    #[test]
    fn test_paste_and_release() {
        assert_eq!(
            event_to_action(Event::Paste("hello".into())),
            Some(Action::Paste("hello".into()))
        );

        let mut release = key(KeyCode::Char('a'), KeyModifiers::NONE);
        release.kind = KeyEventKind::Release;
        assert_eq!(event_to_action(Event::Key(release)), None);
        assert_eq!(event_to_action(Event::FocusGained), None);
    }
}
