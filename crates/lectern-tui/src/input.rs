use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::{App, View};

/// Input action that can be performed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Quit,
    MoveUp,
    MoveDown,
    ScrollHalfPageDown,
    ScrollHalfPageUp,
    JumpToTop,
    JumpToBottom,
    PendingG, // First 'g' press, waiting for second 'g'
    /// Open the selected article (list view)
    Select,
    /// Return to the list (detail view)
    Back,
    /// Force-refresh the summary list
    Refresh,
    /// Flip dark/light
    ToggleTheme,
    /// Flip the sort key between title and date
    ToggleSortKey,
    /// Flip the sort order between ascending and descending
    ToggleSortOrder,
    /// Focus the next code block or link
    NextItem,
    /// Focus the previous code block or link
    PrevItem,
    /// Copy the focused code block to the clipboard
    CopyItem,
    /// Open the focused link in the browser
    OpenItem,
    None,
}

/// Handle a key event and return the corresponding action
pub fn handle_key_event(key: KeyEvent, app: &App) -> Action {
    match (key.code, key.modifiers) {
        // Quit
        (KeyCode::Char('q'), KeyModifiers::NONE) => Action::Quit,
        (KeyCode::Char('c'), KeyModifiers::CONTROL) => Action::Quit,

        // Back out of the detail view
        (KeyCode::Esc, _) | (KeyCode::Backspace, KeyModifiers::NONE) => {
            if app.view == View::Detail {
                Action::Back
            } else {
                Action::None
            }
        }
        (KeyCode::Char('h'), KeyModifiers::NONE) | (KeyCode::Left, KeyModifiers::NONE) => {
            if app.view == View::Detail {
                Action::Back
            } else {
                Action::None
            }
        }

        // Navigation within the current view
        (KeyCode::Char('j'), KeyModifiers::NONE) | (KeyCode::Down, KeyModifiers::NONE) => {
            Action::MoveDown
        }
        (KeyCode::Char('k'), KeyModifiers::NONE) | (KeyCode::Up, KeyModifiers::NONE) => {
            Action::MoveUp
        }

        // Scrolling
        (KeyCode::Char('d'), KeyModifiers::CONTROL) => Action::ScrollHalfPageDown,
        (KeyCode::Char('u'), KeyModifiers::CONTROL) => Action::ScrollHalfPageUp,

        // Jump to top/bottom
        (KeyCode::Char('g'), KeyModifiers::NONE) => {
            // gg requires double press
            if app.pending_key == Some('g') {
                Action::JumpToTop
            } else {
                Action::PendingG
            }
        }
        (KeyCode::Char('G'), KeyModifiers::SHIFT) => Action::JumpToBottom,

        // Open the selected article / open the focused item
        (KeyCode::Enter, KeyModifiers::NONE) => {
            if app.view == View::List {
                Action::Select
            } else {
                Action::OpenItem
            }
        }
        (KeyCode::Char('l'), KeyModifiers::NONE) | (KeyCode::Right, KeyModifiers::NONE) => {
            if app.view == View::List {
                Action::Select
            } else {
                Action::None
            }
        }

        // Refresh and theme
        (KeyCode::Char('r'), KeyModifiers::NONE) => Action::Refresh,
        (KeyCode::Char('t'), KeyModifiers::NONE) => Action::ToggleTheme,

        // Sorting (list view)
        (KeyCode::Char('s'), KeyModifiers::NONE) => {
            if app.view == View::List {
                Action::ToggleSortKey
            } else {
                Action::None
            }
        }
        (KeyCode::Char('S'), KeyModifiers::SHIFT) => {
            if app.view == View::List {
                Action::ToggleSortOrder
            } else {
                Action::None
            }
        }

        // Item focus and actions (detail view)
        (KeyCode::Tab, KeyModifiers::NONE) => {
            if app.view == View::Detail {
                Action::NextItem
            } else {
                Action::None
            }
        }
        (KeyCode::BackTab, _) => {
            if app.view == View::Detail {
                Action::PrevItem
            } else {
                Action::None
            }
        }
        (KeyCode::Char('y'), KeyModifiers::NONE) => {
            if app.view == View::Detail {
                Action::CopyItem
            } else {
                Action::None
            }
        }
        (KeyCode::Char('o'), KeyModifiers::NONE) => {
            if app.view == View::Detail {
                Action::OpenItem
            } else {
                Action::None
            }
        }

        _ => Action::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lectern_core::{AppConfig, ThemeMode};
    use std::sync::Arc;

    fn list_app() -> App {
        App::new(Arc::new(AppConfig::default()), ThemeMode::Dark)
    }

    fn detail_app() -> App {
        let mut app = list_app();
        app.open_detail("post".to_string());
        app
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_enter_selects_in_list_and_opens_in_detail() {
        assert_eq!(
            handle_key_event(key(KeyCode::Enter), &list_app()),
            Action::Select
        );
        assert_eq!(
            handle_key_event(key(KeyCode::Enter), &detail_app()),
            Action::OpenItem
        );
    }

    #[test]
    fn test_escape_only_backs_out_of_detail() {
        assert_eq!(
            handle_key_event(key(KeyCode::Esc), &list_app()),
            Action::None
        );
        assert_eq!(
            handle_key_event(key(KeyCode::Esc), &detail_app()),
            Action::Back
        );
    }

    #[test]
    fn test_double_g_jumps_to_top() {
        let mut app = list_app();
        assert_eq!(handle_key_event(key(KeyCode::Char('g')), &app), Action::PendingG);

        app.pending_key = Some('g');
        assert_eq!(
            handle_key_event(key(KeyCode::Char('g')), &app),
            Action::JumpToTop
        );
    }

    #[test]
    fn test_sort_keys_are_list_only() {
        assert_eq!(
            handle_key_event(key(KeyCode::Char('s')), &list_app()),
            Action::ToggleSortKey
        );
        assert_eq!(
            handle_key_event(key(KeyCode::Char('s')), &detail_app()),
            Action::None
        );
    }

    #[test]
    fn test_copy_is_detail_only() {
        assert_eq!(
            handle_key_event(key(KeyCode::Char('y')), &detail_app()),
            Action::CopyItem
        );
        assert_eq!(
            handle_key_event(key(KeyCode::Char('y')), &list_app()),
            Action::None
        );
    }
}
