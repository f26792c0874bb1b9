//! Keyboard input handling for the TUI.
//!
//! Translates key presses into high-level actions and applies those actions
//! to the application state.
//!
//! # Key Bindings
//!
//! | Key       | Action                     |
//! |-----------|----------------------------|
//! | `q`       | Quit                       |
//! | `↓` / `j` | Highlight next device      |
//! | `↑` / `k` | Highlight previous device  |
//! | `Enter`   | Select highlighted device  |
//! | `i` / `/` | Type a question            |
//! | `1`-`9`   | Send a suggested question  |
//! | `a`       | Add a device               |
//! | `r`       | Refresh readings           |
//! | `g`       | Reload the chart           |
//! | `l`       | Reload the device list     |
//! | `PgUp` / `PgDn` | Scroll the chat      |
//! | `t`       | Toggle theme               |
//! | `?`       | Toggle help                |
//!
//! While typing, `Enter` submits and `Esc` cancels.

use crossterm::event::KeyCode;

use tempdash_core::Command;

use super::app::{App, InputMode};

/// Lines moved per chat scroll step.
const CHAT_SCROLL_STEP: u16 = 3;

/// User actions that can be triggered by keyboard input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Quit the application.
    Quit,
    /// Highlight the next selector row.
    SelectNext,
    /// Highlight the previous selector row.
    SelectPrevious,
    /// Select the highlighted row.
    ConfirmSelection,
    /// Restart polling for the selected device.
    Refresh,
    /// Reload the chart.
    RefreshChart,
    /// Reload the device list.
    ReloadDevices,
    /// Start typing a question.
    StartChat,
    /// Start typing a new device name.
    StartAddDevice,
    /// Send the n-th suggested question (0-based).
    Suggestion(usize),
    /// Scroll the chat up.
    ScrollUp,
    /// Scroll the chat down.
    ScrollDown,
    /// Toggle the help overlay.
    ToggleHelp,
    /// Toggle theme.
    ToggleTheme,
    /// Close the blocking alert.
    DismissAlert,
    /// Close the help overlay.
    CloseOverlay,
    /// Input character for text input.
    TextInput(char),
    /// Backspace for text input.
    TextBackspace,
    /// Submit text input.
    TextSubmit,
    /// Cancel text input.
    TextCancel,
    /// No action (unrecognized key).
    None,
}

/// Map a key code to an action.
///
/// An open alert swallows every key except the ones that dismiss it.
pub fn handle_key(key: KeyCode, input_mode: InputMode, alert_open: bool) -> Action {
    if alert_open {
        return match key {
            KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ') => Action::DismissAlert,
            _ => Action::None,
        };
    }

    if input_mode != InputMode::Normal {
        return match key {
            KeyCode::Enter => Action::TextSubmit,
            KeyCode::Esc => Action::TextCancel,
            KeyCode::Backspace => Action::TextBackspace,
            KeyCode::Char(c) => Action::TextInput(c),
            _ => Action::None,
        };
    }

    match key {
        KeyCode::Char('q') => Action::Quit,
        KeyCode::Down | KeyCode::Char('j') => Action::SelectNext,
        KeyCode::Up | KeyCode::Char('k') => Action::SelectPrevious,
        KeyCode::Enter => Action::ConfirmSelection,
        KeyCode::Char('r') => Action::Refresh,
        KeyCode::Char('g') => Action::RefreshChart,
        KeyCode::Char('l') => Action::ReloadDevices,
        KeyCode::Char('i') | KeyCode::Char('/') => Action::StartChat,
        KeyCode::Char('a') => Action::StartAddDevice,
        KeyCode::Char(c @ '1'..='9') => Action::Suggestion(c as usize - '1' as usize),
        KeyCode::PageUp => Action::ScrollUp,
        KeyCode::PageDown => Action::ScrollDown,
        KeyCode::Char('t') => Action::ToggleTheme,
        KeyCode::Char('?') => Action::ToggleHelp,
        KeyCode::Esc => Action::CloseOverlay,
        _ => Action::None,
    }
}

/// Apply an action to the application state.
///
/// Returns a command for the worker when the action needs one.
pub fn apply_action(app: &mut App, action: Action) -> Option<Command> {
    match action {
        Action::Quit => {
            app.should_quit = true;
            None
        }
        Action::SelectNext => {
            app.select_next();
            None
        }
        Action::SelectPrevious => {
            app.select_previous();
            None
        }
        Action::ConfirmSelection => Some(app.confirm_selection()),
        Action::Refresh => app.selected_device_id.is_some().then_some(Command::Refresh),
        Action::RefreshChart => app
            .selected_device_id
            .is_some()
            .then_some(Command::RefreshChart),
        Action::ReloadDevices => Some(Command::LoadDevices),
        Action::StartChat => {
            app.input_mode = InputMode::Chat;
            None
        }
        Action::StartAddDevice => {
            app.input_mode = InputMode::AddDevice;
            None
        }
        Action::Suggestion(index) => app.send_suggestion(index),
        Action::ScrollUp => {
            app.chat.scroll_up(CHAT_SCROLL_STEP);
            None
        }
        Action::ScrollDown => {
            app.chat.scroll_down(CHAT_SCROLL_STEP);
            None
        }
        Action::ToggleHelp => {
            app.toggle_help();
            None
        }
        Action::ToggleTheme => {
            app.toggle_theme();
            None
        }
        Action::DismissAlert => {
            app.dismiss_alert();
            None
        }
        Action::CloseOverlay => {
            app.show_help = false;
            None
        }
        Action::TextInput(c) => {
            if let Some(buffer) = active_buffer(app) {
                buffer.push(c);
            }
            None
        }
        Action::TextBackspace => {
            if let Some(buffer) = active_buffer(app) {
                buffer.pop();
            }
            None
        }
        Action::TextSubmit => match app.input_mode {
            InputMode::Chat => app.send_message(),
            InputMode::AddDevice => {
                app.input_mode = InputMode::Normal;
                app.add_device()
            }
            InputMode::Normal => None,
        },
        Action::TextCancel => {
            app.input_mode = InputMode::Normal;
            None
        }
        Action::None => None,
    }
}

fn active_buffer(app: &mut App) -> Option<&mut String> {
    match app.input_mode {
        InputMode::Chat => Some(&mut app.chat_input),
        InputMode::AddDevice => Some(&mut app.device_name_input),
        InputMode::Normal => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::app::{ALERT_ASK_REQUIRES, Theme};

    fn app() -> App {
        App::new(None, vec!["狀況如何？".to_string()], Theme::Dark)
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            let action = handle_key(KeyCode::Char(c), app.input_mode, false);
            apply_action(app, action);
        }
    }

    #[test]
    fn test_normal_mode_keys() {
        let mode = InputMode::Normal;
        assert_eq!(handle_key(KeyCode::Char('q'), mode, false), Action::Quit);
        assert_eq!(handle_key(KeyCode::Down, mode, false), Action::SelectNext);
        assert_eq!(handle_key(KeyCode::Char('k'), mode, false), Action::SelectPrevious);
        assert_eq!(handle_key(KeyCode::Enter, mode, false), Action::ConfirmSelection);
        assert_eq!(handle_key(KeyCode::Char('1'), mode, false), Action::Suggestion(0));
        assert_eq!(handle_key(KeyCode::Char('9'), mode, false), Action::Suggestion(8));
        assert_eq!(handle_key(KeyCode::Char('0'), mode, false), Action::None);
        assert_eq!(handle_key(KeyCode::Char('?'), mode, false), Action::ToggleHelp);
    }

    #[test]
    fn test_editing_captures_letters() {
        assert_eq!(
            handle_key(KeyCode::Char('q'), InputMode::Chat, false),
            Action::TextInput('q')
        );
        assert_eq!(
            handle_key(KeyCode::Enter, InputMode::Chat, false),
            Action::TextSubmit
        );
        assert_eq!(
            handle_key(KeyCode::Esc, InputMode::AddDevice, false),
            Action::TextCancel
        );
    }

    #[test]
    fn test_alert_blocks_other_keys() {
        assert_eq!(
            handle_key(KeyCode::Char('q'), InputMode::Normal, true),
            Action::None
        );
        assert_eq!(
            handle_key(KeyCode::Char('x'), InputMode::Chat, true),
            Action::None
        );
        assert_eq!(
            handle_key(KeyCode::Enter, InputMode::Chat, true),
            Action::DismissAlert
        );
    }

    #[test]
    fn test_enter_sends_chat_message() {
        let mut app = app();
        app.select_device(Some("d1".to_string()));
        apply_action(&mut app, Action::StartChat);
        type_text(&mut app, "hi!");
        apply_action(&mut app, Action::TextBackspace);

        let action = handle_key(KeyCode::Enter, app.input_mode, false);
        let cmd = apply_action(&mut app, action);
        assert_eq!(
            cmd,
            Some(Command::Ask {
                request_id: 1,
                device_id: "d1".to_string(),
                question: "hi".to_string(),
            })
        );
        assert_eq!(app.input_mode, InputMode::Chat);
    }

    #[test]
    fn test_chat_without_device_alerts() {
        let mut app = app();
        apply_action(&mut app, Action::StartChat);
        type_text(&mut app, "hi");
        assert!(apply_action(&mut app, Action::TextSubmit).is_none());
        assert_eq!(app.alert.as_deref(), Some(ALERT_ASK_REQUIRES));

        let action = handle_key(KeyCode::Esc, app.input_mode, app.alert.is_some());
        apply_action(&mut app, action);
        assert!(app.alert.is_none());
    }

    #[test]
    fn test_add_device_flow() {
        let mut app = app();
        apply_action(&mut app, Action::StartAddDevice);
        type_text(&mut app, "Garage");
        let cmd = apply_action(&mut app, Action::TextSubmit);
        assert_eq!(
            cmd,
            Some(Command::AddDevice {
                name: "Garage".to_string()
            })
        );
        assert_eq!(app.input_mode, InputMode::Normal);
    }

    #[test]
    fn test_refresh_requires_selection() {
        let mut app = app();
        assert!(apply_action(&mut app, Action::Refresh).is_none());
        app.select_device(Some("d1".to_string()));
        assert_eq!(apply_action(&mut app, Action::Refresh), Some(Command::Refresh));
        assert_eq!(
            apply_action(&mut app, Action::RefreshChart),
            Some(Command::RefreshChart)
        );
    }

    #[test]
    fn test_suggestion_sends_question() {
        let mut app = app();
        app.select_device(Some("d1".to_string()));
        let cmd = apply_action(&mut app, Action::Suggestion(0));
        assert!(matches!(cmd, Some(Command::Ask { question, .. }) if question == "狀況如何？"));
    }

    #[test]
    fn test_quit() {
        let mut app = app();
        apply_action(&mut app, Action::Quit);
        assert!(app.should_quit());
    }
}
