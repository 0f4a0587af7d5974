//! Input handling for the TUI application.
//!
//! Keys map to different messages depending on whether the user is browsing,
//! typing into a text field, or choosing from the column picker.

use bubbletea_rs::event::KeyMsg;
use crossterm::event::{KeyCode, KeyModifiers};

use super::messages::AppMsg;

/// What the keyboard is currently driving.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputContext {
    /// Panes and shortcuts.
    Browse,
    /// A text field; printable keys are inserted.
    TextEntry,
    /// The column filter picker.
    Picker,
}

/// Maps a key event to an application message for the given context.
///
/// Returns `None` for unrecognised key events, allowing them to be ignored.
#[must_use]
pub fn map_key_to_message(key: &KeyMsg, context: InputContext) -> Option<AppMsg> {
    match context {
        InputContext::Browse => map_browse_key(key),
        InputContext::TextEntry => map_text_entry_key(key),
        InputContext::Picker => map_picker_key(key),
    }
}

#[expect(
    clippy::missing_const_for_fn,
    reason = "KeyCode match patterns prevent const evaluation"
)]
fn map_browse_key(key: &KeyMsg) -> Option<AppMsg> {
    match key.key {
        KeyCode::Char('q') => Some(AppMsg::Quit),
        KeyCode::Char('j') | KeyCode::Down => Some(AppMsg::CursorDown),
        KeyCode::Char('k') | KeyCode::Up => Some(AppMsg::CursorUp),
        KeyCode::PageDown => Some(AppMsg::PageDown),
        KeyCode::PageUp => Some(AppMsg::PageUp),
        KeyCode::Home | KeyCode::Char('g') => Some(AppMsg::Home),
        KeyCode::End | KeyCode::Char('G') => Some(AppMsg::End),
        KeyCode::Tab => Some(AppMsg::CycleFocus),
        KeyCode::Enter => Some(AppMsg::Activate),
        KeyCode::Char(' ') => Some(AppMsg::ToggleRow),
        KeyCode::Char('A') => Some(AppMsg::ToggleAllRows),
        KeyCode::Char('R') => Some(AppMsg::MarkSelected { is_reviewed: true }),
        KeyCode::Char('U') => Some(AppMsg::MarkSelected { is_reviewed: false }),
        KeyCode::Char('/') => Some(AppMsg::EditSearch),
        KeyCode::Char('v') => Some(AppMsg::CycleReviewFilter),
        KeyCode::Char('c') => Some(AppMsg::OpenColumnPicker),
        KeyCode::Char('a') => Some(AppMsg::ApplyFilters),
        KeyCode::Char('x') => Some(AppMsg::ClearColumnFilters),
        KeyCode::Char('X') => Some(AppMsg::ClearAllFilters),
        KeyCode::Char('e') => Some(AppMsg::Export),
        KeyCode::Char('o') => Some(AppMsg::EditUploadPath),
        KeyCode::Char('r') => Some(AppMsg::RefreshFiles),
        KeyCode::Char('b') => Some(AppMsg::ToggleSidebar),
        KeyCode::Char('?') => Some(AppMsg::ToggleHelp),
        KeyCode::Esc => Some(AppMsg::DismissNotice),
        _ => None,
    }
}

fn map_text_entry_key(key: &KeyMsg) -> Option<AppMsg> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return None;
    }
    match key.key {
        KeyCode::Enter => Some(AppMsg::InputSubmit),
        KeyCode::Esc => Some(AppMsg::InputCancel),
        KeyCode::Backspace => Some(AppMsg::InputBackspace),
        KeyCode::Char(ch) => Some(AppMsg::InputChar(ch)),
        _ => None,
    }
}

#[expect(
    clippy::missing_const_for_fn,
    reason = "KeyCode match patterns prevent const evaluation"
)]
fn map_picker_key(key: &KeyMsg) -> Option<AppMsg> {
    match key.key {
        KeyCode::Char('j') | KeyCode::Down => Some(AppMsg::CursorDown),
        KeyCode::Char('k') | KeyCode::Up => Some(AppMsg::CursorUp),
        KeyCode::PageDown => Some(AppMsg::PageDown),
        KeyCode::PageUp => Some(AppMsg::PageUp),
        KeyCode::Home | KeyCode::Char('g') => Some(AppMsg::Home),
        KeyCode::End | KeyCode::Char('G') => Some(AppMsg::End),
        KeyCode::Enter => Some(AppMsg::InputSubmit),
        KeyCode::Esc | KeyCode::Char('q') => Some(AppMsg::InputCancel),
        _ => None,
    }
}
