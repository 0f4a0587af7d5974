//! Text entry and column picker input.

use std::mem;

use bubbletea_rs::Cmd;
use camino::Utf8PathBuf;

use super::{InputMode, WorkspaceApp};
use crate::tui::messages::AppMsg;
use crate::tui::state::{ColumnPicker, PickerChoice, PickerStage, TextEntry, TextField};

impl WorkspaceApp {
    /// Dispatches text entry and picker messages.
    pub(super) fn handle_entry_msg(&mut self, msg: &AppMsg) -> Option<Cmd> {
        match msg {
            AppMsg::InputChar(ch) => {
                if let InputMode::Editing(entry) = &mut self.mode {
                    entry.push(*ch);
                }
                None
            }
            AppMsg::InputBackspace => {
                if let InputMode::Editing(entry) = &mut self.mode {
                    entry.pop();
                }
                None
            }
            AppMsg::InputSubmit => match self.mode {
                InputMode::Editing(_) => self.submit_entry(),
                InputMode::Picking(_) => {
                    self.submit_picker();
                    None
                }
                InputMode::Browse => None,
            },
            AppMsg::InputCancel => {
                self.cancel_entry();
                None
            }
            _ => {
                debug_assert!(false, "non-entry message routed to handle_entry_msg");
                None
            }
        }
    }

    /// Leaves the edit, or steps the picker back towards its first stage.
    fn cancel_entry(&mut self) {
        let stays_open = match &mut self.mode {
            InputMode::Picking(picker) => picker.back(),
            InputMode::Editing(_) | InputMode::Browse => false,
        };
        if !stays_open {
            self.mode = InputMode::Browse;
        }
    }

    fn submit_entry(&mut self) -> Option<Cmd> {
        let InputMode::Editing(TextEntry { field, buffer }) =
            mem::replace(&mut self.mode, InputMode::Browse)
        else {
            return None;
        };
        match field {
            TextField::Search => {
                self.state.set_search_term(buffer);
                None
            }
            TextField::UploadPath => {
                let path = buffer.trim();
                self.state
                    .stage_upload((!path.is_empty()).then(|| Utf8PathBuf::from(path)));
                self.start_upload()
            }
        }
    }

    fn submit_picker(&mut self) {
        let workspace = &self.state;
        let InputMode::Picking(picker) = &mut self.mode else {
            return;
        };
        let current = picker_header(picker)
            .and_then(|header| workspace.filters().column_filter(header))
            .map(str::to_owned);
        let choice = picker.choose(workspace.catalog(), current.as_deref());

        match choice {
            PickerChoice::Continue => self.keep_cursors_visible(),
            PickerChoice::Chosen { header, value } => self.stage_column_value(header, value),
            PickerChoice::Empty => self.mode = InputMode::Browse,
        }
    }
}

/// Column whose values are shown, or the highlighted column at the first
/// stage.
fn picker_header(picker: &ColumnPicker) -> Option<&str> {
    match picker.stage() {
        PickerStage::Value { header } => Some(header.as_str()),
        PickerStage::Column => picker.options().get(picker.cursor.position).copied(),
    }
}
