//! Main TUI application model implementing the MVU pattern.
//!
//! [`WorkspaceApp`] owns a [`WorkspaceState`] and adds the terminal-only
//! concerns: pane focus, cursors, text entry, and the column picker. Every
//! service call runs as a bubbletea-rs command whose completion message is
//! fed back into the workspace state.
//!
//! # Module Structure
//!
//! - `navigation`: cursor movement, focus, and pane layout
//! - `filter_handlers`: staging and committing filters
//! - `action_handlers`: file choice, selection, and background commands
//! - `entry_handlers`: text entry and column picker input
//! - `model_impl`: the `bubbletea_rs::Model` implementation
//! - `rendering`: header, panes, status bar, and help overlay

use std::sync::Arc;

use bubbletea_rs::Cmd;

use crate::api::models::{CsvFile, CsvRow};
use crate::workspace::WorkspaceState;

use super::TuiContext;
use super::input::InputContext;
use super::messages::AppMsg;
use super::state::{ColumnPicker, FilterField, Focus, ListCursor, TextEntry, filter_fields};

mod action_handlers;
mod entry_handlers;
mod filter_handlers;
mod model_impl;
mod navigation;
mod rendering;

/// What the keyboard is driving besides the panes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum InputMode {
    /// Normal pane navigation.
    Browse,
    /// A text field is being edited.
    Editing(TextEntry),
    /// The column filter picker is open.
    Picking(ColumnPicker),
}

/// Main application model for the review workspace TUI.
#[derive(Debug)]
pub struct WorkspaceApp {
    /// Files, filters, dataset, selection, and notices.
    pub(crate) state: WorkspaceState,
    /// Services used by background commands.
    context: Option<Arc<TuiContext>>,
    /// Pane receiving navigation keys.
    pub(crate) focus: Focus,
    pub(crate) file_cursor: ListCursor,
    pub(crate) filter_cursor: ListCursor,
    pub(crate) row_cursor: ListCursor,
    pub(crate) mode: InputMode,
    /// Whether the file and filter panes are hidden.
    pub(crate) sidebar_collapsed: bool,
    /// Whether help overlay is visible.
    pub(crate) show_help: bool,
    /// Terminal dimensions.
    width: u16,
    height: u16,
}

impl WorkspaceApp {
    /// Creates an application showing `files` with no services attached.
    ///
    /// Commands issued by such an app resolve to configuration errors.
    #[must_use]
    pub fn new(files: Vec<CsvFile>) -> Self {
        let mut state = WorkspaceState::new();
        state.apply_file_list(Ok(files));
        Self {
            state,
            context: None,
            focus: Focus::Files,
            file_cursor: ListCursor::default(),
            filter_cursor: ListCursor::default(),
            row_cursor: ListCursor::default(),
            mode: InputMode::Browse,
            sidebar_collapsed: false,
            show_help: false,
            width: 100,
            height: 30,
        }
    }

    /// Creates an application bound to `context`, seeded with its initial
    /// file list.
    #[must_use]
    pub fn with_context(context: Arc<TuiContext>) -> Self {
        let mut app = Self::new(context.initial_files.clone());
        app.context = Some(context);
        app
    }

    /// Creates an application with explicit terminal dimensions.
    #[must_use]
    pub fn with_dimensions(files: Vec<CsvFile>, width: u16, height: u16) -> Self {
        let mut app = Self::new(files);
        app.width = width;
        app.height = height;
        app
    }

    /// Workspace state behind the view.
    #[must_use]
    pub const fn state(&self) -> &WorkspaceState {
        &self.state
    }

    /// Pane with keyboard focus.
    #[must_use]
    pub const fn focus(&self) -> Focus {
        self.focus
    }

    /// Returns true while a text field is being edited.
    #[must_use]
    pub const fn is_editing(&self) -> bool {
        matches!(self.mode, InputMode::Editing(_))
    }

    /// Returns true while the column picker is open.
    #[must_use]
    pub const fn is_picking(&self) -> bool {
        matches!(self.mode, InputMode::Picking(_))
    }

    /// Returns the current input context for context-aware key mapping.
    pub(crate) const fn input_context(&self) -> InputContext {
        match self.mode {
            InputMode::Browse => InputContext::Browse,
            InputMode::Editing(_) => InputContext::TextEntry,
            InputMode::Picking(_) => InputContext::Picker,
        }
    }

    /// Loaded rows, or an empty slice before the first load.
    pub(crate) fn rows(&self) -> &[CsvRow] {
        self.state
            .dataset()
            .map_or(&[], |dataset| dataset.rows.as_slice())
    }

    /// Row under the row cursor.
    pub(crate) fn row_under_cursor(&self) -> Option<&CsvRow> {
        self.rows().get(self.row_cursor.position)
    }

    /// Headers of the active file, from the loaded dataset when present.
    pub(crate) fn active_headers(&self) -> Vec<String> {
        self.state
            .dataset()
            .map(|dataset| dataset.csv_file.headers.clone())
            .or_else(|| {
                self.state
                    .active_file_summary()
                    .map(|file| file.headers.clone())
            })
            .unwrap_or_default()
    }

    /// Entries of the filter pane.
    pub(crate) fn filter_fields(&self) -> Vec<FilterField> {
        filter_fields(&self.active_headers())
    }

    /// Handles a message and updates state accordingly.
    ///
    /// Delegates to specialised handlers for each message category.
    pub fn handle_message(&mut self, msg: AppMsg) -> Option<Cmd> {
        if msg.is_navigation() {
            return self.handle_navigation_msg(&msg);
        }
        if msg.is_filter() {
            return self.handle_filter_msg(&msg);
        }
        if msg.is_entry() {
            return self.handle_entry_msg(&msg);
        }
        if msg.is_action() {
            return self.handle_action_msg(&msg);
        }
        if msg.is_result() {
            return self.handle_result_msg(msg);
        }
        self.handle_lifecycle_msg(&msg)
    }

    /// Dispatches lifecycle and window messages to their handlers.
    fn handle_lifecycle_msg(&mut self, msg: &AppMsg) -> Option<Cmd> {
        match msg {
            AppMsg::Initialized => self.handle_initialized(),
            AppMsg::Quit => Some(bubbletea_rs::quit()),
            AppMsg::ToggleHelp => {
                self.show_help = !self.show_help;
                None
            }
            AppMsg::ToggleSidebar => {
                self.sidebar_collapsed = !self.sidebar_collapsed;
                if self.sidebar_collapsed {
                    self.focus = Focus::Rows;
                }
                None
            }
            AppMsg::DismissNotice => {
                let _dismissed = self.state.dismiss_notice();
                None
            }
            AppMsg::WindowResized { width, height } => {
                self.width = *width;
                self.height = *height;
                self.keep_cursors_visible();
                None
            }
            _ => {
                debug_assert!(
                    false,
                    "non-lifecycle message routed to handle_lifecycle_msg"
                );
                None
            }
        }
    }
}

#[cfg(test)]
mod tests;
