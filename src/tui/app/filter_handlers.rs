//! Filter staging and committing.
//!
//! Search, review, and column edits only change the staged filters; `a`
//! commits them with a reload, and the clear actions reload immediately.

use bubbletea_rs::Cmd;

use super::{InputMode, WorkspaceApp};
use crate::tui::messages::AppMsg;
use crate::tui::state::{ColumnPicker, Focus, TextEntry, TextField};

impl WorkspaceApp {
    /// Dispatches filter messages to their handlers.
    pub(super) fn handle_filter_msg(&mut self, msg: &AppMsg) -> Option<Cmd> {
        match msg {
            AppMsg::EditSearch => {
                self.begin_search_edit();
                None
            }
            AppMsg::CycleReviewFilter => {
                self.cycle_review_filter();
                None
            }
            AppMsg::OpenColumnPicker => {
                self.open_column_picker();
                None
            }
            AppMsg::ApplyFilters => {
                let request = self.state.apply_filters();
                self.load_cmd(request)
            }
            AppMsg::ClearColumnFilters => {
                let request = self.state.clear_column_filters();
                self.load_cmd(request)
            }
            AppMsg::ClearAllFilters => {
                let request = self.state.clear_all_filters();
                self.load_cmd(request)
            }
            _ => {
                debug_assert!(false, "non-filter message routed to handle_filter_msg");
                None
            }
        }
    }

    pub(super) fn begin_search_edit(&mut self) {
        let current = self.state.filters().search_term().to_owned();
        self.mode = InputMode::Editing(TextEntry::new(TextField::Search, current));
    }

    pub(super) fn cycle_review_filter(&mut self) {
        let next = self.state.filters().review_status().next();
        self.state.set_review_status(next);
    }

    /// Opens the picker at the column stage. Does nothing when the active
    /// file has no columns.
    fn open_column_picker(&mut self) {
        let headers = self.active_headers();
        if headers.is_empty() {
            tracing::debug!("column picker needs a file with headers");
            return;
        }
        self.mode = InputMode::Picking(ColumnPicker::for_columns(headers));
        self.keep_cursors_visible();
    }

    /// Opens the picker directly on the values of `header`.
    pub(super) fn open_value_picker(&mut self, header: &str) {
        let current = self.state.filters().column_filter(header);
        let picker = ColumnPicker::for_values(header, self.state.catalog(), current);
        self.mode = InputMode::Picking(picker);
        self.keep_cursors_visible();
    }

    /// Stages the picked value and returns focus to the filter pane.
    pub(super) fn stage_column_value(&mut self, header: String, value: String) {
        self.state.set_column_filter(header, value);
        self.mode = InputMode::Browse;
        if !self.sidebar_collapsed {
            self.focus = Focus::Filters;
        }
    }
}
