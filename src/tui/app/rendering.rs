//! Rendering logic for the workspace TUI application.
//!
//! These are pure query methods; the body lays the sidebar panes and the row
//! table (or the column picker) side by side, line by line.

use super::{InputMode, WorkspaceApp};
use crate::tui::components::text_truncate::fit_to_width;
use crate::tui::components::{
    ColumnPickerComponent, ColumnPickerViewContext, FileListComponent, FileListViewContext,
    FilterSidebarComponent, FilterSidebarViewContext, RowTableComponent, RowTableViewContext,
};
use crate::tui::state::{Focus, TextField};
use crate::workspace::NoticeLevel;

const PANE_SEPARATOR: char = '|';

impl WorkspaceApp {
    /// Renders the header bar.
    pub(super) fn render_header(&self) -> String {
        let mut header = String::from("Torchmap - CSV Review");
        if let Some(file) = self.state.active_file_summary() {
            header.push_str(" | ");
            header.push_str(&file.filename);
        }
        if self.state.is_loading() {
            header.push_str(" [Loading...]");
        }
        if self.state.is_uploading() {
            header.push_str(" [Uploading...]");
        }
        if self.state.is_updating() {
            header.push_str(" [Updating...]");
        }
        if self.state.is_exporting() {
            header.push_str(" [Exporting...]");
        }
        header.push('\n');
        header
    }

    /// Renders the sidebar and main pane side by side.
    pub(super) fn render_body(&self) -> String {
        let layout = self.layout();
        let main = self.render_main_pane(layout.main_width, layout.body_height);

        let mut output = String::new();
        if layout.sidebar_width == 0 {
            for line in main.iter().take(layout.body_height) {
                output.push_str(line);
                output.push('\n');
            }
            return output;
        }

        let sidebar = self.render_sidebar(layout.sidebar_width, layout.files_height);
        let blank_sidebar = " ".repeat(layout.sidebar_width);
        for index in 0..layout.body_height {
            let left = sidebar.get(index).unwrap_or(&blank_sidebar);
            let right = main.get(index).map_or("", String::as_str);
            output.push_str(left);
            output.push(PANE_SEPARATOR);
            output.push_str(right);
            output.push('\n');
        }
        output
    }

    fn render_sidebar(&self, width: usize, files_height: usize) -> Vec<String> {
        let layout = self.layout();
        let mut lines = FileListComponent::view(&FileListViewContext {
            files: self.state.files(),
            active: self.state.active_file(),
            cursor: &self.file_cursor,
            focused: self.focus == Focus::Files && !self.is_picking(),
            width,
            visible_height: layout.files_visible(),
        });
        lines.resize(files_height, " ".repeat(width));

        let fields = self.filter_fields();
        let search_entry = match &self.mode {
            InputMode::Editing(entry) if entry.field == TextField::Search => Some(entry),
            _ => None,
        };
        lines.extend(FilterSidebarComponent::view(&FilterSidebarViewContext {
            filters: self.state.filters(),
            fields: &fields,
            cursor: &self.filter_cursor,
            search_entry,
            focused: self.focus == Focus::Filters && !self.is_picking(),
            width,
            visible_height: layout.filters_visible(),
        }));
        lines
    }

    fn render_main_pane(&self, width: usize, height: usize) -> Vec<String> {
        if let InputMode::Picking(picker) = &self.mode {
            return ColumnPickerComponent::view(&ColumnPickerViewContext {
                picker,
                width,
                visible_height: self.layout().picker_visible(),
            });
        }

        RowTableComponent::view(&RowTableViewContext {
            dataset: self.state.dataset(),
            selection: self.state.selection(),
            cursor: &self.row_cursor,
            loading: self.state.is_loading(),
            focused: self.focus == Focus::Rows,
            width,
            visible_height: height.saturating_sub(RowTableComponent::CHROME_HEIGHT),
        })
    }

    /// Renders the status bar: the upload prompt, the latest notice, or key
    /// hints.
    pub(super) fn render_status_bar(&self) -> String {
        match &self.mode {
            InputMode::Editing(entry) if entry.field == TextField::UploadPath => {
                return format!(
                    "Upload CSV path: {}_  (Enter upload, Esc cancel)\n",
                    entry.buffer
                );
            }
            _ => {}
        }

        if let Some(notice) = self.state.latest_notice() {
            let label = match notice.level {
                NoticeLevel::Info => "Info",
                NoticeLevel::Warning => "Warning",
                NoticeLevel::Error => "Error",
            };
            return format!("{label}: {}  (Esc to dismiss)\n", notice.message);
        }

        let hints = if self.is_editing() {
            "type to edit  Enter:stage  Esc:cancel"
        } else if self.is_picking() {
            "j/k:move  Enter:choose  Esc:back"
        } else if self.width <= 80 {
            "q:quit  ?:help  Tab:focus  Space:select  R/U:mark  a:apply"
        } else {
            "Tab:focus  j/k:move  Space:select  A:all  R/U:mark  /:search  v:review  c:column  a:apply  e:export  o:upload  ?:help  q:quit"
        };
        let mut status = fit_to_width(hints, usize::from(self.width));
        status.push('\n');
        status
    }

    /// Renders the help overlay.
    pub(super) fn render_help_overlay() -> String {
        let help_text = r"
=== Keyboard Shortcuts ===

Navigation:
  Tab        Cycle focus: files, filters, rows
  j, Down    Move cursor down
  k, Up      Move cursor up
  PgDn/PgUp  Page down / up
  Home, g    Go to first item
  End, G     Go to last item
  b          Collapse or expand the sidebar

Files and rows:
  Enter      Open file / edit filter / toggle row
  Space      Toggle row under cursor
  A          Select all rows, or clear when all are selected
  R          Mark selected rows as reviewed
  U          Mark selected rows as unreviewed
  e          Export reviewed rows of the active file
  o          Upload a CSV file by path
  r          Refresh the file list

Filters (staged until applied):
  /          Edit search term
  v          Cycle review filter
  c          Pick a column filter
  a          Apply staged filters
  x          Clear column filters
  X          Clear all filters

Other:
  Esc        Dismiss the latest notice
  ?          Toggle this help
  q          Quit

Press any key to close this help.
";
        help_text.to_owned()
    }
}
