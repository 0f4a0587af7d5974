//! Cursor movement, focus changes, and pane layout.
//!
//! Navigation keys act on the column picker while it is open, otherwise on
//! the focused pane. Page steps use the pane's visible height.

use bubbletea_rs::Cmd;

use super::{InputMode, WorkspaceApp};
use crate::tui::components::{FilterSidebarComponent, RowTableComponent};
use crate::tui::messages::AppMsg;
use crate::tui::state::{Focus, ListCursor};

const WIDE_SIDEBAR: usize = 32;
const NARROW_SIDEBAR: usize = 24;
const WIDE_LAYOUT_MIN_WIDTH: usize = 100;
/// Header and status bar.
const CHROME_HEIGHT: usize = 2;
/// Lines inside the picker overlay used by its title and hints.
const PICKER_CHROME_HEIGHT: usize = 3;

/// Pane sizes derived from the terminal dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PaneLayout {
    /// Width of the sidebar; zero while collapsed.
    pub sidebar_width: usize,
    /// Width of the row table, or of the picker overlay in its place.
    pub main_width: usize,
    /// Lines below the header and above the status bar.
    pub body_height: usize,
    /// Lines given to the file list, including its title.
    pub files_height: usize,
    /// Lines given to the filter pane, including its chrome.
    pub filters_height: usize,
}

impl PaneLayout {
    /// File entries that fit in the file list.
    pub const fn files_visible(&self) -> usize {
        self.files_height.saturating_sub(1)
    }

    /// Filter entries that fit in the filter pane.
    pub const fn filters_visible(&self) -> usize {
        self.filters_height
            .saturating_sub(FilterSidebarComponent::CHROME_HEIGHT)
    }

    /// Rows that fit in the row table.
    pub const fn rows_visible(&self) -> usize {
        self.body_height
            .saturating_sub(RowTableComponent::CHROME_HEIGHT)
    }

    /// Options that fit in the picker overlay.
    pub const fn picker_visible(&self) -> usize {
        self.body_height.saturating_sub(PICKER_CHROME_HEIGHT)
    }
}

/// Direction and size of a cursor move.
#[derive(Debug, Clone, Copy)]
enum Step {
    Up(usize),
    Down(usize),
    Home,
    End,
}

impl WorkspaceApp {
    /// Computes pane sizes for the current terminal and sidebar state.
    pub(crate) fn layout(&self) -> PaneLayout {
        let width = usize::from(self.width.max(1));
        let safe_width = width.saturating_sub(1).max(1);
        let body_height = usize::from(self.height)
            .saturating_sub(CHROME_HEIGHT)
            .max(1);

        let sidebar_width = if self.sidebar_collapsed {
            0
        } else if width >= WIDE_LAYOUT_MIN_WIDTH {
            WIDE_SIDEBAR
        } else {
            NARROW_SIDEBAR.min(safe_width / 2)
        };
        // One column separates the sidebar from the table.
        let main_width = if sidebar_width == 0 {
            safe_width
        } else {
            safe_width.saturating_sub(sidebar_width.saturating_add(1))
        };

        let files_height = body_height / 2;
        PaneLayout {
            sidebar_width,
            main_width,
            body_height,
            files_height,
            filters_height: body_height.saturating_sub(files_height),
        }
    }

    /// Dispatches navigation messages to their handlers.
    pub(super) fn handle_navigation_msg(&mut self, msg: &AppMsg) -> Option<Cmd> {
        let page = self.page_size();
        let step = match msg {
            AppMsg::CursorUp => Step::Up(1),
            AppMsg::CursorDown => Step::Down(1),
            AppMsg::PageUp => Step::Up(page),
            AppMsg::PageDown => Step::Down(page),
            AppMsg::Home => Step::Home,
            AppMsg::End => Step::End,
            AppMsg::CycleFocus => {
                self.focus = self.focus.next(self.sidebar_collapsed);
                return None;
            }
            _ => {
                debug_assert!(
                    false,
                    "non-navigation message routed to handle_navigation_msg"
                );
                return None;
            }
        };
        self.move_cursor(step);
        None
    }

    fn page_size(&self) -> usize {
        let layout = self.layout();
        let visible = match (&self.mode, self.focus) {
            (InputMode::Picking(_), _) => layout.picker_visible(),
            (_, Focus::Files) => layout.files_visible(),
            (_, Focus::Filters) => layout.filters_visible(),
            (_, Focus::Rows) => layout.rows_visible(),
        };
        visible.max(1)
    }

    fn move_cursor(&mut self, step: Step) {
        let layout = self.layout();
        if let InputMode::Picking(picker) = &mut self.mode {
            let count = picker.option_count();
            apply_step(&mut picker.cursor, step, count, layout.picker_visible());
            return;
        }

        match self.focus {
            Focus::Files => {
                let count = self.state.files().len();
                apply_step(&mut self.file_cursor, step, count, layout.files_visible());
            }
            Focus::Filters => {
                let count = self.filter_fields().len();
                apply_step(
                    &mut self.filter_cursor,
                    step,
                    count,
                    layout.filters_visible(),
                );
            }
            Focus::Rows => {
                let count = self.rows().len();
                apply_step(&mut self.row_cursor, step, count, layout.rows_visible());
            }
        }
    }

    /// Clamps every cursor to its list and scrolls it into view.
    pub(crate) fn keep_cursors_visible(&mut self) {
        let layout = self.layout();
        let files = self.state.files().len();
        let fields = self.filter_fields().len();
        let rows = self.rows().len();
        settle(&mut self.file_cursor, files, layout.files_visible());
        settle(&mut self.filter_cursor, fields, layout.filters_visible());
        settle(&mut self.row_cursor, rows, layout.rows_visible());
        if let InputMode::Picking(picker) = &mut self.mode {
            let count = picker.option_count();
            settle(&mut picker.cursor, count, layout.picker_visible());
        }
    }
}

fn apply_step(cursor: &mut ListCursor, step: Step, count: usize, visible: usize) {
    match step {
        Step::Up(by) => cursor.up(by),
        Step::Down(by) => cursor.down(by, count),
        Step::Home => cursor.home(),
        Step::End => cursor.end(count),
    }
    settle(cursor, count, visible);
}

fn settle(cursor: &mut ListCursor, count: usize, visible: usize) {
    cursor.clamp(count);
    cursor.ensure_visible(visible.max(1));
}
