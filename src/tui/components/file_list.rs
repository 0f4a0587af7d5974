//! Sidebar list of uploaded files.

use crate::api::models::{CsvFile, FileId};
use crate::tui::state::ListCursor;

use super::text_truncate::fit_to_width;

/// Context for rendering the file list.
#[derive(Debug, Clone, Copy)]
pub struct FileListViewContext<'a> {
    /// Uploaded files in service order.
    pub files: &'a [CsvFile],
    /// File whose rows are shown.
    pub active: Option<&'a FileId>,
    /// Highlighted file.
    pub cursor: &'a ListCursor,
    /// Whether the pane has keyboard focus.
    pub focused: bool,
    /// Pane width in columns.
    pub width: usize,
    /// Lines available for file entries, excluding the title.
    pub visible_height: usize,
}

/// Component for displaying the uploaded files.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileListComponent;

impl FileListComponent {
    /// Renders the title and the visible window of files, one line each.
    #[must_use]
    pub fn view(ctx: &FileListViewContext<'_>) -> Vec<String> {
        let title = format!("{} Files ({})", focus_marker(ctx.focused), ctx.files.len());
        let mut lines = vec![fit_to_width(&title, ctx.width)];

        if ctx.files.is_empty() {
            lines.push(fit_to_width("  No files uploaded", ctx.width));
            return lines;
        }

        let entries = ctx
            .files
            .iter()
            .enumerate()
            .skip(ctx.cursor.scroll_offset)
            .take(ctx.visible_height.max(1));
        for (index, file) in entries {
            let pointer = if ctx.focused && index == ctx.cursor.position {
                '>'
            } else {
                ' '
            };
            let active = if ctx.active == Some(&file.id) { '*' } else { ' ' };
            let line = format!("{pointer}{active}{} ({})", file.filename, file.row_count);
            lines.push(fit_to_width(&line, ctx.width));
        }
        lines
    }
}

/// Title prefix marking the focused pane.
pub(crate) const fn focus_marker(focused: bool) -> char {
    if focused { '#' } else { ' ' }
}
