//! Filter pane: search term, review filter, and per-column filters.
//!
//! Shows the staged values, which only take effect once applied.

use crate::tui::state::{FilterField, ListCursor, TextEntry, TextField};
use crate::workspace::FilterState;

use super::file_list::focus_marker;
use super::text_truncate::fit_to_width;

const ANY_VALUE: &str = "(any)";

/// Context for rendering the filter pane.
#[derive(Debug, Clone, Copy)]
pub struct FilterSidebarViewContext<'a> {
    /// Staged filters.
    pub filters: &'a FilterState,
    /// Entries in display order.
    pub fields: &'a [FilterField],
    /// Highlighted entry.
    pub cursor: &'a ListCursor,
    /// Search edit in progress, shown in place of the staged term.
    pub search_entry: Option<&'a TextEntry>,
    /// Whether the pane has keyboard focus.
    pub focused: bool,
    /// Pane width in columns.
    pub width: usize,
    /// Lines available for entries, excluding the title and hint.
    pub visible_height: usize,
}

/// Component for displaying the staged filters.
#[derive(Debug, Clone, Copy, Default)]
pub struct FilterSidebarComponent;

impl FilterSidebarComponent {
    /// Lines used by the title and the hint.
    pub const CHROME_HEIGHT: usize = 2;

    /// Renders the title, one line per entry, and the key hint.
    #[must_use]
    pub fn view(ctx: &FilterSidebarViewContext<'_>) -> Vec<String> {
        let count = ctx.filters.column_filter_count();
        let title = format!("{} Filters ({count} column)", focus_marker(ctx.focused));
        let mut lines = vec![fit_to_width(&title, ctx.width)];

        let entries = ctx
            .fields
            .iter()
            .enumerate()
            .skip(ctx.cursor.scroll_offset)
            .take(ctx.visible_height.max(1));
        for (index, field) in entries {
            let pointer = if ctx.focused && index == ctx.cursor.position {
                '>'
            } else {
                ' '
            };
            let line = format!("{pointer} {}", describe(field, ctx));
            lines.push(fit_to_width(&line, ctx.width));
        }

        lines.push(fit_to_width("a apply  x/X clear", ctx.width));
        lines
    }
}

fn describe(field: &FilterField, ctx: &FilterSidebarViewContext<'_>) -> String {
    match field {
        FilterField::Search => {
            let editing = ctx
                .search_entry
                .filter(|entry| entry.field == TextField::Search);
            editing.map_or_else(
                || format!("Search: {}", ctx.filters.search_term()),
                |entry| format!("Search: {}_", entry.buffer),
            )
        }
        FilterField::ReviewStatus => {
            format!("Review: {}", ctx.filters.review_status().label())
        }
        FilterField::Column(header) => format!(
            "{header}: {}",
            ctx.filters.column_filter(header).unwrap_or(ANY_VALUE)
        ),
    }
}
