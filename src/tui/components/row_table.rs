//! Table of loaded rows with selection checkboxes and review flags.
//!
//! Each line is `<cursor> [x] ✓ <cells...>`. Columns share the remaining
//! width evenly within fixed bounds; cells are truncated with an ellipsis.

use crate::api::models::{CsvDataset, CsvRow};
use crate::tui::state::ListCursor;
use crate::workspace::Selection;

use super::file_list::focus_marker;
use super::text_truncate::fit_to_width;

/// Columns used by the cursor, checkbox, and review marker.
const ROW_PREFIX_WIDTH: usize = 8;
const MIN_CELL_WIDTH: usize = 6;
const MAX_CELL_WIDTH: usize = 24;
const CELL_SEPARATOR: &str = " ";

/// Context for rendering the row table.
#[derive(Debug, Clone, Copy)]
pub struct RowTableViewContext<'a> {
    /// Loaded dataset, if any.
    pub dataset: Option<&'a CsvDataset>,
    /// Selected rows.
    pub selection: &'a Selection,
    /// Highlighted row.
    pub cursor: &'a ListCursor,
    /// Whether a load is in flight.
    pub loading: bool,
    /// Whether the pane has keyboard focus.
    pub focused: bool,
    /// Pane width in columns.
    pub width: usize,
    /// Lines available for rows, excluding the title and header lines.
    pub visible_height: usize,
}

/// Component for displaying the rows of the active file.
#[derive(Debug, Clone, Copy, Default)]
pub struct RowTableComponent;

impl RowTableComponent {
    /// Lines used above the first row.
    pub const CHROME_HEIGHT: usize = 2;

    /// Renders the title, the column header, and the visible rows.
    #[must_use]
    pub fn view(ctx: &RowTableViewContext<'_>) -> Vec<String> {
        let Some(dataset) = ctx.dataset else {
            let message = if ctx.loading {
                "  Loading..."
            } else {
                "  Select a file to view its rows"
            };
            return vec![title_line(ctx, None), fit_to_width(message, ctx.width)];
        };

        let headers = &dataset.csv_file.headers;
        let cell_width = cell_width(ctx.width, headers.len());
        let mut lines = vec![
            title_line(ctx, Some(dataset)),
            header_line(headers, cell_width, ctx.width),
        ];

        if dataset.rows.is_empty() {
            lines.push(fit_to_width("  No rows match the current filters", ctx.width));
            return lines;
        }

        let visible = dataset
            .rows
            .iter()
            .enumerate()
            .skip(ctx.cursor.scroll_offset)
            .take(ctx.visible_height.max(1));
        for (index, row) in visible {
            let highlighted = ctx.focused && index == ctx.cursor.position;
            let line = row_line(row, headers, ctx.selection, highlighted, cell_width);
            lines.push(fit_to_width(&line, ctx.width));
        }
        lines
    }
}

fn title_line(ctx: &RowTableViewContext<'_>, dataset: Option<&CsvDataset>) -> String {
    let marker = focus_marker(ctx.focused);
    let title = dataset.map_or_else(
        || format!("{marker} Rows"),
        |loaded| {
            format!(
                "{marker} {} | {} rows | {} reviewed | {} pending | {} selected{}",
                loaded.csv_file.filename,
                loaded.rows.len(),
                loaded.reviewed_count(),
                loaded.pending_count(),
                ctx.selection.len(),
                if ctx.loading { " | loading" } else { "" },
            )
        },
    );
    fit_to_width(&title, ctx.width)
}

fn cell_width(total_width: usize, column_count: usize) -> usize {
    if column_count == 0 {
        return MIN_CELL_WIDTH;
    }
    let available = total_width.saturating_sub(ROW_PREFIX_WIDTH);
    let per_column = available / column_count;
    per_column
        .saturating_sub(CELL_SEPARATOR.len())
        .clamp(MIN_CELL_WIDTH, MAX_CELL_WIDTH)
}

fn header_line(headers: &[String], cell_width: usize, total_width: usize) -> String {
    let mut line = " ".repeat(ROW_PREFIX_WIDTH);
    for header in headers {
        line.push_str(&fit_to_width(header, cell_width));
        line.push_str(CELL_SEPARATOR);
    }
    fit_to_width(&line, total_width)
}

fn row_line(
    row: &CsvRow,
    headers: &[String],
    selection: &Selection,
    highlighted: bool,
    cell_width: usize,
) -> String {
    let pointer = if highlighted { '>' } else { ' ' };
    let checkbox = if selection.contains(&row.id) { 'x' } else { ' ' };
    let reviewed = if row.is_reviewed { '✓' } else { '·' };
    let mut line = format!("{pointer} [{checkbox}] {reviewed} ");
    for header in headers {
        line.push_str(&fit_to_width(row.cell(header).unwrap_or_default(), cell_width));
        line.push_str(CELL_SEPARATOR);
    }
    line
}

#[cfg(test)]
mod tests {
    use rstest::{fixture, rstest};

    use super::*;
    use crate::api::models::test_support::{row_with_status, sample_file};

    #[fixture]
    fn dataset() -> CsvDataset {
        CsvDataset {
            csv_file: sample_file("f-1", "sites.csv"),
            rows: vec![
                row_with_status("r-1", "Active", true),
                row_with_status("r-2", "Closed", false),
            ],
        }
    }

    fn render(dataset: Option<&CsvDataset>, selection: &Selection, loading: bool) -> Vec<String> {
        let cursor = ListCursor {
            position: 1,
            scroll_offset: 0,
        };
        RowTableComponent::view(&RowTableViewContext {
            dataset,
            selection,
            cursor: &cursor,
            loading,
            focused: true,
            width: 60,
            visible_height: 10,
        })
    }

    #[rstest]
    fn title_summarises_counts(dataset: CsvDataset) {
        let mut selection = Selection::new();
        let _added = selection.toggle(&crate::api::models::RowId::new("r-1"));

        let lines = render(Some(&dataset), &selection, false);

        let title = lines.first().map(String::as_str).unwrap_or_default();
        assert!(title.contains("sites.csv | 2 rows | 1 reviewed | 1 pending | 1 selected"));
    }

    #[rstest]
    fn rows_show_checkbox_review_flag_and_cells(dataset: CsvDataset) {
        let mut selection = Selection::new();
        let _added = selection.toggle(&crate::api::models::RowId::new("r-1"));

        let lines = render(Some(&dataset), &selection, false);

        let first = lines.get(2).map(String::as_str).unwrap_or_default();
        let second = lines.get(3).map(String::as_str).unwrap_or_default();
        assert!(first.starts_with("  [x] ✓ site-r-1"));
        assert!(second.starts_with("> [ ] · site-r-2"));
        assert!(second.contains("Closed"));
    }

    #[rstest]
    fn header_lists_columns(dataset: CsvDataset) {
        let lines = render(Some(&dataset), &Selection::new(), false);
        let header = lines.get(1).map(String::as_str).unwrap_or_default();
        assert!(header.contains("Site"));
        assert!(header.contains("Status"));
    }

    #[rstest]
    #[case::idle(false, "Select a file")]
    #[case::loading(true, "Loading...")]
    fn placeholder_without_dataset(#[case] loading: bool, #[case] expected: &str) {
        let lines = render(None, &Selection::new(), loading);
        assert!(lines.iter().any(|line| line.contains(expected)));
    }

    #[rstest]
    fn empty_result_is_reported() {
        let empty = CsvDataset {
            csv_file: sample_file("f-1", "sites.csv"),
            rows: Vec::new(),
        };
        let lines = render(Some(&empty), &Selection::new(), false);
        assert!(lines.iter().any(|line| line.contains("No rows match")));
    }
}
