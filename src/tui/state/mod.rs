//! View state for the workspace TUI.
//!
//! Workspace data lives in [`crate::workspace::WorkspaceState`]; the types
//! here only track what the terminal surface needs on top of it.

mod column_picker;
mod cursor;

pub use column_picker::{
    ALL_VALUES_LABEL, ColumnPicker, PREVIEW_LIMIT, PickerChoice, PickerStage,
};
pub use cursor::ListCursor;

/// Pane that receives navigation keys.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Focus {
    /// Uploaded files.
    #[default]
    Files,
    /// Search, review filter, and column filters.
    Filters,
    /// Loaded rows.
    Rows,
}

impl Focus {
    /// Next pane in the `Tab` cycle; the sidebar panes are skipped while
    /// it is collapsed.
    #[must_use]
    pub const fn next(self, sidebar_collapsed: bool) -> Self {
        if sidebar_collapsed {
            return Self::Rows;
        }
        match self {
            Self::Files => Self::Filters,
            Self::Filters => Self::Rows,
            Self::Rows => Self::Files,
        }
    }
}

/// Entry of the filter pane.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterField {
    /// Free-text search term.
    Search,
    /// Review status filter.
    ReviewStatus,
    /// Exact-match filter on one column.
    Column(String),
}

/// Entries of the filter pane for a file with `headers`, in display order.
#[must_use]
pub fn filter_fields(headers: &[String]) -> Vec<FilterField> {
    [FilterField::Search, FilterField::ReviewStatus]
        .into_iter()
        .chain(headers.iter().cloned().map(FilterField::Column))
        .collect()
}

/// Text field being edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextField {
    /// The staged search term.
    Search,
    /// Path of the file to upload.
    UploadPath,
}

/// An in-progress text edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextEntry {
    /// Field being edited.
    pub field: TextField,
    /// Current text.
    pub buffer: String,
}

impl TextEntry {
    /// Starts editing `field` with `initial` text.
    #[must_use]
    pub fn new(field: TextField, initial: impl Into<String>) -> Self {
        Self {
            field,
            buffer: initial.into(),
        }
    }

    /// Appends a character.
    pub fn push(&mut self, ch: char) {
        self.buffer.push(ch);
    }

    /// Removes the last character.
    pub fn pop(&mut self) {
        self.buffer.pop();
    }
}
