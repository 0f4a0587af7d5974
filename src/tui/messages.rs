//! Message types for the TUI update loop.
//!
//! Messages represent user actions, async command results, and system
//! events.

use camino::Utf8PathBuf;

use crate::api::error::WorkspaceError;
use crate::api::models::{CsvFile, ReviewStatusUpdate, UploadReceipt};
use crate::workspace::state::LoadOutcome;

/// Messages for the workspace TUI application.
#[derive(Debug, Clone)]
pub enum AppMsg {
    // Navigation
    /// Move cursor up one item.
    CursorUp,
    /// Move cursor down one item.
    CursorDown,
    /// Move cursor up one page.
    PageUp,
    /// Move cursor down one page.
    PageDown,
    /// Move cursor to first item.
    Home,
    /// Move cursor to last item.
    End,
    /// Move focus to the next pane.
    CycleFocus,

    // Selection
    /// Act on the item under the cursor.
    Activate,
    /// Toggle the row under the cursor.
    ToggleRow,
    /// Select every loaded row, or clear when all are selected.
    ToggleAllRows,

    // Filters
    /// Start editing the search term.
    EditSearch,
    /// Cycle the staged review filter.
    CycleReviewFilter,
    /// Open the column filter picker.
    OpenColumnPicker,
    /// Reload with the staged filters.
    ApplyFilters,
    /// Clear column filters and reload.
    ClearColumnFilters,
    /// Clear every filter and reload.
    ClearAllFilters,

    // Text entry and picker
    /// A printable character typed while editing.
    InputChar(char),
    /// Delete the character before the caret.
    InputBackspace,
    /// Confirm the edit or picker choice.
    InputSubmit,
    /// Leave the edit or picker without changes.
    InputCancel,

    // Actions
    /// Mark the selected rows.
    MarkSelected {
        /// Target review flag.
        is_reviewed: bool,
    },
    /// Export the active file's reviewed rows.
    Export,
    /// Start editing the upload path.
    EditUploadPath,
    /// Reload the file list.
    RefreshFiles,

    // Command results
    /// The file list request finished.
    FilesLoaded(Result<Vec<CsvFile>, WorkspaceError>),
    /// A dataset load finished.
    LoadFinished(LoadOutcome),
    /// An upload finished.
    UploadFinished(Result<UploadReceipt, WorkspaceError>),
    /// A bulk review update finished.
    ReviewUpdateFinished {
        /// The update that was sent.
        update: ReviewStatusUpdate,
        /// Service result.
        result: Result<(), WorkspaceError>,
    },
    /// An export finished.
    ExportFinished(Result<Utf8PathBuf, WorkspaceError>),

    // Application lifecycle
    /// Start-up event that triggers the first render.
    Initialized,
    /// Quit the application.
    Quit,
    /// Toggle help overlay.
    ToggleHelp,
    /// Collapse or expand the sidebar.
    ToggleSidebar,
    /// Acknowledge the latest notice.
    DismissNotice,

    // Window events
    /// Terminal window was resized.
    WindowResized {
        /// New width in columns.
        width: u16,
        /// New height in rows.
        height: u16,
    },
}

impl AppMsg {
    /// Returns true for cursor and focus movement.
    #[must_use]
    pub const fn is_navigation(&self) -> bool {
        matches!(
            self,
            Self::CursorUp
                | Self::CursorDown
                | Self::PageUp
                | Self::PageDown
                | Self::Home
                | Self::End
                | Self::CycleFocus
        )
    }

    /// Returns true for filter staging and committing.
    #[must_use]
    pub const fn is_filter(&self) -> bool {
        matches!(
            self,
            Self::EditSearch
                | Self::CycleReviewFilter
                | Self::OpenColumnPicker
                | Self::ApplyFilters
                | Self::ClearColumnFilters
                | Self::ClearAllFilters
        )
    }

    /// Returns true for text entry and picker input.
    #[must_use]
    pub const fn is_entry(&self) -> bool {
        matches!(
            self,
            Self::InputChar(_) | Self::InputBackspace | Self::InputSubmit | Self::InputCancel
        )
    }

    /// Returns true for user actions that start service requests or change
    /// the selection.
    #[must_use]
    pub const fn is_action(&self) -> bool {
        matches!(
            self,
            Self::Activate
                | Self::ToggleRow
                | Self::ToggleAllRows
                | Self::MarkSelected { .. }
                | Self::Export
                | Self::EditUploadPath
                | Self::RefreshFiles
        )
    }

    /// Returns true for results of background commands.
    #[must_use]
    pub const fn is_result(&self) -> bool {
        matches!(
            self,
            Self::FilesLoaded(_)
                | Self::LoadFinished(_)
                | Self::UploadFinished(_)
                | Self::ReviewUpdateFinished { .. }
                | Self::ExportFinished(_)
        )
    }
}
