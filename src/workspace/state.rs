//! Workspace state and its transitions.
//!
//! [`WorkspaceState`] owns every piece of client-side state. Each user action
//! is a method that mutates the state and, when the action needs the
//! service, returns a request value describing the call to make. The caller
//! performs the call and feeds the result back through the matching
//! `finish_*` method. Nothing here performs I/O, so every transition can be
//! tested without a rendering surface or a network.
//!
//! # Load sequencing
//!
//! Every load is stamped with a generation number. A result whose generation
//! is older than the latest issued load is discarded, so a slow response can
//! never overwrite a newer one.

use camino::Utf8PathBuf;

use super::filters::{FilterState, ReviewStatusFilter};
use super::notice::Notice;
use super::selection::Selection;
use crate::api::error::WorkspaceError;
use crate::api::models::{
    ColumnCatalog, CsvDataset, CsvFile, FileId, ReviewStatusUpdate, RowId, UploadReceipt,
    export_file_name,
};
use crate::api::query::DatasetQuery;

const LOAD_FAILED: &str = "Error loading CSV data";
const UPLOAD_FAILED: &str = "Error uploading CSV file";
const REVIEW_UPDATE_FAILED: &str = "Error updating review status";
const EXPORT_FAILED: &str = "Error exporting reviewed data";

/// A dataset and catalog fetch to perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadRequest {
    /// Sequence number of this load.
    pub generation: u64,
    /// File to load.
    pub file_id: FileId,
    /// Committed filters.
    pub query: DatasetQuery,
}

/// Results of the two independent fetches issued for one [`LoadRequest`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadOutcome {
    /// Generation of the request these results answer.
    pub generation: u64,
    /// Result of the dataset fetch.
    pub dataset: Result<CsvDataset, WorkspaceError>,
    /// Result of the column catalog fetch.
    pub catalog: Result<ColumnCatalog, WorkspaceError>,
}

/// A local file to read and upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadRequest {
    /// Path of the chosen file.
    pub path: Utf8PathBuf,
}

/// An export to download and save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportRequest {
    /// File whose reviewed rows are exported.
    pub file_id: FileId,
    /// Local name for the saved payload.
    pub file_name: String,
}

/// All client-side state of the review workspace.
#[derive(Debug, Clone, Default)]
pub struct WorkspaceState {
    files: Vec<CsvFile>,
    active_file: Option<FileId>,
    dataset: Option<CsvDataset>,
    catalog: ColumnCatalog,
    filters: FilterState,
    selection: Selection,
    staged_upload: Option<Utf8PathBuf>,
    is_uploading: bool,
    is_updating: bool,
    is_exporting: bool,
    is_loading: bool,
    load_generation: u64,
    notices: Vec<Notice>,
}

impl WorkspaceState {
    /// Creates an empty workspace.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // Accessors

    /// Uploaded files known to the workspace.
    #[must_use]
    pub fn files(&self) -> &[CsvFile] {
        &self.files
    }

    /// Identifier of the active file.
    #[must_use]
    pub const fn active_file(&self) -> Option<&FileId> {
        self.active_file.as_ref()
    }

    /// Registry entry of the active file, if listed.
    #[must_use]
    pub fn active_file_summary(&self) -> Option<&CsvFile> {
        let active = self.active_file.as_ref()?;
        self.files.iter().find(|file| &file.id == active)
    }

    /// The last successfully loaded dataset.
    #[must_use]
    pub const fn dataset(&self) -> Option<&CsvDataset> {
        self.dataset.as_ref()
    }

    /// Distinct values per column of the active file.
    #[must_use]
    pub const fn catalog(&self) -> &ColumnCatalog {
        &self.catalog
    }

    /// Staged filters.
    #[must_use]
    pub const fn filters(&self) -> &FilterState {
        &self.filters
    }

    /// Selected rows.
    #[must_use]
    pub const fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Path chosen for the next upload.
    #[must_use]
    pub const fn staged_upload(&self) -> Option<&Utf8PathBuf> {
        self.staged_upload.as_ref()
    }

    /// Whether an upload is in flight.
    #[must_use]
    pub const fn is_uploading(&self) -> bool {
        self.is_uploading
    }

    /// Whether a bulk review update is in flight.
    #[must_use]
    pub const fn is_updating(&self) -> bool {
        self.is_updating
    }

    /// Whether an export is in flight.
    #[must_use]
    pub const fn is_exporting(&self) -> bool {
        self.is_exporting
    }

    /// Whether a load is in flight.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.is_loading
    }

    /// Generation of the most recently issued load.
    #[must_use]
    pub const fn load_generation(&self) -> u64 {
        self.load_generation
    }

    /// Pending notices, oldest first.
    #[must_use]
    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    /// The most recent notice.
    #[must_use]
    pub fn latest_notice(&self) -> Option<&Notice> {
        self.notices.last()
    }

    /// Removes and returns every pending notice.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    /// Acknowledges the most recent notice.
    pub fn dismiss_notice(&mut self) -> Option<Notice> {
        self.notices.pop()
    }

    fn push_notice(&mut self, notice: Notice) {
        self.notices.push(notice);
    }

    fn warn_precondition(&mut self, error: &WorkspaceError) {
        tracing::debug!("precondition not met: {error}");
        self.push_notice(Notice::warning(error.to_string()));
    }

    fn report_failure(&mut self, operation: &str, error: &WorkspaceError, notice: &str) {
        tracing::error!("{operation} failed: {error}");
        self.push_notice(Notice::error(notice));
    }

    // File registry

    /// Replaces the file list. A failure is logged and leaves the previous
    /// list untouched.
    pub fn apply_file_list(&mut self, result: Result<Vec<CsvFile>, WorkspaceError>) {
        match result {
            Ok(files) => {
                tracing::debug!(count = files.len(), "file list refreshed");
                self.files = files;
            }
            Err(error) => tracing::error!("fetching CSV files failed: {error}"),
        }
    }

    /// Makes `file_id` the active file, resets filters and selection, and
    /// starts a load. Choosing no file is a no-op.
    pub fn select_file(&mut self, choice: Option<FileId>) -> Option<LoadRequest> {
        self.open_file(choice, FilterState::new())
    }

    /// Makes `file_id` active with `filters` already staged, clears the
    /// selection, and starts a load. Choosing no file is a no-op.
    pub fn open_file(
        &mut self,
        choice: Option<FileId>,
        filters: FilterState,
    ) -> Option<LoadRequest> {
        let file_id = choice.filter(|id| !id.as_str().is_empty())?;
        self.active_file = Some(file_id);
        self.filters = filters;
        self.selection.clear();
        self.begin_load()
    }

    // Filters

    /// Stages a new search term.
    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.filters.set_search_term(term);
    }

    /// Stages a new review filter.
    pub const fn set_review_status(&mut self, status: ReviewStatusFilter) {
        self.filters.set_review_status(status);
    }

    /// Stages a value for one column; an empty value removes the filter.
    pub fn set_column_filter(&mut self, header: impl Into<String>, value: impl Into<String>) {
        self.filters.set_column_filter(header, value);
    }

    /// Commits the staged filters by reloading the active file.
    pub fn apply_filters(&mut self) -> Option<LoadRequest> {
        self.begin_load()
    }

    /// Clears the column filters and reloads.
    pub fn clear_column_filters(&mut self) -> Option<LoadRequest> {
        self.filters.clear_column_filters();
        self.begin_load()
    }

    /// Clears every filter and reloads.
    pub fn clear_all_filters(&mut self) -> Option<LoadRequest> {
        self.filters.clear_all();
        self.begin_load()
    }

    // Dataset loading

    /// Starts a load of the active file under the staged filters.
    ///
    /// Returns `None` when no file is active.
    pub fn begin_load(&mut self) -> Option<LoadRequest> {
        let file_id = self.active_file.clone()?;
        self.load_generation = self.load_generation.wrapping_add(1);
        self.is_loading = true;
        Some(LoadRequest {
            generation: self.load_generation,
            file_id,
            query: self.filters.to_query(),
        })
    }

    /// Applies the results of a load.
    ///
    /// Returns false when the outcome answers a superseded request and was
    /// discarded. Otherwise each successful half replaces its slice of state
    /// wholesale; a new dataset always clears the selection.
    pub fn finish_load(&mut self, outcome: LoadOutcome) -> bool {
        if outcome.generation != self.load_generation {
            tracing::warn!(
                stale = outcome.generation,
                latest = self.load_generation,
                "discarding superseded dataset response"
            );
            return false;
        }

        self.is_loading = false;
        let mut failure = None;

        match outcome.dataset {
            Ok(dataset) => {
                self.dataset = Some(dataset);
                self.selection.clear();
            }
            Err(error) => failure = Some(error),
        }

        match outcome.catalog {
            Ok(catalog) => self.catalog = catalog,
            Err(error) => failure = failure.or(Some(error)),
        }

        if let Some(error) = failure {
            self.report_failure("loading CSV data", &error, LOAD_FAILED);
        }

        true
    }

    // Upload

    /// Records the file chosen for upload.
    pub fn stage_upload(&mut self, path: Option<Utf8PathBuf>) {
        self.staged_upload = path.filter(|path| !path.as_str().is_empty());
    }

    /// Starts uploading the staged file.
    ///
    /// Returns `None` when no file is staged or an upload is in flight.
    pub fn begin_upload(&mut self) -> Option<UploadRequest> {
        if self.is_uploading {
            tracing::debug!("upload ignored while another is in flight");
            return None;
        }
        let path = self.staged_upload.clone()?;
        self.is_uploading = true;
        Some(UploadRequest { path })
    }

    /// Applies an upload result.
    ///
    /// Always clears the in-flight flag and the staged file. Returns true
    /// when the file list should be refreshed.
    pub fn finish_upload(&mut self, result: Result<UploadReceipt, WorkspaceError>) -> bool {
        self.is_uploading = false;
        self.staged_upload = None;

        match result {
            Ok(receipt) => {
                tracing::info!(rows = receipt.row_count, "CSV uploaded");
                self.push_notice(Notice::info(format!(
                    "CSV uploaded successfully! {} rows imported.",
                    receipt.row_count
                )));
                true
            }
            Err(error) => {
                self.report_failure("uploading CSV", &error, UPLOAD_FAILED);
                false
            }
        }
    }

    // Selection

    /// Toggles one loaded row. Ids outside the loaded dataset are ignored.
    ///
    /// The loaded row's own id is stored so the update echoes the id in the
    /// form the service sent it.
    pub fn toggle_row(&mut self, id: &RowId) {
        let loaded = self
            .dataset
            .as_ref()
            .and_then(|dataset| dataset.rows.iter().find(|row| &row.id == id))
            .map(|row| row.id.clone());
        match loaded {
            Some(loaded_id) => {
                self.selection.toggle(&loaded_id);
            }
            None => {
                tracing::debug!(row = %id, "ignoring toggle for row outside the loaded dataset");
            }
        }
    }

    /// Selects every loaded row, or clears the selection when all are
    /// already selected.
    pub fn toggle_all_rows(&mut self) {
        if let Some(dataset) = self.dataset.as_ref() {
            self.selection.toggle_all(&dataset.rows);
        }
    }

    // Bulk review status

    /// Builds the bulk update for the selected rows.
    ///
    /// With an empty selection a warning is raised and no update is built.
    /// While another update is in flight the request is ignored.
    pub fn begin_review_update(&mut self, is_reviewed: bool) -> Option<ReviewStatusUpdate> {
        if self.is_updating {
            tracing::debug!("review update ignored while another is in flight");
            return None;
        }
        if self.selection.is_empty() {
            self.warn_precondition(&WorkspaceError::NoRowsSelected);
            return None;
        }
        self.is_updating = true;
        Some(ReviewStatusUpdate {
            row_ids: self.selection.to_vec(),
            is_reviewed,
        })
    }

    /// Applies a bulk update result, reloading the active file on success.
    pub fn finish_review_update(
        &mut self,
        update: &ReviewStatusUpdate,
        result: Result<(), WorkspaceError>,
    ) -> Option<LoadRequest> {
        self.is_updating = false;
        match result {
            Ok(()) => {
                let label = if update.is_reviewed {
                    "reviewed"
                } else {
                    "unreviewed"
                };
                tracing::info!(rows = update.row_ids.len(), label, "review status updated");
                self.push_notice(Notice::info(format!(
                    "{} rows marked as {label}",
                    update.row_ids.len()
                )));
                self.begin_load()
            }
            Err(error) => {
                self.report_failure("updating review status", &error, REVIEW_UPDATE_FAILED);
                None
            }
        }
    }

    // Export

    /// Builds the export of the active file's reviewed rows.
    ///
    /// Without an active file a warning is raised and nothing is built. The
    /// export ignores the staged filters. While another export is in flight
    /// the request is ignored.
    pub fn begin_export(&mut self) -> Option<ExportRequest> {
        if self.is_exporting {
            tracing::debug!("export ignored while another is in flight");
            return None;
        }
        let Some(file_id) = self.active_file.clone() else {
            self.warn_precondition(&WorkspaceError::NoFileSelected);
            return None;
        };

        let original = self
            .dataset
            .as_ref()
            .filter(|dataset| dataset.csv_file.id == file_id)
            .map(|dataset| dataset.csv_file.filename.clone())
            .or_else(|| self.active_file_summary().map(|file| file.filename.clone()))
            .unwrap_or_else(|| format!("{file_id}.csv"));

        self.is_exporting = true;
        Some(ExportRequest {
            file_name: export_file_name(&original),
            file_id,
        })
    }

    /// Applies the result of saving an export.
    pub fn finish_export(&mut self, result: Result<Utf8PathBuf, WorkspaceError>) {
        self.is_exporting = false;
        match result {
            Ok(path) => {
                tracing::info!(%path, "reviewed rows exported");
                self.push_notice(Notice::info(format!("Saved reviewed rows to {path}")));
            }
            Err(error) => self.report_failure("exporting reviewed rows", &error, EXPORT_FAILED),
        }
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
