//! Async orchestration of workspace actions.
//!
//! [`Workspace`] pairs each [`WorkspaceState`] transition with the gateway
//! call it asks for and feeds the result back into the state. The `perform_*`
//! functions hold the I/O half of each action on their own so that the
//! terminal surface can run them as background commands.

use std::sync::Arc;
use std::time::Instant;

use camino::{Utf8Path, Utf8PathBuf};

use super::filters::FilterState;
use super::local_files::{read_upload, save_export};
use super::state::{ExportRequest, LoadOutcome, LoadRequest, UploadRequest, WorkspaceState};
use crate::api::error::WorkspaceError;
use crate::api::gateway::CsvGateway;
use crate::api::models::{ExportPayload, FileId, ReviewStatusUpdate, RowId, UploadReceipt};
use crate::telemetry::{NoopTelemetrySink, TelemetryEvent, TelemetrySink};

/// Fetches the dataset and column catalog for `request` concurrently.
pub async fn perform_load<G>(
    gateway: &G,
    telemetry: &dyn TelemetrySink,
    request: LoadRequest,
) -> LoadOutcome
where
    G: CsvGateway + ?Sized,
{
    tracing::debug!(
        file_id = %request.file_id,
        generation = request.generation,
        "loading dataset"
    );
    let started = Instant::now();
    let (dataset, catalog) = tokio::join!(
        gateway.load_dataset(&request.file_id, &request.query),
        gateway.column_catalog(&request.file_id),
    );

    if let Ok(loaded) = dataset.as_ref() {
        telemetry.record(TelemetryEvent::DatasetLoaded {
            file_id: request.file_id.to_string(),
            row_count: saturating_u64(loaded.rows.len()),
            latency_ms: u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
        });
    }

    LoadOutcome {
        generation: request.generation,
        dataset,
        catalog,
    }
}

/// Reads the staged file and uploads it.
///
/// # Errors
///
/// Returns [`WorkspaceError::Io`] when the file cannot be read, or the
/// gateway error when the upload fails.
pub async fn perform_upload<G>(
    gateway: &G,
    request: &UploadRequest,
) -> Result<UploadReceipt, WorkspaceError>
where
    G: CsvGateway + ?Sized,
{
    let payload = read_upload(&request.path)?;
    tracing::debug!(file = %payload.file_name, bytes = payload.contents.len(), "uploading CSV");
    gateway.upload_csv(&payload).await
}

/// Sends a bulk review-status update.
///
/// # Errors
///
/// Returns the gateway error when the service rejects the update.
pub async fn perform_review_update<G>(
    gateway: &G,
    telemetry: &dyn TelemetrySink,
    update: &ReviewStatusUpdate,
) -> Result<(), WorkspaceError>
where
    G: CsvGateway + ?Sized,
{
    gateway.update_review_status(update).await?;
    telemetry.record(TelemetryEvent::ReviewStatusUpdated {
        row_count: saturating_u64(update.row_ids.len()),
        is_reviewed: update.is_reviewed,
    });
    Ok(())
}

/// Downloads an export and saves it into `directory`.
///
/// # Errors
///
/// Returns the gateway error when the download fails, or
/// [`WorkspaceError::Io`] when the payload cannot be written.
pub async fn perform_export<G>(
    gateway: &G,
    telemetry: &dyn TelemetrySink,
    request: &ExportRequest,
    directory: &Utf8Path,
) -> Result<Utf8PathBuf, WorkspaceError>
where
    G: CsvGateway + ?Sized,
{
    let contents = gateway.export_reviewed(&request.file_id).await?;
    let payload = ExportPayload {
        file_id: request.file_id.clone(),
        file_name: request.file_name.clone(),
        contents,
    };
    let path = save_export(directory, &payload)?;
    telemetry.record(TelemetryEvent::ExportSaved {
        file_id: payload.file_id.to_string(),
        bytes: saturating_u64(payload.contents.len()),
    });
    Ok(path)
}

fn saturating_u64(value: usize) -> u64 {
    u64::try_from(value).unwrap_or(u64::MAX)
}

/// A review workspace bound to a gateway.
///
/// Every method updates the held [`WorkspaceState`], including its notices,
/// and also returns the outcome so that non-interactive callers can report
/// it directly.
pub struct Workspace<G> {
    gateway: G,
    state: WorkspaceState,
    telemetry: Arc<dyn TelemetrySink>,
    export_dir: Utf8PathBuf,
}

impl<G: CsvGateway> Workspace<G> {
    /// Creates an empty workspace that exports into the working directory.
    #[must_use]
    pub fn new(gateway: G) -> Self {
        Self {
            gateway,
            state: WorkspaceState::new(),
            telemetry: Arc::new(NoopTelemetrySink),
            export_dir: Utf8PathBuf::from("."),
        }
    }

    /// Replaces the telemetry sink.
    #[must_use]
    pub fn with_telemetry(mut self, telemetry: Arc<dyn TelemetrySink>) -> Self {
        self.telemetry = telemetry;
        self
    }

    /// Replaces the directory exports are written to.
    #[must_use]
    pub fn with_export_dir(mut self, export_dir: impl Into<Utf8PathBuf>) -> Self {
        self.export_dir = export_dir.into();
        self
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> &WorkspaceState {
        &self.state
    }

    /// Mutable access for staging filters.
    pub const fn state_mut(&mut self) -> &mut WorkspaceState {
        &mut self.state
    }

    /// Refreshes the file list.
    ///
    /// # Errors
    ///
    /// Returns the gateway error; the previous list is kept.
    pub async fn refresh_files(&mut self) -> Result<(), WorkspaceError> {
        let result = self.gateway.list_files().await;
        let outcome = result.as_ref().map(|_| ()).map_err(Clone::clone);
        self.state.apply_file_list(result);
        outcome
    }

    /// Stages `path` and uploads it, refreshing the file list on success.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceError::UploadInProgress`] while another upload is in
    /// flight, or the read/upload error.
    pub async fn upload(&mut self, path: Utf8PathBuf) -> Result<UploadReceipt, WorkspaceError> {
        if self.state.is_uploading() {
            return Err(WorkspaceError::UploadInProgress);
        }
        self.state.stage_upload(Some(path));
        let Some(request) = self.state.begin_upload() else {
            return Err(WorkspaceError::InvalidArgument {
                argument: "upload path is empty".to_owned(),
            });
        };

        let result = perform_upload(&self.gateway, &request).await;
        if self.state.finish_upload(result.clone()) {
            // A failed refresh is logged by the state and does not undo the upload.
            let _refreshed = self.refresh_files().await;
        }
        result
    }

    /// Makes `file_id` active and loads it with cleared filters.
    ///
    /// # Errors
    ///
    /// Returns the dataset load error; a catalog failure is only reported.
    pub async fn select_file(&mut self, file_id: Option<FileId>) -> Result<(), WorkspaceError> {
        match self.state.select_file(file_id) {
            Some(request) => self.run_load(request).await,
            None => Ok(()),
        }
    }

    /// Makes `file_id` active and loads it under `filters` in one request.
    ///
    /// # Errors
    ///
    /// Returns the dataset load error; a catalog failure is only reported.
    pub async fn open_filtered(
        &mut self,
        file_id: FileId,
        filters: FilterState,
    ) -> Result<(), WorkspaceError> {
        match self.state.open_file(Some(file_id), filters) {
            Some(request) => self.run_load(request).await,
            None => Ok(()),
        }
    }

    /// Reloads the active file under the staged filters.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceError::NoFileSelected`] without an active file, or
    /// the dataset load error.
    pub async fn apply_filters(&mut self) -> Result<(), WorkspaceError> {
        let request = self
            .state
            .apply_filters()
            .ok_or(WorkspaceError::NoFileSelected)?;
        self.run_load(request).await
    }

    /// Clears column filters and reloads.
    ///
    /// # Errors
    ///
    /// See [`Workspace::apply_filters`].
    pub async fn clear_column_filters(&mut self) -> Result<(), WorkspaceError> {
        let request = self
            .state
            .clear_column_filters()
            .ok_or(WorkspaceError::NoFileSelected)?;
        self.run_load(request).await
    }

    /// Clears every filter and reloads.
    ///
    /// # Errors
    ///
    /// See [`Workspace::apply_filters`].
    pub async fn clear_all_filters(&mut self) -> Result<(), WorkspaceError> {
        let request = self
            .state
            .clear_all_filters()
            .ok_or(WorkspaceError::NoFileSelected)?;
        self.run_load(request).await
    }

    /// Adds the given loaded rows to the selection and returns how many ids
    /// matched a loaded row.
    pub fn select_rows(&mut self, ids: &[RowId]) -> usize {
        let mut matched = 0;
        for id in ids {
            if self.state.selection().contains(id) {
                matched += 1;
                continue;
            }
            self.state.toggle_row(id);
            if self.state.selection().contains(id) {
                matched += 1;
            }
        }
        matched
    }

    /// Applies `is_reviewed` to the selected rows and reloads.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceError::NoRowsSelected`] with an empty selection, or
    /// the update error. A failed follow-up reload is reported as a notice
    /// only, since the update itself went through.
    pub async fn mark_selected(&mut self, is_reviewed: bool) -> Result<(), WorkspaceError> {
        let update = self
            .state
            .begin_review_update(is_reviewed)
            .ok_or(WorkspaceError::NoRowsSelected)?;

        let result = perform_review_update(&self.gateway, self.telemetry.as_ref(), &update).await;
        let reload = self.state.finish_review_update(&update, result.clone());
        result?;

        if let Some(request) = reload {
            // The update is already applied; a failed reload only leaves the
            // previous rows on screen and is reported by the state.
            let _reloaded = self.run_load(request).await;
        }
        Ok(())
    }

    /// Exports the active file's reviewed rows into the export directory.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceError::NoFileSelected`] without an active file, or
    /// the download/write error.
    pub async fn export_reviewed(&mut self) -> Result<Utf8PathBuf, WorkspaceError> {
        let request = self
            .state
            .begin_export()
            .ok_or(WorkspaceError::NoFileSelected)?;

        let result = perform_export(
            &self.gateway,
            self.telemetry.as_ref(),
            &request,
            &self.export_dir,
        )
        .await;
        self.state.finish_export(result.clone());
        result
    }

    /// Runs a load and returns the dataset half of the outcome.
    ///
    /// A catalog failure only affects the filter picker; the state reports
    /// it and callers that need rows carry on.
    async fn run_load(&mut self, request: LoadRequest) -> Result<(), WorkspaceError> {
        let outcome = perform_load(&self.gateway, self.telemetry.as_ref(), request).await;
        let failure = outcome.dataset.as_ref().err().cloned();
        self.state.finish_load(outcome);
        failure.map_or(Ok(()), Err)
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
