//! Shared test utilities for CLI tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use torchmap::WorkspaceError;
use torchmap::api::models::{
    ColumnCatalog, CsvDataset, CsvFile, FileId, ReviewStatusUpdate, UploadPayload, UploadReceipt,
};
use torchmap::api::{CsvGateway, DatasetQuery};

/// In-memory gateway that records every call it receives.
///
/// Review updates are applied to the stored dataset so that the reload
/// following a bulk update observes them.
#[derive(Clone, Default)]
pub struct StubGateway {
    /// Files returned by `list_files`.
    pub files: Arc<Mutex<Vec<CsvFile>>>,
    /// Dataset returned by `load_dataset`; `None` answers with an API error.
    pub dataset: Arc<Mutex<Option<CsvDataset>>>,
    /// Error returned by `column_catalog`; `None` answers with an empty
    /// catalog.
    pub catalog_error: Arc<Mutex<Option<WorkspaceError>>>,
    /// Bytes returned by `export_reviewed`.
    pub export_bytes: Arc<Mutex<Vec<u8>>>,
    /// Queries received by `load_dataset`.
    pub queries: Arc<Mutex<Vec<(FileId, DatasetQuery)>>>,
    /// Payloads received by `upload_csv`.
    pub uploads: Arc<Mutex<Vec<UploadPayload>>>,
    /// Updates received by `update_review_status`.
    pub updates: Arc<Mutex<Vec<ReviewStatusUpdate>>>,
}

impl StubGateway {
    /// Creates a gateway serving `dataset` and listing its file.
    pub fn serving(dataset: CsvDataset) -> Self {
        let gateway = Self::default();
        gateway
            .files
            .lock()
            .expect("files mutex should be available")
            .push(dataset.csv_file.clone());
        gateway
            .dataset
            .lock()
            .expect("dataset mutex should be available")
            .replace(dataset);
        gateway
    }

    /// Makes every `column_catalog` call fail with `error`.
    pub fn failing_catalog(self, error: WorkspaceError) -> Self {
        self.catalog_error
            .lock()
            .expect("catalog mutex should be available")
            .replace(error);
        self
    }

    /// Returns the recorded dataset queries.
    pub fn recorded_queries(&self) -> Vec<(FileId, DatasetQuery)> {
        self.queries
            .lock()
            .expect("queries mutex should be available")
            .clone()
    }

    /// Returns the recorded review updates.
    pub fn recorded_updates(&self) -> Vec<ReviewStatusUpdate> {
        self.updates
            .lock()
            .expect("updates mutex should be available")
            .clone()
    }
}

#[async_trait]
impl CsvGateway for StubGateway {
    async fn list_files(&self) -> Result<Vec<CsvFile>, WorkspaceError> {
        Ok(self
            .files
            .lock()
            .expect("files mutex should be available")
            .clone())
    }

    async fn upload_csv(&self, payload: &UploadPayload) -> Result<UploadReceipt, WorkspaceError> {
        self.uploads
            .lock()
            .expect("uploads mutex should be available")
            .push(payload.clone());
        let lines = String::from_utf8_lossy(&payload.contents).lines().count();
        Ok(UploadReceipt {
            row_count: u64::try_from(lines.saturating_sub(1)).unwrap_or(u64::MAX),
        })
    }

    async fn load_dataset(
        &self,
        file_id: &FileId,
        query: &DatasetQuery,
    ) -> Result<CsvDataset, WorkspaceError> {
        self.queries
            .lock()
            .expect("queries mutex should be available")
            .push((file_id.clone(), query.clone()));
        self.dataset
            .lock()
            .expect("dataset mutex should be available")
            .clone()
            .ok_or_else(|| WorkspaceError::Api {
                message: format!("load dataset failed with status 404: file {file_id} not found"),
            })
    }

    async fn column_catalog(&self, _file_id: &FileId) -> Result<ColumnCatalog, WorkspaceError> {
        self.catalog_error
            .lock()
            .expect("catalog mutex should be available")
            .clone()
            .map_or_else(|| Ok(ColumnCatalog::default()), Err)
    }

    async fn update_review_status(
        &self,
        update: &ReviewStatusUpdate,
    ) -> Result<(), WorkspaceError> {
        self.updates
            .lock()
            .expect("updates mutex should be available")
            .push(update.clone());
        let mut stored = self
            .dataset
            .lock()
            .expect("dataset mutex should be available");
        if let Some(dataset) = stored.as_mut() {
            for row in &mut dataset.rows {
                if update.row_ids.contains(&row.id) {
                    row.is_reviewed = update.is_reviewed;
                }
            }
        }
        Ok(())
    }

    async fn export_reviewed(&self, _file_id: &FileId) -> Result<Vec<u8>, WorkspaceError> {
        Ok(self
            .export_bytes
            .lock()
            .expect("export mutex should be available")
            .clone())
    }
}
