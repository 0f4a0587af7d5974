//! Gateways for talking to the CSV service.
//!
//! [`CsvGateway`] has one method per service endpoint so that workspace logic
//! can be exercised against mocks, while [`HttpCsvGateway`] performs the real
//! HTTP requests with reqwest.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;

use super::endpoint::ApiBase;
use super::error::WorkspaceError;
use super::error_mapping::{map_status_error, map_transport_error};
use super::models::{
    ColumnCatalog, CsvDataset, CsvFile, FileId, ReviewStatusUpdate, UploadPayload, UploadReceipt,
};
use super::query::DatasetQuery;

const UPLOAD_FIELD: &str = "file";
const CSV_MIME: &str = "text/csv";

/// Gateway exposing the CSV service operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CsvGateway: Send + Sync {
    /// Lists every uploaded file.
    async fn list_files(&self) -> Result<Vec<CsvFile>, WorkspaceError>;

    /// Uploads a CSV file as multipart form data.
    async fn upload_csv(&self, payload: &UploadPayload) -> Result<UploadReceipt, WorkspaceError>;

    /// Loads the rows of `file_id` matching `query`.
    async fn load_dataset(
        &self,
        file_id: &FileId,
        query: &DatasetQuery,
    ) -> Result<CsvDataset, WorkspaceError>;

    /// Loads the distinct values observed per column of `file_id`.
    async fn column_catalog(&self, file_id: &FileId) -> Result<ColumnCatalog, WorkspaceError>;

    /// Applies a review flag to a set of rows.
    async fn update_review_status(&self, update: &ReviewStatusUpdate)
    -> Result<(), WorkspaceError>;

    /// Downloads the reviewed rows of `file_id` as CSV bytes.
    async fn export_reviewed(&self, file_id: &FileId) -> Result<Vec<u8>, WorkspaceError>;
}

#[async_trait]
impl<T> CsvGateway for Arc<T>
where
    T: CsvGateway + ?Sized,
{
    async fn list_files(&self) -> Result<Vec<CsvFile>, WorkspaceError> {
        (**self).list_files().await
    }

    async fn upload_csv(&self, payload: &UploadPayload) -> Result<UploadReceipt, WorkspaceError> {
        (**self).upload_csv(payload).await
    }

    async fn load_dataset(
        &self,
        file_id: &FileId,
        query: &DatasetQuery,
    ) -> Result<CsvDataset, WorkspaceError> {
        (**self).load_dataset(file_id, query).await
    }

    async fn column_catalog(&self, file_id: &FileId) -> Result<ColumnCatalog, WorkspaceError> {
        (**self).column_catalog(file_id).await
    }

    async fn update_review_status(
        &self,
        update: &ReviewStatusUpdate,
    ) -> Result<(), WorkspaceError> {
        (**self).update_review_status(update).await
    }

    async fn export_reviewed(&self, file_id: &FileId) -> Result<Vec<u8>, WorkspaceError> {
        (**self).export_reviewed(file_id).await
    }
}

/// reqwest-backed gateway.
#[derive(Debug, Clone)]
pub struct HttpCsvGateway {
    client: Client,
    base: ApiBase,
}

impl HttpCsvGateway {
    /// Creates a gateway from an existing client.
    #[must_use]
    pub const fn new(client: Client, base: ApiBase) -> Self {
        Self { client, base }
    }

    /// Builds a gateway whose requests fail after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceError::Configuration`] when the HTTP client cannot
    /// be constructed.
    pub fn with_timeout(base: ApiBase, timeout: Duration) -> Result<Self, WorkspaceError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|error| WorkspaceError::Configuration {
                message: format!("failed to configure HTTP client: {error}"),
            })?;
        Ok(Self::new(client, base))
    }

    /// Returns the API base this gateway talks to.
    #[must_use]
    pub const fn base(&self) -> &ApiBase {
        &self.base
    }
}

#[async_trait]
impl CsvGateway for HttpCsvGateway {
    async fn list_files(&self) -> Result<Vec<CsvFile>, WorkspaceError> {
        const OPERATION: &str = "list CSV files";
        let response = send(OPERATION, self.client.get(self.base.csv_files())).await?;
        decode_json(OPERATION, response).await
    }

    async fn upload_csv(&self, payload: &UploadPayload) -> Result<UploadReceipt, WorkspaceError> {
        const OPERATION: &str = "upload CSV";
        let part = Part::bytes(payload.contents.clone())
            .file_name(payload.file_name.clone())
            .mime_str(CSV_MIME)
            .map_err(|error| map_transport_error(OPERATION, &error))?;
        let form = Form::new().part(UPLOAD_FIELD, part);

        let request = self.client.post(self.base.upload_csv()).multipart(form);
        let response = send(OPERATION, request).await?;
        decode_json(OPERATION, response).await
    }

    async fn load_dataset(
        &self,
        file_id: &FileId,
        query: &DatasetQuery,
    ) -> Result<CsvDataset, WorkspaceError> {
        const OPERATION: &str = "load CSV data";
        let request = self
            .client
            .get(self.base.csv_data(file_id))
            .query(&query.to_pairs());
        let response = send(OPERATION, request).await?;
        decode_json(OPERATION, response).await
    }

    async fn column_catalog(&self, file_id: &FileId) -> Result<ColumnCatalog, WorkspaceError> {
        const OPERATION: &str = "load column values";
        let response = send(OPERATION, self.client.get(self.base.csv_columns(file_id))).await?;
        decode_json(OPERATION, response).await
    }

    async fn update_review_status(
        &self,
        update: &ReviewStatusUpdate,
    ) -> Result<(), WorkspaceError> {
        const OPERATION: &str = "update review status";
        let request = self
            .client
            .post(self.base.update_review_status())
            .json(update);
        send(OPERATION, request).await.map(drop)
    }

    async fn export_reviewed(&self, file_id: &FileId) -> Result<Vec<u8>, WorkspaceError> {
        const OPERATION: &str = "export reviewed rows";
        let response = send(
            OPERATION,
            self.client.get(self.base.export_reviewed(file_id)),
        )
        .await?;
        response
            .bytes()
            .await
            .map(|bytes| bytes.to_vec())
            .map_err(|error| map_transport_error(OPERATION, &error))
    }
}

/// Sends a request and rejects non-success statuses.
async fn send(operation: &str, request: RequestBuilder) -> Result<Response, WorkspaceError> {
    tracing::debug!(operation, "sending CSV service request");

    let response = request
        .send()
        .await
        .map_err(|error| map_transport_error(operation, &error))?;

    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "(failed to read error response body)".to_owned());
    Err(map_status_error(operation, status, &body))
}

async fn decode_json<T>(operation: &str, response: Response) -> Result<T, WorkspaceError>
where
    T: DeserializeOwned,
{
    response
        .json::<T>()
        .await
        .map_err(|error| map_transport_error(operation, &error))
}

#[cfg(test)]
#[path = "gateway_tests.rs"]
mod tests;
