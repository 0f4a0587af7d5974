//! Client for the CSV management service.
//!
//! This module resolves service endpoints, composes dataset queries, and
//! wraps reqwest behind the [`CsvGateway`] trait. Failures are mapped into
//! [`WorkspaceError`] variants so that callers can report them without
//! exposing transport internals.

pub mod endpoint;
pub mod error;
mod error_mapping;
pub mod gateway;
pub mod models;
pub mod query;

pub use endpoint::ApiBase;
pub use error::WorkspaceError;
pub use gateway::{CsvGateway, HttpCsvGateway};
pub use models::{
    ColumnCatalog, CsvDataset, CsvFile, CsvRow, ExportPayload, FileId, ReviewStatusUpdate, RowId,
    UploadPayload, UploadReceipt,
};
pub use query::DatasetQuery;

#[cfg(test)]
pub use gateway::MockCsvGateway;
