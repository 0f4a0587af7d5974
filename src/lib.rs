//! Torchmap library crate for reviewing uploaded CSV files.
//!
//! The library talks to a CSV management service over HTTP, keeps the
//! client-side review workspace (active file, staged filters, row selection,
//! and notices), and provides a terminal surface over that workspace.
//! Failures surface as [`WorkspaceError`] values that the CLI can display.

pub mod api;
pub mod config;
pub mod logging;
pub mod telemetry;
pub mod tui;
pub mod workspace;

pub use api::{
    ApiBase, ColumnCatalog, CsvDataset, CsvFile, CsvGateway, CsvRow, DatasetQuery, FileId,
    HttpCsvGateway, RowId, WorkspaceError,
};
pub use config::{MarkTarget, OperationMode, TorchmapConfig};
pub use workspace::{FilterState, ReviewStatusFilter, Workspace, WorkspaceState};
