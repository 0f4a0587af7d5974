//! CLI operation mode handlers.
//!
//! This module contains the implementations for the different operation
//! modes:
//! - [`file_listing`]: Print the uploaded files
//! - [`upload`]: Upload a local CSV file
//! - [`show_dataset`]: Print a file's rows under the configured filters
//! - [`mark_reviewed`]: Apply a review flag to listed rows
//! - [`export`]: Save the reviewed rows of a file
//! - [`workspace_tui`]: Interactive terminal workspace
//!
//! Output formatting utilities are in [`output`].

use std::sync::Arc;
use std::time::Duration;

use torchmap::api::{ApiBase, CsvGateway};
use torchmap::telemetry::{NoopTelemetrySink, StderrJsonlTelemetrySink, TelemetrySink};
use torchmap::{TorchmapConfig, Workspace, WorkspaceError};

pub mod export;
pub mod file_listing;
pub mod mark_reviewed;
pub mod output;
pub mod show_dataset;
pub mod upload;
pub mod workspace_tui;

#[cfg(test)]
pub mod test_utils;

/// Returns the telemetry sink selected by `config`.
pub fn telemetry_sink(config: &TorchmapConfig) -> Arc<dyn TelemetrySink> {
    if config.telemetry {
        Arc::new(StderrJsonlTelemetrySink)
    } else {
        Arc::new(NoopTelemetrySink)
    }
}

/// Builds a gateway with `build_gateway` and wraps it in a workspace
/// configured for telemetry and exports.
///
/// # Errors
///
/// Returns [`WorkspaceError::InvalidUrl`] for an unusable API URL,
/// [`WorkspaceError::InvalidArgument`] for a zero timeout, or the builder's
/// error.
pub fn open_workspace<G, F>(
    config: &TorchmapConfig,
    build_gateway: F,
) -> Result<Workspace<G>, WorkspaceError>
where
    G: CsvGateway,
    F: FnOnce(ApiBase, Duration) -> Result<G, WorkspaceError>,
{
    let gateway = build_gateway(config.api_base()?, config.request_timeout()?)?;
    Ok(Workspace::new(gateway)
        .with_telemetry(telemetry_sink(config))
        .with_export_dir(config.export_dir()))
}
