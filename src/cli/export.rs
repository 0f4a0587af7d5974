//! Reviewed-row export operation.

use std::io::{self, Write};
use std::time::Duration;

use torchmap::api::{ApiBase, CsvGateway};
use torchmap::{HttpCsvGateway, TorchmapConfig, WorkspaceError};

use super::open_workspace;
use super::output::write_export_path;

/// Saves the reviewed rows of the configured file into the export directory.
///
/// # Errors
///
/// Returns [`WorkspaceError::MissingFileId`] without a file id,
/// [`WorkspaceError::Io`] when the export cannot be written, or the service
/// error.
pub async fn run(config: &TorchmapConfig) -> Result<(), WorkspaceError> {
    let mut stdout = io::stdout().lock();
    run_with_gateway_builder(config, HttpCsvGateway::with_timeout, &mut stdout).await
}

/// Exports using a custom gateway builder.
///
/// This function is exposed for testing with stub gateways.
pub async fn run_with_gateway_builder<G, F, W>(
    config: &TorchmapConfig,
    build_gateway: F,
    writer: &mut W,
) -> Result<(), WorkspaceError>
where
    G: CsvGateway,
    F: FnOnce(ApiBase, Duration) -> Result<G, WorkspaceError>,
    W: Write,
{
    let file_id = config.require_file_id()?;

    let mut workspace = open_workspace(config, build_gateway)?;
    // The loaded dataset names the export file.
    workspace.select_file(Some(file_id)).await?;
    let path = workspace.export_reviewed().await?;
    write_export_path(writer, &path)
}
