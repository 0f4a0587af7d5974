//! Uploaded file listing operation.

use std::io::{self, Write};
use std::time::Duration;

use torchmap::api::{ApiBase, CsvGateway};
use torchmap::{HttpCsvGateway, TorchmapConfig, WorkspaceError};

use super::open_workspace;
use super::output::write_file_listing;

/// Lists the uploaded CSV files.
///
/// # Errors
///
/// Returns [`WorkspaceError::InvalidUrl`] for an unusable API URL, or the
/// service error.
pub async fn run(config: &TorchmapConfig) -> Result<(), WorkspaceError> {
    let mut stdout = io::stdout().lock();
    run_with_gateway_builder(config, HttpCsvGateway::with_timeout, &mut stdout).await
}

/// Lists files using a custom gateway builder.
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
    let mut workspace = open_workspace(config, build_gateway)?;
    workspace.refresh_files().await?;
    write_file_listing(writer, workspace.state().files())
}
