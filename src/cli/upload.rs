//! CSV upload operation.

use std::io::{self, Write};
use std::time::Duration;

use torchmap::api::{ApiBase, CsvGateway};
use torchmap::{HttpCsvGateway, TorchmapConfig, WorkspaceError};

use super::open_workspace;
use super::output::write_upload_receipt;

/// Uploads the configured CSV file.
///
/// # Errors
///
/// Returns [`WorkspaceError::InvalidArgument`] when no upload path is
/// configured, [`WorkspaceError::Io`] when the file cannot be read, or the
/// service error.
pub async fn run(config: &TorchmapConfig) -> Result<(), WorkspaceError> {
    let mut stdout = io::stdout().lock();
    run_with_gateway_builder(config, HttpCsvGateway::with_timeout, &mut stdout).await
}

/// Uploads using a custom gateway builder.
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
    let path = config
        .upload_path()
        .ok_or_else(|| WorkspaceError::InvalidArgument {
            argument: "upload requires a file path".to_owned(),
        })?;

    let mut workspace = open_workspace(config, build_gateway)?;
    let receipt = workspace.upload(path.clone()).await?;
    write_upload_receipt(writer, &path, &receipt)
}
