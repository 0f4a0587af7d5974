//! Bulk review-status update operation.

use std::io::{self, Write};
use std::time::Duration;

use torchmap::api::{ApiBase, CsvGateway};
use torchmap::{HttpCsvGateway, TorchmapConfig, WorkspaceError};

use super::open_workspace;
use super::output::write_review_update;

/// Applies the configured review flag to the listed rows.
///
/// # Errors
///
/// Returns [`WorkspaceError::MissingFileId`] without a file id,
/// [`WorkspaceError::InvalidArgument`] for an unknown flag,
/// [`WorkspaceError::NoRowsSelected`] when no listed row exists in the file,
/// or the service error.
pub async fn run(config: &TorchmapConfig) -> Result<(), WorkspaceError> {
    let mut stdout = io::stdout().lock();
    run_with_gateway_builder(config, HttpCsvGateway::with_timeout, &mut stdout).await
}

/// Marks rows using a custom gateway builder.
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
    let target = config
        .mark_target()?
        .ok_or_else(|| WorkspaceError::InvalidArgument {
            argument: "mark requires reviewed or unreviewed".to_owned(),
        })?;
    let requested = config.row_ids();

    let mut workspace = open_workspace(config, build_gateway)?;
    workspace.select_file(Some(file_id)).await?;

    let matched = workspace.select_rows(&requested);
    workspace.mark_selected(target.is_reviewed()).await?;
    write_review_update(writer, matched, requested.len(), target)
}
