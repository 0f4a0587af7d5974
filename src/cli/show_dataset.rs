//! Dataset display operation.

use std::io::{self, Write};
use std::time::Duration;

use torchmap::api::{ApiBase, CsvGateway};
use torchmap::workspace::FilterState;
use torchmap::{HttpCsvGateway, TorchmapConfig, WorkspaceError};

use super::open_workspace;
use super::output::write_dataset;

/// Prints the rows of the configured file under the configured filters.
///
/// # Errors
///
/// Returns [`WorkspaceError::MissingFileId`] when no file id is configured,
/// [`WorkspaceError::InvalidArgument`] for malformed filters, or the service
/// error.
pub async fn run(config: &TorchmapConfig) -> Result<(), WorkspaceError> {
    let mut stdout = io::stdout().lock();
    run_with_gateway_builder(config, HttpCsvGateway::with_timeout, &mut stdout).await
}

/// Prints a dataset using a custom gateway builder.
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
    let filters = configured_filters(config)?;

    let mut workspace = open_workspace(config, build_gateway)?;
    workspace.open_filtered(file_id, filters).await?;

    let state = workspace.state();
    let Some(dataset) = state.dataset() else {
        return Err(WorkspaceError::NoFileSelected);
    };
    write_dataset(writer, dataset, state.filters())
}

/// Builds the filter state described by the search, review, and column
/// filter settings.
///
/// # Errors
///
/// Returns [`WorkspaceError::InvalidArgument`] for an unknown review filter
/// or malformed column filters.
pub fn configured_filters(config: &TorchmapConfig) -> Result<FilterState, WorkspaceError> {
    let mut filters = FilterState::new();
    if let Some(term) = config.search.as_deref() {
        filters.set_search_term(term);
    }
    filters.set_review_status(config.review_filter()?);
    for (header, value) in config.column_filter_map()? {
        filters.set_column_filter(header, value);
    }
    Ok(filters)
}
