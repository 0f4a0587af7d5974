//! TUI mode for reviewing CSV rows.
//!
//! This module provides the entry point for the interactive terminal
//! workspace that lets users browse files, filter rows, and mark them as
//! reviewed.

use std::io::{self, Write};
use std::sync::Arc;

use bubbletea_rs::Program;

use torchmap::api::CsvGateway;
use torchmap::tui::{TuiContext, WorkspaceApp, set_context};
use torchmap::{HttpCsvGateway, TorchmapConfig, WorkspaceError};

use super::telemetry_sink;

/// Runs the interactive workspace.
///
/// # Errors
///
/// Returns an error if:
/// - The API URL is invalid
/// - The request timeout is zero
/// - The initial file list cannot be fetched
/// - The TUI fails to initialise
pub async fn run(config: &TorchmapConfig) -> Result<(), WorkspaceError> {
    let gateway = HttpCsvGateway::with_timeout(config.api_base()?, config.request_timeout()?)?;
    let context = prepare_context(config, gateway).await?;

    // Store the context for WorkspaceApp::init(). If one is already set
    // (e.g. re-running the TUI in the same process) it is kept.
    if !set_context(context) {
        tracing::debug!("terminal workspace context already set");
    }

    run_tui().await.map_err(|error| WorkspaceError::Io {
        message: format!("TUI error: {error}"),
    })
}

/// Fetches the file list and bundles it with the services the program
/// needs.
///
/// # Errors
///
/// Returns the gateway error when the file list cannot be fetched.
pub async fn prepare_context<G>(
    config: &TorchmapConfig,
    gateway: G,
) -> Result<TuiContext, WorkspaceError>
where
    G: CsvGateway + 'static,
{
    let initial_files = gateway.list_files().await?;
    Ok(TuiContext {
        gateway: Arc::new(gateway),
        telemetry: telemetry_sink(config),
        export_dir: config.export_dir(),
        initial_files,
        initial_file: config.require_file_id().ok(),
    })
}

/// Runs the bubbletea-rs program with the `WorkspaceApp` model.
async fn run_tui() -> Result<(), bubbletea_rs::Error> {
    // WorkspaceApp::init() retrieves its context from module-level storage.
    let program = Program::<WorkspaceApp>::builder().alt_screen(true).build()?;

    program.run().await?;

    // Ensure stdout is flushed
    io::stdout().flush().ok();

    Ok(())
}
