//! Torchmap CLI entrypoint for reviewing CSV files.

use std::io::{self, Write};
use std::process::ExitCode;

use ortho_config::OrthoConfig;
use torchmap::logging::init_logging;
use torchmap::{OperationMode, TorchmapConfig, WorkspaceError};

mod cli;

/// Log filter for the interactive workspace, whose screen stderr output
/// would corrupt. `RUST_LOG` still overrides it.
const TUI_LOG_LEVEL: &str = "off";

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            if writeln!(io::stderr().lock(), "{error}").is_err() {
                return ExitCode::FAILURE;
            }
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), WorkspaceError> {
    let config = load_config()?;
    let mode = config.operation_mode();

    let level = if mode == OperationMode::Tui {
        TUI_LOG_LEVEL
    } else {
        config.log_level()
    };
    init_logging(level)?;

    match mode {
        OperationMode::Tui => cli::workspace_tui::run(&config).await,
        OperationMode::Upload => cli::upload::run(&config).await,
        OperationMode::MarkReviewed => cli::mark_reviewed::run(&config).await,
        OperationMode::Export => cli::export::run(&config).await,
        OperationMode::ShowDataset => cli::show_dataset::run(&config).await,
        OperationMode::ListFiles => cli::file_listing::run(&config).await,
    }
}

/// Loads configuration from CLI, environment, and files.
///
/// # Errors
///
/// Returns [`WorkspaceError::Configuration`] when ortho-config fails to parse
/// arguments or load configuration files.
fn load_config() -> Result<TorchmapConfig, WorkspaceError> {
    TorchmapConfig::load().map_err(|error| WorkspaceError::Configuration {
        message: error.to_string(),
    })
}
