//! Diagnostic logging through `tracing`.
//!
//! Logs go to stderr so that stdout stays reserved for command output.
//! `RUST_LOG` takes precedence over the configured level.
//!
//! # Log Levels
//!
//! - `error`: failed service calls
//! - `warn`: discarded stale responses
//! - `info`: completed uploads, updates, and exports
//! - `debug`: request dispatch and ignored user actions

use std::io;

use tracing_subscriber::EnvFilter;

use crate::api::error::WorkspaceError;

/// Level used when neither `RUST_LOG` nor configuration sets one.
pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// Builds the filter applied to log events.
///
/// # Errors
///
/// Returns [`WorkspaceError::Configuration`] when `level` is not a valid
/// filter directive and `RUST_LOG` is unset or invalid.
pub fn build_filter(level: &str) -> Result<EnvFilter, WorkspaceError> {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .map_err(|error| WorkspaceError::Configuration {
            message: format!("invalid log level '{level}': {error}"),
        })
}

/// Installs the global stderr subscriber.
///
/// Calling this more than once keeps the first subscriber.
///
/// # Errors
///
/// Returns [`WorkspaceError::Configuration`] when the level is invalid.
pub fn init_logging(level: &str) -> Result<(), WorkspaceError> {
    let filter = build_filter(level)?;
    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
    if installed.is_err() {
        tracing::debug!("logging already initialised");
    }
    Ok(())
}
