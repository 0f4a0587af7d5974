//! Terminal workspace for reviewing CSV rows.
//!
//! This module provides an interactive TUI over [`crate::workspace`] using
//! the bubbletea-rs framework.
//!
//! # Architecture
//!
//! The TUI follows the Model-View-Update (MVU) pattern:
//!
//! - **Model**: [`app::WorkspaceApp`] wraps a
//!   [`crate::workspace::WorkspaceState`] plus cursor and focus state
//! - **View**: Rendering in `app::rendering` and the [`components`]
//! - **Update**: Message-driven transitions; network work runs as commands
//!   whose completion messages are fed back into the workspace state
//!
//! # Modules
//!
//! - [`app`]: Main application model and entry point
//! - [`messages`]: Message types for the update loop
//! - [`state`]: Cursor, text entry, and column picker state
//! - [`components`]: Pane renderers
//! - [`input`]: Key-to-message mapping for input handling
//!
//! # Program Context
//!
//! bubbletea-rs's `Model::init()` is a static function, so the gateway and
//! initial data are stored at module level. Call [`set_context`] before
//! starting the program; `WorkspaceApp::init()` picks it up.

use std::sync::{Arc, OnceLock};

use camino::Utf8PathBuf;

use crate::api::gateway::CsvGateway;
use crate::api::models::{CsvFile, FileId};
use crate::telemetry::TelemetrySink;

pub mod app;
pub mod components;
pub mod input;
pub mod messages;
pub mod state;

pub use app::WorkspaceApp;

/// Global storage for the program context.
static CONTEXT: OnceLock<Arc<TuiContext>> = OnceLock::new();

/// Services and initial data used by the running program.
pub struct TuiContext {
    /// Gateway used by background commands.
    pub gateway: Arc<dyn CsvGateway>,
    /// Sink for telemetry emitted by background commands.
    pub telemetry: Arc<dyn TelemetrySink>,
    /// Directory receiving exports.
    pub export_dir: Utf8PathBuf,
    /// File list fetched before the program started.
    pub initial_files: Vec<CsvFile>,
    /// File to open on start-up.
    pub initial_file: Option<FileId>,
}

impl std::fmt::Debug for TuiContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TuiContext")
            .field("export_dir", &self.export_dir)
            .field("initial_files", &self.initial_files.len())
            .field("initial_file", &self.initial_file)
            .finish_non_exhaustive()
    }
}

/// Sets the program context.
///
/// This must be called before starting the bubbletea-rs program.
///
/// # Returns
///
/// `true` if the context was set, `false` if it was already set.
pub fn set_context(context: TuiContext) -> bool {
    CONTEXT.set(Arc::new(context)).is_ok()
}

/// Returns the stored program context, if any.
pub(crate) fn context() -> Option<Arc<TuiContext>> {
    CONTEXT.get().cloned()
}
