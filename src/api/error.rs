//! Error types exposed by the CSV review client.

use thiserror::Error;

/// Errors surfaced while validating input or talking to the CSV service.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum WorkspaceError {
    /// An unsupported CLI argument or value was supplied.
    #[error("unrecognised argument: {argument}")]
    InvalidArgument {
        /// The flag or value that the CLI does not accept.
        argument: String,
    },

    /// The configured API base URL could not be parsed.
    #[error("API base URL is invalid: {0}")]
    InvalidUrl(String),

    /// The operation needs a CSV file id and none was configured.
    #[error("CSV file id is required (use --file-id or -f)")]
    MissingFileId,

    /// No CSV file is active in the workspace.
    #[error("Please select a CSV file first")]
    NoFileSelected,

    /// A bulk review update was requested with an empty selection.
    #[error("Please select rows to mark as reviewed")]
    NoRowsSelected,

    /// Another upload is still in flight.
    #[error("an upload is already in progress")]
    UploadInProgress,

    /// The service answered with a failure status or an unreadable body.
    #[error("CSV service error: {message}")]
    Api {
        /// Operation, status, and response detail.
        message: String,
    },

    /// Networking failed while calling the service.
    #[error("network error talking to the CSV service: {message}")]
    Network {
        /// Transport-level error detail.
        message: String,
    },

    /// Local I/O operation failed.
    #[error("I/O error: {message}")]
    Io {
        /// Error detail from the underlying I/O operation.
        message: String,
    },

    /// Configuration could not be loaded.
    #[error("configuration error: {message}")]
    Configuration {
        /// Details about the configuration failure.
        message: String,
    },
}

impl WorkspaceError {
    /// Returns true for client-side precondition failures.
    ///
    /// These are raised before any request is sent and are reported to the
    /// user as warnings rather than logged as failures.
    #[must_use]
    pub const fn is_precondition(&self) -> bool {
        matches!(
            self,
            Self::NoFileSelected | Self::NoRowsSelected | Self::UploadInProgress
        )
    }
}
