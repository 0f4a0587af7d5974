//! Application configuration loaded from CLI, environment, and files.
//!
//! Values are merged with ortho-config's layered approach.
//!
//! # Precedence
//!
//! Configuration values are loaded with the following precedence (lowest to
//! highest):
//!
//! 1. **Defaults** – Built-in application defaults
//! 2. **Configuration file** – `.torchmap.toml` in current directory, home
//!    directory, or XDG config directory
//! 3. **Environment variables** – `TORCHMAP_API_URL`, `TORCHMAP_FILE_ID`, and
//!    so on, or the legacy `BACKEND_URL`
//! 4. **Command-line arguments** – `--api-url`/`-a`, `--file-id`/`-f`, ...
//!
//! # Configuration File
//!
//! ```toml
//! api_url = "https://review.example.org/api"
//! file_id = "42"
//! reviewed = "pending"
//! column_filters = '{"Status": "Active"}'
//! export_dir = "exports"
//! request_timeout_seconds = 10
//! ```

use std::collections::BTreeMap;
use std::env;
use std::time::Duration;

use camino::Utf8PathBuf;
use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

use crate::api::endpoint::ApiBase;
use crate::api::error::WorkspaceError;
use crate::api::models::{FileId, RowId};
use crate::logging::DEFAULT_LOG_LEVEL;
use crate::workspace::filters::ReviewStatusFilter;

/// Default service location when nothing else is configured.
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000/api";

/// Legacy variable naming the backend origin without the `/api` suffix.
pub const LEGACY_BACKEND_URL_VAR: &str = "BACKEND_URL";

const DEFAULT_REQUEST_TIMEOUT_SECONDS: u64 = 30;

/// Operation mode determined by configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationMode {
    /// Interactive terminal workspace.
    Tui,
    /// Upload a CSV file and print the receipt.
    Upload,
    /// Apply a review flag to the listed rows.
    MarkReviewed,
    /// Save the reviewed rows of a file.
    Export,
    /// Print a file's rows under the configured filters.
    ShowDataset,
    /// Print the uploaded files.
    ListFiles,
}

/// Target of a bulk review update requested on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkTarget {
    /// Mark the rows as reviewed.
    Reviewed,
    /// Mark the rows as not reviewed.
    Unreviewed,
}

impl MarkTarget {
    /// The `is_reviewed` value sent to the service.
    #[must_use]
    pub const fn is_reviewed(self) -> bool {
        matches!(self, Self::Reviewed)
    }
}

/// Application configuration supporting CLI, environment, and file sources.
///
/// # Environment Variables
///
/// - `TORCHMAP_API_URL`, `BACKEND_URL` (legacy), or `--api-url`: service base
/// - `TORCHMAP_FILE_ID` or `--file-id`: active file
/// - `TORCHMAP_SEARCH` or `--search`: free-text search
/// - `TORCHMAP_REVIEWED` or `--reviewed`: `all`, `reviewed`, or `pending`
///
/// # Example
///
/// ```no_run
/// use ortho_config::OrthoConfig;
/// use torchmap::TorchmapConfig;
///
/// let config = TorchmapConfig::load().expect("failed to load configuration");
/// let base = config.api_base().expect("API URL should be valid");
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, OrthoConfig)]
#[serde(default)]
#[ortho_config(
    prefix = "TORCHMAP",
    discovery(
        dotfile_name = ".torchmap.toml",
        config_file_name = "torchmap.toml",
        app_name = "torchmap"
    )
)]
pub struct TorchmapConfig {
    /// Base URL of the CSV service, including the `/api` prefix.
    ///
    /// Can be provided via:
    /// - CLI: `--api-url <URL>` or `-a <URL>`
    /// - Environment: `TORCHMAP_API_URL`, or `BACKEND_URL` (legacy, origin only)
    /// - Config file: `api_url = "..."`
    #[ortho_config(cli_short = 'a')]
    pub api_url: Option<String>,

    /// Identifier of the file to show, mark, or export.
    #[ortho_config(cli_short = 'f')]
    pub file_id: Option<String>,

    /// Path of a local CSV file to upload.
    #[ortho_config(cli_short = 'u')]
    pub upload: Option<String>,

    /// Free-text search term.
    #[ortho_config(cli_short = 's')]
    pub search: Option<String>,

    /// Review filter: `all`, `reviewed`, or `pending`.
    #[ortho_config()]
    pub reviewed: Option<String>,

    /// Column filters as a JSON object mapping header to exact value.
    #[ortho_config()]
    pub column_filters: Option<String>,

    /// Review flag to apply to `rows`: `reviewed` or `unreviewed`.
    #[ortho_config()]
    pub mark: Option<String>,

    /// Comma-separated row identifiers for `mark`.
    #[ortho_config()]
    pub rows: Option<String>,

    /// Exports the reviewed rows of `file_id`.
    ///
    /// Note: as with every boolean flag, `TORCHMAP_EXPORT` is not read from
    /// the environment.
    #[ortho_config(cli_short = 'e')]
    pub export: bool,

    /// Directory receiving exports. Defaults to the working directory.
    #[ortho_config()]
    pub export_dir: Option<String>,

    /// Launches the interactive terminal workspace.
    #[ortho_config(cli_short = 'T')]
    pub tui: bool,

    /// HTTP request timeout, in seconds.
    #[ortho_config()]
    pub request_timeout_seconds: u64,

    /// Log filter used when `RUST_LOG` is unset.
    #[ortho_config()]
    pub log_level: Option<String>,

    /// Writes telemetry events to stderr as JSON lines.
    #[ortho_config()]
    pub telemetry: bool,
}

impl Default for TorchmapConfig {
    fn default() -> Self {
        Self {
            api_url: None,
            file_id: None,
            upload: None,
            search: None,
            reviewed: None,
            column_filters: None,
            mark: None,
            rows: None,
            export: false,
            export_dir: None,
            tui: false,
            request_timeout_seconds: DEFAULT_REQUEST_TIMEOUT_SECONDS,
            log_level: None,
            telemetry: false,
        }
    }
}

impl TorchmapConfig {
    /// Resolves the service base URL.
    ///
    /// Falls back to the legacy `BACKEND_URL` origin with `/api` appended,
    /// then to [`DEFAULT_API_URL`].
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceError::InvalidUrl`] when the resolved URL is not an
    /// absolute http(s) URL.
    pub fn api_base(&self) -> Result<ApiBase, WorkspaceError> {
        let raw = self
            .api_url
            .clone()
            .or_else(|| {
                env::var(LEGACY_BACKEND_URL_VAR)
                    .ok()
                    .filter(|origin| !origin.trim().is_empty())
                    .map(|origin| format!("{}/api", origin.trim_end_matches('/')))
            })
            .unwrap_or_else(|| DEFAULT_API_URL.to_owned());
        ApiBase::parse(&raw)
    }

    /// Returns the configured file id.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceError::MissingFileId`] when none is configured.
    pub fn require_file_id(&self) -> Result<FileId, WorkspaceError> {
        self.file_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(FileId::new)
            .ok_or(WorkspaceError::MissingFileId)
    }

    /// Path of the file to upload, if any.
    #[must_use]
    pub fn upload_path(&self) -> Option<Utf8PathBuf> {
        self.upload
            .as_deref()
            .filter(|path| !path.is_empty())
            .map(Utf8PathBuf::from)
    }

    /// Parses the review filter.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceError::InvalidArgument`] for unknown values.
    pub fn review_filter(&self) -> Result<ReviewStatusFilter, WorkspaceError> {
        self.reviewed
            .as_deref()
            .map_or(Ok(ReviewStatusFilter::All), str::parse)
    }

    /// Parses the column filters JSON object.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceError::InvalidArgument`] when the value is not a
    /// JSON object of string values.
    pub fn column_filter_map(&self) -> Result<BTreeMap<String, String>, WorkspaceError> {
        let Some(raw) = self
            .column_filters
            .as_deref()
            .filter(|raw| !raw.trim().is_empty())
        else {
            return Ok(BTreeMap::new());
        };
        serde_json::from_str(raw).map_err(|error| WorkspaceError::InvalidArgument {
            argument: format!("column_filters must be a JSON object of strings: {error}"),
        })
    }

    /// Parses the requested review flag.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceError::InvalidArgument`] for values other than
    /// `reviewed` and `unreviewed`.
    pub fn mark_target(&self) -> Result<Option<MarkTarget>, WorkspaceError> {
        match self.mark.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(value) if value.eq_ignore_ascii_case("reviewed") => Ok(Some(MarkTarget::Reviewed)),
            Some(value) if value.eq_ignore_ascii_case("unreviewed") => {
                Ok(Some(MarkTarget::Unreviewed))
            }
            Some(value) => Err(WorkspaceError::InvalidArgument {
                argument: format!("mark={value}"),
            }),
        }
    }

    /// Splits `rows` into row ids, skipping blanks.
    #[must_use]
    pub fn row_ids(&self) -> Vec<RowId> {
        self.rows
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(RowId::new)
            .collect()
    }

    /// Directory exports are written to.
    #[must_use]
    pub fn export_dir(&self) -> Utf8PathBuf {
        self.export_dir
            .as_deref()
            .filter(|dir| !dir.is_empty())
            .map_or_else(|| Utf8PathBuf::from("."), Utf8PathBuf::from)
    }

    /// HTTP request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceError::InvalidArgument`] for a zero timeout, which
    /// would fail every request before it is sent.
    pub fn request_timeout(&self) -> Result<Duration, WorkspaceError> {
        match self.request_timeout_seconds {
            0 => Err(WorkspaceError::InvalidArgument {
                argument: "request_timeout_seconds must be at least 1".to_owned(),
            }),
            seconds => Ok(Duration::from_secs(seconds)),
        }
    }

    /// Log filter used when `RUST_LOG` is unset.
    #[must_use]
    pub fn log_level(&self) -> &str {
        self.log_level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL)
    }

    /// Determines the operation mode.
    ///
    /// The interactive workspace wins, then upload, mark, export, showing a
    /// single file, and finally listing files.
    #[must_use]
    pub const fn operation_mode(&self) -> OperationMode {
        if self.tui {
            OperationMode::Tui
        } else if self.upload.is_some() {
            OperationMode::Upload
        } else if self.mark.is_some() {
            OperationMode::MarkReviewed
        } else if self.export {
            OperationMode::Export
        } else if self.file_id.is_some() {
            OperationMode::ShowDataset
        } else {
            OperationMode::ListFiles
        }
    }
}

#[cfg(test)]
mod tests;
