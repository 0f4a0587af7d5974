//! Endpoint resolution for the CSV service API.

use url::Url;

use super::error::WorkspaceError;
use super::models::FileId;

/// Validated base URL of the CSV service (e.g. `https://host/api`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiBase(Url);

impl ApiBase {
    /// Parses and validates an API base URL.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceError::InvalidUrl`] when the value is not an
    /// absolute `http` or `https` URL.
    pub fn parse(raw: &str) -> Result<Self, WorkspaceError> {
        let url = Url::parse(raw.trim())
            .map_err(|error| WorkspaceError::InvalidUrl(format!("{raw}: {error}")))?;

        if !matches!(url.scheme(), "http" | "https") || url.cannot_be_a_base() {
            return Err(WorkspaceError::InvalidUrl(format!(
                "{raw}: expected an http or https URL"
            )));
        }

        Ok(Self(url))
    }

    /// Returns the base URL as a string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// `GET /csv-files`
    #[must_use]
    pub fn csv_files(&self) -> Url {
        self.endpoint(&["csv-files"])
    }

    /// `POST /upload-csv`
    #[must_use]
    pub fn upload_csv(&self) -> Url {
        self.endpoint(&["upload-csv"])
    }

    /// `GET /csv-data/{id}`
    #[must_use]
    pub fn csv_data(&self, file_id: &FileId) -> Url {
        self.endpoint(&["csv-data", file_id.as_str()])
    }

    /// `GET /csv-columns/{id}`
    #[must_use]
    pub fn csv_columns(&self, file_id: &FileId) -> Url {
        self.endpoint(&["csv-columns", file_id.as_str()])
    }

    /// `POST /update-review-status`
    #[must_use]
    pub fn update_review_status(&self) -> Url {
        self.endpoint(&["update-review-status"])
    }

    /// `GET /export-reviewed/{id}`
    #[must_use]
    pub fn export_reviewed(&self, file_id: &FileId) -> Url {
        self.endpoint(&["export-reviewed", file_id.as_str()])
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.0.clone();
        url.set_query(None);
        url.set_fragment(None);
        // Validated in `parse`: http(s) URLs always have a path to extend.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }
}
