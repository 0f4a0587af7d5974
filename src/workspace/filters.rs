//! Staged filter state for dataset loads.
//!
//! Filters are edited locally and only take effect when the workspace
//! commits them into a [`DatasetQuery`] for the next load. Editing a value
//! never issues a request by itself.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::api::error::WorkspaceError;
use crate::api::query::DatasetQuery;

/// Tri-state review filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReviewStatusFilter {
    /// No constraint on the review flag.
    #[default]
    All,
    /// Only rows flagged as reviewed.
    Reviewed,
    /// Only rows still awaiting review.
    Pending,
}

impl ReviewStatusFilter {
    /// Returns a human-readable label for display in the UI.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::All => "All rows",
            Self::Reviewed => "Reviewed",
            Self::Pending => "Pending",
        }
    }

    /// The `reviewed_only` value sent to the service, if any.
    #[must_use]
    pub const fn as_flag(self) -> Option<bool> {
        match self {
            Self::All => None,
            Self::Reviewed => Some(true),
            Self::Pending => Some(false),
        }
    }

    /// Builds a filter from an optional review flag.
    #[must_use]
    pub const fn from_flag(flag: Option<bool>) -> Self {
        match flag {
            None => Self::All,
            Some(true) => Self::Reviewed,
            Some(false) => Self::Pending,
        }
    }

    /// Returns the next filter in the cycle `All -> Reviewed -> Pending`.
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::All => Self::Reviewed,
            Self::Reviewed => Self::Pending,
            Self::Pending => Self::All,
        }
    }
}

impl fmt::Display for ReviewStatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ReviewStatusFilter {
    type Err = WorkspaceError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "" | "all" => Ok(Self::All),
            "reviewed" | "true" => Ok(Self::Reviewed),
            "pending" | "unreviewed" | "false" => Ok(Self::Pending),
            other => Err(WorkspaceError::InvalidArgument {
                argument: format!("review filter '{other}' (expected all, reviewed, or pending)"),
            }),
        }
    }
}

/// Search term, review filter, and per-column value filters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    search_term: String,
    review_status: ReviewStatusFilter,
    column_filters: BTreeMap<String, String>,
}

impl FilterState {
    /// Creates an empty filter state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current free-text search term.
    #[must_use]
    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    /// Current review filter.
    #[must_use]
    pub const fn review_status(&self) -> ReviewStatusFilter {
        self.review_status
    }

    /// Staged column filters keyed by header.
    #[must_use]
    pub const fn column_filters(&self) -> &BTreeMap<String, String> {
        &self.column_filters
    }

    /// Staged value for `header`, if one is set.
    #[must_use]
    pub fn column_filter(&self, header: &str) -> Option<&str> {
        self.column_filters.get(header).map(String::as_str)
    }

    /// Replaces the search term.
    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.search_term = term.into();
    }

    /// Replaces the review filter.
    pub const fn set_review_status(&mut self, status: ReviewStatusFilter) {
        self.review_status = status;
    }

    /// Stages an exact-match value for `header`.
    ///
    /// An empty value stands for "All values" and removes the constraint.
    pub fn set_column_filter(&mut self, header: impl Into<String>, value: impl Into<String>) {
        let column = header.into();
        let chosen = value.into();
        if chosen.is_empty() {
            self.column_filters.remove(&column);
        } else {
            self.column_filters.insert(column, chosen);
        }
    }

    /// Clears only the per-column filters.
    pub fn clear_column_filters(&mut self) {
        self.column_filters.clear();
    }

    /// Clears the search term, review filter, and column filters.
    pub fn clear_all(&mut self) {
        *self = Self::default();
    }

    /// Number of active column filters.
    #[must_use]
    pub fn column_filter_count(&self) -> usize {
        self.column_filters.len()
    }

    /// Returns true when any constraint is set.
    #[must_use]
    pub fn has_active_filters(&self) -> bool {
        !self.search_term.is_empty()
            || self.review_status != ReviewStatusFilter::All
            || !self.column_filters.is_empty()
    }

    /// Commits the staged filters into a request query.
    #[must_use]
    pub fn to_query(&self) -> DatasetQuery {
        DatasetQuery {
            reviewed_only: self.review_status.as_flag(),
            search_term: Some(self.search_term.clone()).filter(|term| !term.is_empty()),
            column_filters: self.column_filters.clone(),
        }
    }
}
