//! Query composition for dataset requests.
//!
//! A [`DatasetQuery`] is the committed filter set for one load. Each
//! constraint is optional; absent constraints are omitted from the request
//! entirely, so an empty query asks for every row of the file.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

/// Query parameter carrying the review-status constraint.
pub const REVIEWED_ONLY_PARAM: &str = "reviewed_only";
/// Query parameter carrying the free-text search term.
pub const SEARCH_TERM_PARAM: &str = "search_term";
/// Query parameter carrying the JSON-encoded column filters.
pub const COLUMN_FILTERS_PARAM: &str = "column_filters";

/// Filters sent with a dataset request. All constraints combine with AND.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DatasetQuery {
    /// Review-status equality constraint.
    pub reviewed_only: Option<bool>,
    /// Substring search across all columns.
    pub search_term: Option<String>,
    /// Exact-match constraints keyed by header name.
    pub column_filters: BTreeMap<String, String>,
}

impl DatasetQuery {
    /// Returns true when the query imposes no constraint.
    #[must_use]
    pub fn is_unconstrained(&self) -> bool {
        self.reviewed_only.is_none()
            && self.search_term.is_none()
            && self.column_filters.is_empty()
    }

    /// Renders the query as URL parameters.
    ///
    /// The review flag is sent as the literal `"true"`/`"false"`, the search
    /// term only when non-empty, and column filters as one JSON object.
    #[must_use]
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::with_capacity(3);

        if let Some(reviewed) = self.reviewed_only {
            pairs.push((REVIEWED_ONLY_PARAM, reviewed.to_string()));
        }

        if let Some(term) = self.search_term.as_deref().filter(|term| !term.is_empty()) {
            pairs.push((SEARCH_TERM_PARAM, term.to_owned()));
        }

        if !self.column_filters.is_empty() {
            pairs.push((COLUMN_FILTERS_PARAM, self.column_filters_json()));
        }

        pairs
    }

    fn column_filters_json(&self) -> String {
        let object: Map<String, Value> = self
            .column_filters
            .iter()
            .map(|(header, value)| (header.clone(), Value::String(value.clone())))
            .collect();
        Value::Object(object).to_string()
    }
}
