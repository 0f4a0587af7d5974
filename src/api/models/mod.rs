//! Data models for uploaded CSV files, their rows, and the value catalog.
//!
//! The service is the source of truth for every entity here. The client only
//! holds transient copies that are replaced wholesale on each response.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

/// Identifier text as sent by the service.
///
/// Services backed by SQL tables often send integer ids. The text form is
/// what the client compares and displays; the numeric flag only controls
/// how the id is written back.
#[derive(Debug, Clone)]
struct WireId {
    text: String,
    numeric: bool,
}

impl WireId {
    const fn text(text: String) -> Self {
        Self {
            text,
            numeric: false,
        }
    }
}

impl PartialEq for WireId {
    fn eq(&self, other: &Self) -> bool {
        self.text == other.text
    }
}

impl Eq for WireId {}

impl PartialOrd for WireId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for WireId {
    fn cmp(&self, other: &Self) -> Ordering {
        self.text.cmp(&other.text)
    }
}

impl Hash for WireId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.text.hash(state);
    }
}

impl Serialize for WireId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.numeric {
            if let Ok(unsigned) = self.text.parse::<u64>() {
                return serializer.serialize_u64(unsigned);
            }
            if let Ok(signed) = self.text.parse::<i64>() {
                return serializer.serialize_i64(signed);
            }
        }
        serializer.serialize_str(&self.text)
    }
}

impl<'de> Deserialize<'de> for WireId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(WireIdVisitor)
    }
}

struct WireIdVisitor;

impl Visitor<'_> for WireIdVisitor {
    type Value = WireId;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("a string or integer identifier")
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
        Ok(WireId::text(value.to_owned()))
    }

    fn visit_string<E: de::Error>(self, value: String) -> Result<Self::Value, E> {
        Ok(WireId::text(value))
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<Self::Value, E> {
        Ok(WireId {
            text: value.to_string(),
            numeric: true,
        })
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<Self::Value, E> {
        Ok(WireId {
            text: value.to_string(),
            numeric: true,
        })
    }
}

/// Identifier of an uploaded CSV file.
///
/// The service may send ids as strings or integers; both decode, compare by
/// their text, and are written back in the form they arrived in.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileId(WireId);

impl FileId {
    /// Wraps a raw file identifier.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(WireId::text(value.into()))
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.text.as_str()
    }
}

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifier of a single row within an uploaded CSV file.
///
/// Decodes from a string or an integer like [`FileId`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RowId(WireId);

impl RowId {
    /// Wraps a raw row identifier.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(WireId::text(value.into()))
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.text.as_str()
    }
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Summary of an uploaded CSV file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CsvFile {
    /// File identifier.
    pub id: FileId,
    /// Original file name supplied at upload time.
    pub filename: String,
    /// Column headers in file order.
    #[serde(default)]
    pub headers: Vec<String>,
    /// Number of data rows imported.
    #[serde(default)]
    pub row_count: u64,
}

impl CsvFile {
    /// Number of columns declared by the file.
    #[must_use]
    pub const fn column_count(&self) -> usize {
        self.headers.len()
    }
}

/// One data record of a CSV file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CsvRow {
    /// Row identifier.
    pub id: RowId,
    /// Cell values keyed by header name.
    #[serde(default)]
    pub row_data: BTreeMap<String, String>,
    /// Whether a human has validated this row.
    #[serde(default)]
    pub is_reviewed: bool,
}

impl CsvRow {
    /// Returns the cell value for `header`, if the row has one.
    #[must_use]
    pub fn cell(&self, header: &str) -> Option<&str> {
        self.row_data.get(header).map(String::as_str)
    }
}

/// A file together with the rows that matched the last query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CsvDataset {
    /// The file the rows belong to.
    pub csv_file: CsvFile,
    /// Matching rows in service order.
    #[serde(default)]
    pub rows: Vec<CsvRow>,
}

impl CsvDataset {
    /// Identifiers of every loaded row, in display order.
    pub fn row_ids(&self) -> impl Iterator<Item = &RowId> {
        self.rows.iter().map(|row| &row.id)
    }

    /// Returns true when a row with `id` is present in this dataset.
    #[must_use]
    pub fn contains_row(&self, id: &RowId) -> bool {
        self.rows.iter().any(|row| &row.id == id)
    }

    /// Number of loaded rows flagged as reviewed.
    #[must_use]
    pub fn reviewed_count(&self) -> usize {
        self.rows.iter().filter(|row| row.is_reviewed).count()
    }

    /// Number of loaded rows still awaiting review.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.rows.len().saturating_sub(self.reviewed_count())
    }
}

/// Distinct observed values per column, used to offer column filters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColumnCatalog(BTreeMap<String, Vec<String>>);

impl ColumnCatalog {
    /// Creates a catalog from header/value pairs.
    #[must_use]
    pub const fn new(columns: BTreeMap<String, Vec<String>>) -> Self {
        Self(columns)
    }

    /// Distinct values observed for `header`; empty when unknown.
    #[must_use]
    pub fn values(&self, header: &str) -> &[String] {
        self.0.get(header).map_or(&[], Vec::as_slice)
    }

    /// Column names present in the catalog, sorted.
    pub fn headers(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Returns true when no column has any values.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.values().all(Vec::is_empty)
    }
}

/// Acknowledgement returned after a successful upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadReceipt {
    /// Number of rows imported from the uploaded file.
    pub row_count: u64,
}

/// Body of a bulk review-status update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewStatusUpdate {
    /// Rows to update.
    pub row_ids: Vec<RowId>,
    /// Target review flag.
    pub is_reviewed: bool,
}

/// A local file read into memory, ready to be sent as multipart form data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadPayload {
    /// File name reported to the service.
    pub file_name: String,
    /// Raw file contents.
    pub contents: Vec<u8>,
}

/// Raw bytes of an export together with the name they should be saved under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportPayload {
    /// File the export was produced from.
    pub file_id: FileId,
    /// Local file name, `reviewed_<original filename>`.
    pub file_name: String,
    /// CSV bytes returned by the service.
    pub contents: Vec<u8>,
}

/// Derives the local file name used when saving an export.
#[must_use]
pub fn export_file_name(original: &str) -> String {
    format!("reviewed_{original}")
}
