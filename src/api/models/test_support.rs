//! Test helpers for constructing CSV model fixtures.
//!
//! # Examples
//!
//! ```
//! use torchmap::api::models::test_support::{dataset_with_rows, sample_file};
//!
//! let file = sample_file("f-1", "sites.csv");
//! let dataset = dataset_with_rows(&file, 3);
//! assert_eq!(dataset.rows.len(), 3);
//! ```

use std::collections::BTreeMap;

use super::{CsvDataset, CsvFile, CsvRow, FileId, RowId};

/// Headers used by every fixture file.
pub const SAMPLE_HEADERS: [&str; 2] = ["Site", "Status"];

/// Builds a file summary with the sample headers and no rows counted.
#[must_use]
pub fn sample_file(id: &str, filename: &str) -> CsvFile {
    CsvFile {
        id: FileId::new(id),
        filename: filename.to_owned(),
        headers: SAMPLE_HEADERS.iter().map(|&header| header.to_owned()).collect(),
        row_count: 0,
    }
}

/// Builds a row with the given status; the site is derived from the id.
#[must_use]
pub fn row_with_status(id: &str, status: &str, is_reviewed: bool) -> CsvRow {
    let row_data = BTreeMap::from([
        ("Site".to_owned(), format!("site-{id}")),
        ("Status".to_owned(), status.to_owned()),
    ]);
    CsvRow {
        id: RowId::new(id),
        row_data,
        is_reviewed,
    }
}

/// Builds `count` pending rows with ids `r-1..=r-count`.
#[must_use]
pub fn sample_rows(count: usize) -> Vec<CsvRow> {
    (1..=count)
        .map(|index| row_with_status(&format!("r-{index}"), "Active", false))
        .collect()
}

/// Builds a dataset for `file` holding `count` pending rows.
#[must_use]
pub fn dataset_with_rows(file: &CsvFile, count: usize) -> CsvDataset {
    let rows = sample_rows(count);
    CsvDataset {
        csv_file: CsvFile {
            row_count: rows.len() as u64,
            ..file.clone()
        },
        rows,
    }
}
