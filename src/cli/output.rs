//! Output formatting utilities for CLI operations.

use std::io::{self, Write};

use camino::Utf8Path;
use torchmap::WorkspaceError;
use torchmap::api::models::{CsvDataset, CsvFile, UploadReceipt};
use torchmap::config::MarkTarget;
use torchmap::workspace::FilterState;

/// Writes the uploaded files, one per line.
pub fn write_file_listing<W: Write>(
    writer: &mut W,
    files: &[CsvFile],
) -> Result<(), WorkspaceError> {
    if files.is_empty() {
        return writeln!(writer, "No CSV files uploaded yet.").map_err(|e| io_error(&e));
    }

    writeln!(writer, "Uploaded CSV files:").map_err(|e| io_error(&e))?;
    writeln!(writer).map_err(|e| io_error(&e))?;
    for file in files {
        writeln!(
            writer,
            "  {}  {} ({} rows, {} columns)",
            file.id,
            file.filename,
            file.row_count,
            file.column_count()
        )
        .map_err(|e| io_error(&e))?;
    }
    Ok(())
}

/// Writes a dataset summary followed by its rows as tab-separated values.
///
/// The first two columns are the row id and its review flag; the rest follow
/// the file's header order.
pub fn write_dataset<W: Write>(
    writer: &mut W,
    dataset: &CsvDataset,
    filters: &FilterState,
) -> Result<(), WorkspaceError> {
    writeln!(
        writer,
        "{}: {} rows ({} reviewed, {} pending)",
        dataset.csv_file.filename,
        dataset.rows.len(),
        dataset.reviewed_count(),
        dataset.pending_count()
    )
    .map_err(|e| io_error(&e))?;
    if filters.has_active_filters() {
        writeln!(writer, "Filters: {}", describe_filters(filters)).map_err(|e| io_error(&e))?;
    }
    writeln!(writer).map_err(|e| io_error(&e))?;

    let mut header = vec!["id".to_owned(), "reviewed".to_owned()];
    header.extend(dataset.csv_file.headers.iter().map(|name| sanitise_cell(name)));
    writeln!(writer, "{}", header.join("\t")).map_err(|e| io_error(&e))?;

    for row in &dataset.rows {
        let mut cells = vec![
            sanitise_cell(row.id.as_str()),
            if row.is_reviewed { "yes" } else { "no" }.to_owned(),
        ];
        cells.extend(
            dataset
                .csv_file
                .headers
                .iter()
                .map(|name| sanitise_cell(row.cell(name).unwrap_or_default())),
        );
        writeln!(writer, "{}", cells.join("\t")).map_err(|e| io_error(&e))?;
    }
    Ok(())
}

/// Writes the acknowledgement of a finished upload.
pub fn write_upload_receipt<W: Write>(
    writer: &mut W,
    path: &Utf8Path,
    receipt: &UploadReceipt,
) -> Result<(), WorkspaceError> {
    writeln!(writer, "Uploaded {path}: {} rows imported", receipt.row_count)
        .map_err(|e| io_error(&e))
}

/// Writes the result of a bulk review update.
///
/// `matched` counts the requested ids that exist in the file.
pub fn write_review_update<W: Write>(
    writer: &mut W,
    matched: usize,
    requested: usize,
    target: MarkTarget,
) -> Result<(), WorkspaceError> {
    let label = if target.is_reviewed() {
        "reviewed"
    } else {
        "unreviewed"
    };
    writeln!(writer, "Marked {matched} of {requested} rows as {label}")
        .map_err(|e| io_error(&e))?;
    if matched < requested {
        writeln!(
            writer,
            "{} row ids did not match a row of this file",
            requested.saturating_sub(matched)
        )
        .map_err(|e| io_error(&e))?;
    }
    Ok(())
}

/// Writes where an export was saved.
pub fn write_export_path<W: Write>(
    writer: &mut W,
    path: &Utf8Path,
) -> Result<(), WorkspaceError> {
    writeln!(writer, "Exported reviewed rows to {path}").map_err(|e| io_error(&e))
}

fn describe_filters(filters: &FilterState) -> String {
    let mut parts = Vec::new();
    if !filters.search_term().is_empty() {
        parts.push(format!("search \"{}\"", filters.search_term()));
    }
    if let Some(flag) = filters.review_status().as_flag() {
        parts.push(if flag { "reviewed only" } else { "pending only" }.to_owned());
    }
    parts.extend(
        filters
            .column_filters()
            .iter()
            .map(|(header, value)| format!("{header} = {value}")),
    );
    parts.join(", ")
}

/// Keeps one row per line by flattening tabs and line breaks.
fn sanitise_cell(value: &str) -> String {
    value.replace(['\t', '\n', '\r'], " ")
}

fn io_error(error: &io::Error) -> WorkspaceError {
    WorkspaceError::Io {
        message: error.to_string(),
    }
}
