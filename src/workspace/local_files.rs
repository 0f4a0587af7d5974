//! Local filesystem access for uploads and exports.
//!
//! All access goes through `cap_std` directory handles opened from the
//! ambient root or working directory, mirroring how the rest of the crate
//! avoids raw `std::fs` paths.

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;

use crate::api::error::WorkspaceError;
use crate::api::models::{ExportPayload, UploadPayload};

/// Reads the file at `path` into an upload payload.
///
/// # Errors
///
/// Returns [`WorkspaceError::Io`] when the path has no file name or the file
/// cannot be read.
pub fn read_upload(path: &Utf8Path) -> Result<UploadPayload, WorkspaceError> {
    let file_name = path.file_name().ok_or_else(|| WorkspaceError::Io {
        message: format!("invalid upload path '{path}': no file name"),
    })?;
    let parent = path.parent().unwrap_or_else(|| Utf8Path::new("."));
    let dir = open_dir(parent, false)?;

    let contents = dir.read(file_name).map_err(|error| WorkspaceError::Io {
        message: format!("failed to read upload file '{path}': {error}"),
    })?;

    Ok(UploadPayload {
        file_name: file_name.to_owned(),
        contents,
    })
}

/// Writes an export payload into `directory`, creating it when missing.
///
/// Path separators in the payload's file name are replaced so the export
/// always lands directly inside `directory`. Returns the written path.
///
/// # Errors
///
/// Returns [`WorkspaceError::Io`] when the directory cannot be created or the
/// file cannot be written.
pub fn save_export(
    directory: &Utf8Path,
    payload: &ExportPayload,
) -> Result<Utf8PathBuf, WorkspaceError> {
    let file_name = sanitize_file_name(&payload.file_name);
    let dir = open_dir(directory, true)?;

    dir.write(&file_name, &payload.contents)
        .map_err(|error| WorkspaceError::Io {
            message: format!("failed to write export '{file_name}' in '{directory}': {error}"),
        })?;

    Ok(directory.join(file_name))
}

fn sanitize_file_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|ch| if matches!(ch, '/' | '\\') { '_' } else { ch })
        .collect();
    match cleaned.as_str() {
        "" | "." | ".." => "reviewed_export.csv".to_owned(),
        _ => cleaned,
    }
}

/// Opens `path` as a capability directory, optionally creating it first.
fn open_dir(path: &Utf8Path, create: bool) -> Result<Dir, WorkspaceError> {
    let (base, relative) = if path.is_absolute() {
        let relative = path.strip_prefix("/").map_err(|_| WorkspaceError::Io {
            message: format!("failed to normalise directory '{path}'"),
        })?;
        (open_ambient("/")?, relative)
    } else {
        (open_ambient(".")?, path)
    };

    if relative.as_str().is_empty() || relative == Utf8Path::new(".") {
        return Ok(base);
    }

    if create {
        base.create_dir_all(relative)
            .map_err(|error| WorkspaceError::Io {
                message: format!("failed to create directory '{path}': {error}"),
            })?;
    }

    base.open_dir(relative).map_err(|error| WorkspaceError::Io {
        message: format!("failed to open directory '{path}': {error}"),
    })
}

fn open_ambient(root: &str) -> Result<Dir, WorkspaceError> {
    Dir::open_ambient_dir(root, ambient_authority()).map_err(|error| WorkspaceError::Io {
        message: format!("failed to open directory '{root}': {error}"),
    })
}
