//! Client-side review workspace.
//!
//! The workspace tracks the active file, staged filters, the row selection,
//! and pending notices. [`state::WorkspaceState`] holds the pure transitions
//! and [`session::Workspace`] drives them against a [`crate::api::CsvGateway`].

pub mod filters;
pub mod local_files;
pub mod notice;
pub mod selection;
pub mod session;
pub mod state;

pub use filters::{FilterState, ReviewStatusFilter};
pub use notice::{Notice, NoticeLevel};
pub use selection::Selection;
pub use session::{
    Workspace, perform_export, perform_load, perform_review_update, perform_upload,
};
pub use state::{ExportRequest, LoadOutcome, LoadRequest, UploadRequest, WorkspaceState};
