//! User actions and the background commands they start.
//!
//! Service calls run through the `perform_*` helpers shared with the
//! command-line workspace. Without a program context every command resolves
//! to a configuration error so the failure still reaches the status bar.

use std::any::Any;
use std::future::Future;

use bubbletea_rs::Cmd;

use super::{InputMode, WorkspaceApp};
use crate::api::error::WorkspaceError;
use crate::api::models::ReviewStatusUpdate;
use crate::tui::messages::AppMsg;
use crate::tui::state::{FilterField, Focus, ListCursor, TextEntry, TextField};
use crate::workspace::{
    LoadOutcome, LoadRequest, perform_export, perform_load, perform_review_update,
    perform_upload,
};

/// Wraps a future producing an [`AppMsg`] as a bubbletea-rs command.
fn command<F>(future: F) -> Cmd
where
    F: Future<Output = AppMsg> + Send + 'static,
{
    Box::pin(async move { Some(Box::new(future.await) as Box<dyn Any + Send>) })
}

fn missing_context() -> WorkspaceError {
    WorkspaceError::Configuration {
        message: "terminal workspace started without a CSV service".to_owned(),
    }
}

impl WorkspaceApp {
    /// Dispatches user actions to their handlers.
    pub(super) fn handle_action_msg(&mut self, msg: &AppMsg) -> Option<Cmd> {
        match msg {
            AppMsg::Activate => self.handle_activate(),
            AppMsg::ToggleRow => {
                self.toggle_row_under_cursor();
                None
            }
            AppMsg::ToggleAllRows => {
                self.state.toggle_all_rows();
                None
            }
            AppMsg::MarkSelected { is_reviewed } => {
                let update = self.state.begin_review_update(*is_reviewed)?;
                Some(self.review_update_cmd(update))
            }
            AppMsg::Export => {
                let request = self.state.begin_export()?;
                let context = self.context.clone();
                Some(command(async move {
                    let result = match context {
                        Some(ctx) => {
                            perform_export(
                                ctx.gateway.as_ref(),
                                ctx.telemetry.as_ref(),
                                &request,
                                &ctx.export_dir,
                            )
                            .await
                        }
                        None => Err(missing_context()),
                    };
                    AppMsg::ExportFinished(result)
                }))
            }
            AppMsg::EditUploadPath => {
                let staged = self
                    .state
                    .staged_upload()
                    .map(ToString::to_string)
                    .unwrap_or_default();
                self.mode = InputMode::Editing(TextEntry::new(TextField::UploadPath, staged));
                None
            }
            AppMsg::RefreshFiles => Some(self.files_cmd()),
            _ => {
                debug_assert!(false, "non-action message routed to handle_action_msg");
                None
            }
        }
    }

    /// Dispatches command results into the workspace state.
    pub(super) fn handle_result_msg(&mut self, msg: AppMsg) -> Option<Cmd> {
        match msg {
            AppMsg::FilesLoaded(result) => {
                self.state.apply_file_list(result);
                self.keep_cursors_visible();
                None
            }
            AppMsg::LoadFinished(outcome) => {
                if self.state.finish_load(outcome) {
                    self.keep_cursors_visible();
                }
                None
            }
            AppMsg::UploadFinished(result) => self
                .state
                .finish_upload(result)
                .then(|| self.files_cmd()),
            AppMsg::ReviewUpdateFinished { update, result } => {
                let request = self.state.finish_review_update(&update, result);
                self.load_cmd(request)
            }
            AppMsg::ExportFinished(result) => {
                self.state.finish_export(result);
                None
            }
            _ => {
                debug_assert!(false, "non-result message routed to handle_result_msg");
                None
            }
        }
    }

    /// Opens the start-up file, if one was configured.
    pub(super) fn handle_initialized(&mut self) -> Option<Cmd> {
        let initial = self
            .context
            .as_ref()
            .and_then(|ctx| ctx.initial_file.clone())?;
        let listed_at = self
            .state
            .files()
            .iter()
            .position(|file| file.id == initial);
        if let Some(index) = listed_at {
            self.file_cursor.position = index;
        }
        self.focus = Focus::Rows;
        let request = self.state.select_file(Some(initial));
        self.row_cursor = ListCursor::default();
        self.keep_cursors_visible();
        self.load_cmd(request)
    }

    fn handle_activate(&mut self) -> Option<Cmd> {
        match self.focus {
            Focus::Files => self.open_file_under_cursor(),
            Focus::Filters => {
                self.activate_filter_field();
                None
            }
            Focus::Rows => {
                self.toggle_row_under_cursor();
                None
            }
        }
    }

    fn open_file_under_cursor(&mut self) -> Option<Cmd> {
        let file_id = self
            .state
            .files()
            .get(self.file_cursor.position)
            .map(|file| file.id.clone())?;
        let request = self.state.select_file(Some(file_id));
        self.row_cursor = ListCursor::default();
        self.filter_cursor = ListCursor::default();
        self.load_cmd(request)
    }

    fn activate_filter_field(&mut self) {
        let Some(field) = self
            .filter_fields()
            .into_iter()
            .nth(self.filter_cursor.position)
        else {
            return;
        };
        match field {
            FilterField::Search => self.begin_search_edit(),
            FilterField::ReviewStatus => self.cycle_review_filter(),
            FilterField::Column(header) => self.open_value_picker(&header),
        }
    }

    fn toggle_row_under_cursor(&mut self) {
        if self.focus != Focus::Rows {
            return;
        }
        if let Some(id) = self.row_under_cursor().map(|row| row.id.clone()) {
            self.state.toggle_row(&id);
        }
    }

    /// Starts uploading the staged file, if any.
    pub(super) fn start_upload(&mut self) -> Option<Cmd> {
        let request = self.state.begin_upload()?;
        let context = self.context.clone();
        Some(command(async move {
            let result = match context {
                Some(ctx) => perform_upload(ctx.gateway.as_ref(), &request).await,
                None => Err(missing_context()),
            };
            AppMsg::UploadFinished(result)
        }))
    }

    /// Builds the command loading `request`, if there is one.
    pub(super) fn load_cmd(&self, request: Option<LoadRequest>) -> Option<Cmd> {
        let pending = request?;
        let context = self.context.clone();
        Some(command(async move {
            let outcome = match context {
                Some(ctx) => {
                    perform_load(ctx.gateway.as_ref(), ctx.telemetry.as_ref(), pending).await
                }
                None => LoadOutcome {
                    generation: pending.generation,
                    dataset: Err(missing_context()),
                    catalog: Err(missing_context()),
                },
            };
            AppMsg::LoadFinished(outcome)
        }))
    }

    fn files_cmd(&self) -> Cmd {
        let context = self.context.clone();
        command(async move {
            let result = match context {
                Some(ctx) => ctx.gateway.list_files().await,
                None => Err(missing_context()),
            };
            AppMsg::FilesLoaded(result)
        })
    }

    fn review_update_cmd(&self, update: ReviewStatusUpdate) -> Cmd {
        let context = self.context.clone();
        command(async move {
            let result = match context.as_ref() {
                Some(ctx) => {
                    perform_review_update(ctx.gateway.as_ref(), ctx.telemetry.as_ref(), &update)
                        .await
                }
                None => Err(missing_context()),
            };
            AppMsg::ReviewUpdateFinished { update, result }
        })
    }
}
