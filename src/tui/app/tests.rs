//! Tests for the workspace TUI application model.

use std::collections::BTreeMap;
use std::error::Error;
use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use bubbletea_rs::Model;
use bubbletea_rs::event::KeyMsg;
use camino::Utf8PathBuf;
use crossterm::event::{KeyCode, KeyModifiers};
use rstest::{fixture, rstest};
use unicode_width::UnicodeWidthStr;

use super::*;
use crate::api::MockCsvGateway;
use crate::api::models::test_support::{dataset_with_rows, row_with_status, sample_file};
use crate::api::models::{ColumnCatalog, CsvDataset, FileId, UploadReceipt};
use crate::telemetry::NoopTelemetrySink;
use crate::tui::messages::AppMsg;
use crate::workspace::{NoticeLevel, ReviewStatusFilter};

type TestResult = Result<(), Box<dyn Error>>;

#[fixture]
fn file() -> CsvFile {
    sample_file("f-1", "sites.csv")
}

fn context_with(gateway: MockCsvGateway, files: Vec<CsvFile>) -> Arc<TuiContext> {
    context_opening(gateway, files, None)
}

fn context_opening(
    gateway: MockCsvGateway,
    files: Vec<CsvFile>,
    initial_file: Option<FileId>,
) -> Arc<TuiContext> {
    Arc::new(TuiContext {
        gateway: Arc::new(gateway),
        telemetry: Arc::new(NoopTelemetrySink),
        export_dir: Utf8PathBuf::from("."),
        initial_files: files,
        initial_file,
    })
}

fn status_catalog() -> ColumnCatalog {
    ColumnCatalog::new(BTreeMap::from([(
        "Status".to_owned(),
        vec!["Active".to_owned(), "Closed".to_owned()],
    )]))
}

fn expect_loads(gateway: &mut MockCsvGateway, dataset: &CsvDataset, times: usize) {
    let rows = dataset.clone();
    gateway
        .expect_load_dataset()
        .times(times)
        .returning(move |_, _| Ok(rows.clone()));
    gateway
        .expect_column_catalog()
        .times(times)
        .returning(|_| Ok(status_catalog()));
}

/// Awaits a command and unwraps the application message it emits.
async fn run(cmd: Cmd) -> Result<AppMsg, Box<dyn Error>> {
    let emitted = tokio::time::timeout(Duration::from_millis(500), cmd)
        .await?
        .ok_or_else(|| io::Error::other("command should emit a message"))?;
    emitted
        .downcast::<AppMsg>()
        .map(|msg| *msg)
        .map_err(|_| io::Error::other("command should emit an AppMsg").into())
}

/// Feeds a message to the app and runs every follow-up command to
/// completion.
async fn settle(app: &mut WorkspaceApp, msg: AppMsg) -> TestResult {
    let mut pending = app.handle_message(msg);
    while let Some(cmd) = pending {
        let next = run(cmd).await?;
        pending = app.handle_message(next);
    }
    Ok(())
}

fn key(code: KeyCode) -> Box<dyn std::any::Any + Send> {
    Box::new(KeyMsg {
        key: code,
        modifiers: KeyModifiers::empty(),
    })
}

async fn open_first_file(app: &mut WorkspaceApp) -> TestResult {
    settle(app, AppMsg::Activate).await?;
    app.focus = Focus::Rows;
    Ok(())
}

#[tokio::test]
async fn init_emits_initialized_message_immediately() -> TestResult {
    let (_app, cmd) = WorkspaceApp::init();
    let startup = cmd.ok_or_else(|| io::Error::other("init should return a startup command"))?;

    let msg = run(startup).await?;

    if !matches!(msg, AppMsg::Initialized) {
        return Err(io::Error::other("startup command should emit AppMsg::Initialized").into());
    }
    Ok(())
}

#[rstest]
#[tokio::test]
async fn initialized_opens_the_configured_file(file: CsvFile) -> TestResult {
    let mut gateway = MockCsvGateway::new();
    expect_loads(&mut gateway, &dataset_with_rows(&file, 2), 1);
    let context = context_opening(gateway, vec![file.clone()], Some(file.id.clone()));
    let mut app = WorkspaceApp::with_context(context);

    settle(&mut app, AppMsg::Initialized).await?;

    assert_eq!(app.state().active_file(), Some(&file.id));
    assert_eq!(app.rows().len(), 2);
    assert_eq!(app.focus(), Focus::Rows);
    Ok(())
}

#[rstest]
fn tab_cycles_focus_and_collapse_pins_rows(file: CsvFile) {
    let mut app = WorkspaceApp::new(vec![file]);

    let _none = app.handle_message(AppMsg::CycleFocus);
    assert_eq!(app.focus(), Focus::Filters);
    let _none = app.handle_message(AppMsg::CycleFocus);
    assert_eq!(app.focus(), Focus::Rows);

    let _none = app.handle_message(AppMsg::ToggleSidebar);
    let _none = app.handle_message(AppMsg::CycleFocus);
    assert_eq!(app.focus(), Focus::Rows);
}

#[rstest]
#[tokio::test]
async fn enter_on_a_file_loads_its_rows(file: CsvFile) -> TestResult {
    let mut gateway = MockCsvGateway::new();
    expect_loads(&mut gateway, &dataset_with_rows(&file, 3), 1);
    let mut app = WorkspaceApp::with_context(context_with(gateway, vec![file.clone()]));

    open_first_file(&mut app).await?;

    assert_eq!(app.state().active_file(), Some(&file.id));
    assert!(!app.state().is_loading());
    assert!(app.view().contains("site-r-1"));
    Ok(())
}

#[rstest]
#[tokio::test]
async fn space_and_select_all_drive_the_selection(file: CsvFile) -> TestResult {
    let mut gateway = MockCsvGateway::new();
    expect_loads(&mut gateway, &dataset_with_rows(&file, 3), 1);
    let mut app = WorkspaceApp::with_context(context_with(gateway, vec![file]));
    open_first_file(&mut app).await?;

    let _none = app.handle_message(AppMsg::CursorDown);
    let _none = app.handle_message(AppMsg::ToggleRow);
    assert_eq!(app.state().selection().len(), 1);

    let _none = app.handle_message(AppMsg::ToggleAllRows);
    assert_eq!(app.state().selection().len(), 3);
    let _none = app.handle_message(AppMsg::ToggleAllRows);
    assert!(app.state().selection().is_empty());
    Ok(())
}

#[rstest]
#[tokio::test]
async fn marking_without_selection_warns_and_sends_nothing(file: CsvFile) -> TestResult {
    let mut gateway = MockCsvGateway::new();
    expect_loads(&mut gateway, &dataset_with_rows(&file, 2), 1);
    gateway.expect_update_review_status().times(0);
    let mut app = WorkspaceApp::with_context(context_with(gateway, vec![file]));
    open_first_file(&mut app).await?;

    let cmd = app.handle_message(AppMsg::MarkSelected { is_reviewed: true });

    assert!(cmd.is_none());
    let notice = app.state().latest_notice().map(|notice| notice.level);
    assert_eq!(notice, Some(NoticeLevel::Warning));
    assert!(app.view().contains("Please select rows to mark as reviewed"));
    Ok(())
}

#[rstest]
#[tokio::test]
async fn repeated_mark_waits_for_the_pending_update(file: CsvFile) -> TestResult {
    let mut gateway = MockCsvGateway::new();
    expect_loads(&mut gateway, &dataset_with_rows(&file, 2), 1);
    let mut app = WorkspaceApp::with_context(context_with(gateway, vec![file]));
    open_first_file(&mut app).await?;
    let _none = app.handle_message(AppMsg::ToggleAllRows);

    let first = app.handle_message(AppMsg::MarkSelected { is_reviewed: true });
    let second = app.handle_message(AppMsg::MarkSelected { is_reviewed: true });

    assert!(first.is_some());
    assert!(second.is_none());
    assert!(app.state().is_updating());
    assert!(app.view().contains("[Updating...]"));
    Ok(())
}

#[rstest]
#[tokio::test]
async fn marking_selected_rows_updates_then_reloads(file: CsvFile) -> TestResult {
    let pending = dataset_with_rows(&file, 2);
    let reviewed = CsvDataset {
        rows: vec![
            row_with_status("r-1", "Active", true),
            row_with_status("r-2", "Active", false),
        ],
        ..pending.clone()
    };
    let loads = AtomicUsize::new(0);
    let mut gateway = MockCsvGateway::new();
    gateway
        .expect_load_dataset()
        .times(2)
        .returning(move |_, _| {
            if loads.fetch_add(1, Ordering::SeqCst) == 0 {
                Ok(pending.clone())
            } else {
                Ok(reviewed.clone())
            }
        });
    gateway
        .expect_column_catalog()
        .times(2)
        .returning(|_| Ok(status_catalog()));
    gateway
        .expect_update_review_status()
        .withf(|update| update.is_reviewed && update.row_ids.len() == 1)
        .times(1)
        .returning(|_| Ok(()));
    let mut app = WorkspaceApp::with_context(context_with(gateway, vec![file]));
    open_first_file(&mut app).await?;
    let _none = app.handle_message(AppMsg::ToggleRow);

    settle(&mut app, AppMsg::MarkSelected { is_reviewed: true }).await?;

    assert!(app.state().selection().is_empty());
    assert_eq!(
        app.state().dataset().map(CsvDataset::reviewed_count),
        Some(1)
    );
    assert!(app.view().contains("1 rows marked as reviewed"));
    Ok(())
}

#[rstest]
#[tokio::test]
async fn column_picker_stages_a_value_until_applied(file: CsvFile) -> TestResult {
    let mut gateway = MockCsvGateway::new();
    let dataset = dataset_with_rows(&file, 1);
    gateway
        .expect_load_dataset()
        .withf(|_, query| query.is_unconstrained())
        .times(1)
        .returning({
            let initial = dataset.clone();
            move |_, _| Ok(initial.clone())
        });
    gateway
        .expect_load_dataset()
        .withf(|_, query| {
            query.column_filters.get("Status").map(String::as_str) == Some("Closed")
        })
        .times(1)
        .returning(move |_, _| Ok(dataset.clone()));
    gateway
        .expect_column_catalog()
        .times(2)
        .returning(|_| Ok(status_catalog()));
    let mut app = WorkspaceApp::with_context(context_with(gateway, vec![file]));
    open_first_file(&mut app).await?;

    let _none = app.handle_message(AppMsg::OpenColumnPicker);
    assert!(app.is_picking());
    // Headers are "Site" then "Status".
    let _none = app.handle_message(AppMsg::CursorDown);
    let _none = app.handle_message(AppMsg::InputSubmit);
    let _none = app.handle_message(AppMsg::CursorDown);
    let _none = app.handle_message(AppMsg::CursorDown);
    let staged = app.handle_message(AppMsg::InputSubmit);

    assert!(staged.is_none());
    assert!(!app.is_picking());
    assert_eq!(app.focus(), Focus::Filters);
    assert_eq!(app.state().filters().column_filter("Status"), Some("Closed"));

    settle(&mut app, AppMsg::ApplyFilters).await?;
    assert!(!app.state().is_loading());
    Ok(())
}

#[rstest]
fn picker_escape_steps_back_then_closes(file: CsvFile) {
    let mut app = WorkspaceApp::new(vec![file.clone()]);
    let _request = app.state.select_file(Some(file.id));

    let _none = app.handle_message(AppMsg::OpenColumnPicker);
    let _none = app.handle_message(AppMsg::InputSubmit);
    let _none = app.handle_message(AppMsg::InputCancel);
    assert!(app.is_picking());
    let _none = app.handle_message(AppMsg::InputCancel);
    assert!(!app.is_picking());
}

#[rstest]
fn search_edit_stages_term_and_escape_discards(file: CsvFile) {
    let mut app = WorkspaceApp::new(vec![file]);

    let _none = app.handle_message(AppMsg::EditSearch);
    for ch in "north".chars() {
        let _none = app.handle_message(AppMsg::InputChar(ch));
    }
    let _none = app.handle_message(AppMsg::InputBackspace);
    let cmd = app.handle_message(AppMsg::InputSubmit);

    assert!(cmd.is_none());
    assert_eq!(app.state().filters().search_term(), "nort");

    let _none = app.handle_message(AppMsg::EditSearch);
    let _none = app.handle_message(AppMsg::InputChar('x'));
    let _none = app.handle_message(AppMsg::InputCancel);
    assert_eq!(app.state().filters().search_term(), "nort");
    assert!(!app.is_editing());
}

#[rstest]
fn search_term_keeps_surrounding_spaces(file: CsvFile) {
    let mut app = WorkspaceApp::new(vec![file]);

    let _none = app.handle_message(AppMsg::EditSearch);
    for ch in " depot ".chars() {
        let _none = app.handle_message(AppMsg::InputChar(ch));
    }
    let _none = app.handle_message(AppMsg::InputSubmit);

    assert_eq!(app.state().filters().search_term(), " depot ");
    assert_eq!(
        app.state().filters().to_query().search_term.as_deref(),
        Some(" depot ")
    );
}

#[rstest]
fn review_filter_cycles_through_staged_values(file: CsvFile) {
    let mut app = WorkspaceApp::new(vec![file]);

    let _none = app.handle_message(AppMsg::CycleReviewFilter);

    assert_eq!(
        app.state().filters().review_status(),
        ReviewStatusFilter::All.next()
    );
}

#[rstest]
fn export_without_a_file_warns(file: CsvFile) {
    let mut app = WorkspaceApp::new(vec![file]);

    let cmd = app.handle_message(AppMsg::Export);

    assert!(cmd.is_none());
    assert!(app.view().contains("Please select a CSV file first"));
}

#[rstest]
#[tokio::test]
async fn upload_path_entry_uploads_and_refreshes(file: CsvFile) -> TestResult {
    let dir = tempfile::TempDir::new()?;
    let path = dir.path().join("new.csv");
    std::fs::write(&path, "Site,Status\nA,Active\n")?;
    let typed = path
        .to_str()
        .ok_or_else(|| io::Error::other("temp path must be UTF-8"))?
        .to_owned();

    let mut gateway = MockCsvGateway::new();
    gateway
        .expect_upload_csv()
        .withf(|payload| payload.file_name == "new.csv")
        .times(1)
        .returning(|_| Ok(UploadReceipt { row_count: 1 }));
    let refreshed = vec![file.clone(), sample_file("f-2", "new.csv")];
    gateway
        .expect_list_files()
        .times(1)
        .returning(move || Ok(refreshed.clone()));
    let mut app = WorkspaceApp::with_context(context_with(gateway, vec![file]));

    let _none = app.handle_message(AppMsg::EditUploadPath);
    for ch in typed.chars() {
        let _none = app.handle_message(AppMsg::InputChar(ch));
    }
    settle(&mut app, AppMsg::InputSubmit).await?;

    assert_eq!(app.state().files().len(), 2);
    assert!(app.state().staged_upload().is_none());
    assert!(app.view().contains("1 rows imported"));
    Ok(())
}

#[rstest]
#[tokio::test]
async fn commands_without_context_report_configuration_errors(file: CsvFile) -> TestResult {
    let mut app = WorkspaceApp::new(vec![file]);

    settle(&mut app, AppMsg::Activate).await?;

    let notice = app.state().latest_notice().map(|notice| notice.level);
    assert_eq!(notice, Some(NoticeLevel::Error));
    assert!(app.state().dataset().is_none());
    Ok(())
}

#[rstest]
#[tokio::test]
async fn stale_load_results_are_ignored(file: CsvFile) -> TestResult {
    let mut app = WorkspaceApp::new(vec![file.clone()]);
    let first = app.state.select_file(Some(file.id.clone()));
    let second = app.state.apply_filters();
    let (Some(stale), Some(latest)) = (first, second) else {
        return Err(io::Error::other("both loads should be issued").into());
    };

    let _none = app.handle_message(AppMsg::LoadFinished(crate::workspace::LoadOutcome {
        generation: stale.generation,
        dataset: Ok(dataset_with_rows(&file, 5)),
        catalog: Ok(ColumnCatalog::default()),
    }));
    assert!(app.state().dataset().is_none());

    let _none = app.handle_message(AppMsg::LoadFinished(crate::workspace::LoadOutcome {
        generation: latest.generation,
        dataset: Ok(dataset_with_rows(&file, 2)),
        catalog: Ok(ColumnCatalog::default()),
    }));
    assert_eq!(app.rows().len(), 2);
    Ok(())
}

#[rstest]
fn escape_dismisses_the_latest_notice(file: CsvFile) {
    let mut app = WorkspaceApp::new(vec![file]);
    let _none = app.handle_message(AppMsg::Export);
    assert!(app.state().latest_notice().is_some());

    let _none = app.update(key(KeyCode::Esc));

    assert!(app.state().latest_notice().is_none());
}

#[rstest]
fn any_key_closes_help(file: CsvFile) {
    let mut app = WorkspaceApp::new(vec![file]);
    let _none = app.update(key(KeyCode::Char('?')));
    assert!(app.show_help);
    assert!(app.view().contains("Keyboard Shortcuts"));

    let _none = app.update(key(KeyCode::Char('q')));

    assert!(!app.show_help);
}

#[rstest]
fn typing_in_search_does_not_trigger_shortcuts(file: CsvFile) {
    let mut app = WorkspaceApp::new(vec![file]);
    let _none = app.update(key(KeyCode::Char('/')));

    let cmd = app.update(key(KeyCode::Char('q')));

    assert!(cmd.is_none());
    assert!(app.is_editing());
}

#[rstest]
fn view_fills_terminal_without_exceeding_safe_width(file: CsvFile) {
    let wide = CsvFile {
        filename: "東京 depot inventory with a very long name.csv".to_owned(),
        ..file
    };
    let app = WorkspaceApp::with_dimensions(vec![wide], 60, 12);

    let output = app.view();

    assert_eq!(output.lines().count(), 12);
    for line in output.lines() {
        assert!(
            UnicodeWidthStr::width(line) <= 59,
            "line exceeds safe display width: '{line}'"
        );
    }
}

#[rstest]
fn page_down_scrolls_rows_into_view(file: CsvFile) {
    let mut app = WorkspaceApp::with_dimensions(vec![file.clone()], 100, 12);
    let request = app.state.select_file(Some(FileId::new("f-1")));
    let generation = request.map_or(0, |pending| pending.generation);
    let _none = app.handle_message(AppMsg::LoadFinished(crate::workspace::LoadOutcome {
        generation,
        dataset: Ok(dataset_with_rows(&file, 40)),
        catalog: Ok(ColumnCatalog::default()),
    }));
    app.focus = Focus::Rows;

    let _none = app.handle_message(AppMsg::PageDown);
    let _none = app.handle_message(AppMsg::PageDown);

    let visible = app.layout().rows_visible();
    assert_eq!(app.row_cursor.position, visible * 2);
    assert!(app.row_cursor.scroll_offset > 0);
    assert!(app.view().contains(&format!("site-r-{}", visible * 2 + 1)));
}
