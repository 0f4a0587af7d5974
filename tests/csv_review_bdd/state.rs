//! Scenario state and service/workspace initialisation for the CSV review
//! BDD tests.

use std::rc::Rc;
use std::time::Duration;

use camino::Utf8PathBuf;
use rstest_bdd::Slot;
use rstest_bdd_macros::ScenarioState;
use tempfile::TempDir;
use tokio::runtime::Runtime;
use torchmap::{ApiBase, HttpCsvGateway, Workspace, WorkspaceError};
use wiremock::MockServer;

use super::service::FakeCsvService;

/// Tokio runtime shared by the synchronous steps of one scenario.
#[derive(Clone)]
pub(crate) struct ScenarioRuntime(Rc<Runtime>);

impl ScenarioRuntime {
    pub(crate) fn block_on<F: Future>(&self, future: F) -> F::Output {
        self.0.block_on(future)
    }
}

/// Workspace talking to the mock service over HTTP.
pub(crate) type ServiceWorkspace = Workspace<HttpCsvGateway>;

#[derive(ScenarioState, Default)]
pub(crate) struct ReviewState {
    pub(crate) runtime: Slot<ScenarioRuntime>,
    pub(crate) server: Slot<MockServer>,
    pub(crate) service: Slot<FakeCsvService>,
    pub(crate) workspace: Slot<ServiceWorkspace>,
    pub(crate) scratch: Slot<TempDir>,
    pub(crate) upload_path: Slot<Utf8PathBuf>,
    pub(crate) outcome: Slot<Result<(), WorkspaceError>>,
    /// Row ids loaded when the file was first opened, without filters.
    pub(crate) unfiltered_rows: Slot<Vec<String>>,
}

/// Returns the scenario runtime, starting it and the mock server on first
/// use.
pub(crate) fn scenario_runtime(review_state: &ReviewState) -> ScenarioRuntime {
    if review_state.runtime.with_ref(|_| ()).is_none() {
        let runtime = Runtime::new()
            .unwrap_or_else(|error| panic!("failed to build Tokio runtime: {error}"));
        review_state.runtime.set(ScenarioRuntime(Rc::new(runtime)));
    }
    let runtime = review_state
        .runtime
        .get()
        .unwrap_or_else(|| panic!("runtime not initialised"));

    if review_state.server.with_ref(|_| ()).is_none() {
        review_state.server.set(runtime.block_on(MockServer::start()));
    }
    runtime
}

/// Ensures the mock server answers with the fake service's routes.
pub(crate) fn ensure_service(review_state: &ReviewState) -> FakeCsvService {
    let runtime = scenario_runtime(review_state);

    if let Some(existing) = review_state.service.get() {
        return existing;
    }

    let service = FakeCsvService::default();
    review_state
        .server
        .with_ref(|server| runtime.block_on(service.mount(server)))
        .unwrap_or_else(|| panic!("mock server not initialised"));
    review_state.service.set(service.clone());
    service
}

/// Returns the scenario's scratch directory, creating it on first use.
pub(crate) fn scratch_dir(review_state: &ReviewState) -> Utf8PathBuf {
    if review_state.scratch.with_ref(|_| ()).is_none() {
        let dir = TempDir::new()
            .unwrap_or_else(|error| panic!("failed to create scratch directory: {error}"));
        review_state.scratch.set(dir);
    }

    review_state
        .scratch
        .with_ref(|dir| Utf8PathBuf::from_path_buf(dir.path().to_path_buf()))
        .unwrap_or_else(|| panic!("scratch directory not initialised"))
        .unwrap_or_else(|path| panic!("scratch directory is not UTF-8: {}", path.display()))
}

/// Runs `action` against the scenario's workspace, connecting it first if
/// needed.
pub(crate) fn run_on_workspace<R, F>(review_state: &ReviewState, action: F) -> R
where
    F: FnOnce(&mut ServiceWorkspace, &ScenarioRuntime) -> R,
{
    ensure_service(review_state);
    if review_state.workspace.with_ref(|_| ()).is_none() {
        let workspace = connect(review_state);
        review_state.workspace.set(workspace);
    }

    let runtime = scenario_runtime(review_state);
    review_state
        .workspace
        .with_mut(|workspace| action(workspace, &runtime))
        .unwrap_or_else(|| panic!("workspace not initialised"))
}

fn connect(review_state: &ReviewState) -> ServiceWorkspace {
    let server_url = review_state
        .server
        .with_ref(MockServer::uri)
        .unwrap_or_else(|| panic!("mock server URL missing"));
    let base = ApiBase::parse(&format!("{server_url}/api"))
        .unwrap_or_else(|error| panic!("mock base should parse: {error}"));
    let gateway = HttpCsvGateway::with_timeout(base, Duration::from_secs(5))
        .unwrap_or_else(|error| panic!("client should build: {error}"));

    Workspace::new(gateway).with_export_dir(scratch_dir(review_state).join("exports"))
}
