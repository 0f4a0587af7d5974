//! Support modules for the CSV review BDD tests.

pub(crate) mod service;
pub(crate) mod state;

pub(crate) use service::FakeCsvService;
pub(crate) use state::{
    ReviewState, ensure_service, run_on_workspace, scenario_runtime, scratch_dir,
};
