pub mod app;
pub mod routes;

pub use app::{build_app, build_job_registry, spawn_job_runner, AppState};
