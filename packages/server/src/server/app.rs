//! Application setup and server configuration.

use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use axum::{
    extract::Extension,
    http::{header::CONTENT_TYPE, Method},
    routing::get,
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::domains::summaries::jobs::register_summary_jobs;
use crate::kernel::jobs::{JobRegistry, JobRunner};
use crate::kernel::ServerDeps;
use crate::server::routes::{
    create_summary, delete_summary, health_handler, read_all_summaries, read_summary,
    update_summary,
};

/// Shared application state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub deps: Arc<ServerDeps>,
}

/// Build the Axum application router.
///
/// All collaborators arrive pre-constructed through `deps`; nothing is
/// resolved per request.
pub fn build_app(deps: Arc<ServerDeps>) -> Router {
    let state = AppState { deps };

    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([CONTENT_TYPE]);

    Router::new()
        .route(
            "/summaries/",
            get(read_all_summaries).post(create_summary),
        )
        .route(
            "/summaries/:id/",
            get(read_summary).put(update_summary).delete(delete_summary),
        )
        .route("/health", get(health_handler))
        .layer(Extension(state))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Build the job registry with every domain's handlers.
pub fn build_job_registry() -> JobRegistry {
    let mut registry = JobRegistry::new();
    register_summary_jobs(&mut registry);
    registry
}

/// Spawn the background job runner. Returns the shutdown handle.
pub fn spawn_job_runner(deps: Arc<ServerDeps>) -> Arc<AtomicBool> {
    let registry = Arc::new(build_job_registry());
    let runner = JobRunner::new(deps.job_queue.clone(), registry, deps);
    let shutdown = runner.shutdown_handle();

    tokio::spawn(async move {
        if let Err(e) = runner.run().await {
            tracing::error!(error = %e, "job runner exited with error");
        }
    });

    shutdown
}
