pub mod config;
pub mod error;
pub mod job_search;
pub mod models;
pub mod output;
pub mod parser;
pub mod pipeline;
pub mod scraper;

use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse},
    routing::{get, post},
    Json, Router,
};
// Conditionally import SwaggerUi only when needed (not test)
#[cfg(not(test))]
use utoipa_swagger_ui::SwaggerUi;
// Conditionally import CORS only when needed (not test)
#[cfg(not(test))]
use tower_http::cors::{Any, CorsLayer};
use utoipa::OpenApi;
// Conditionally import Governor only when needed (not test)
#[cfg(not(test))]
use tower_governor::{
    governor::GovernorConfigBuilder, key_extractor::SmartIpKeyExtractor, GovernorLayer,
};
#[cfg(not(test))]
use std::num::NonZeroU32;
#[cfg(not(test))]
use std::sync::Arc;

use crate::error::AppError;
use crate::pipeline::{RunState, RunStatus, SharedState};

const INDEX_HTML: &str = include_str!("../static/index.html");

/// Single-page UI that starts a run and polls its status.
async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy", body = String)
    )
)]
async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "Service is healthy")
}

/// Start a pipeline run in the background
#[utoipa::path(
    post,
    path = "/api/run",
    responses(
        (status = 200, description = "Run started"),
        (status = 409, description = "A run is already in progress")
    )
)]
#[tracing::instrument(skip(state))]
async fn start_run(State(state): State<SharedState>) -> Result<impl IntoResponse, AppError> {
    {
        let mut s = state.lock().unwrap();
        if s.status == RunStatus::Running {
            return Err(AppError::AlreadyRunning);
        }
        *s = RunState {
            status: RunStatus::Running,
            progress: "Starting pipeline...".to_string(),
            ..RunState::default()
        };
    }

    let task_state = state.clone();
    tokio::spawn(async move {
        pipeline::run_pipeline(
            task_state,
            config::WEB_DAYS_BACK,
            config::DEFAULT_MAX_ARTICLES,
        )
        .await;
    });

    Ok(Json(serde_json::json!({ "status": "started" })))
}

/// Point-in-time snapshot of the current (or last) pipeline run
#[utoipa::path(
    get,
    path = "/api/status",
    responses(
        (status = 200, description = "Current run state", body = RunState)
    )
)]
async fn run_status(State(state): State<SharedState>) -> Json<RunState> {
    let snapshot = state.lock().unwrap().clone();
    Json(snapshot)
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Fundscout API",
        version = "0.1.0"
    ),
    paths(
        health_check,
        start_run,
        run_status
    ),
    components(schemas(
        RunState,
        pipeline::RunStatus,
        pipeline::RunSummary,
        models::FundingEntry,
        models::JobListing,
        output::CombinedRow
    ))
)]
struct ApiDoc;

/// Create the application with a fresh run state.
pub fn create_app() -> Router {
    create_app_with_state(pipeline::new_shared_state())
}

/// Create the application with all routes and middleware over an existing
/// run-state handle.
pub fn create_app_with_state(state: SharedState) -> Router {
    let api_doc = ApiDoc::openapi();

    let api_routes = Router::new()
        .route("/", get(index))
        .route("/health", get(health_check))
        .route("/api/run", post(start_run))
        .route("/api/status", get(run_status))
        .with_state(state);

    // --- Conditionally apply layers and Swagger UI only when NOT running tests ---
    #[cfg(not(test))]
    let (docs_router, rate_limited_api_routes) = {
        let docs_router = SwaggerUi::new("/docs").url("/api-doc/openapi.json", api_doc);

        let governor_conf = Arc::new(
            GovernorConfigBuilder::default()
                .key_extractor(SmartIpKeyExtractor)
                .period(std::time::Duration::from_secs(60))
                .burst_size(NonZeroU32::new(10).unwrap().into())
                .finish()
                .unwrap(),
        );
        let rate_limited_api_routes = api_routes.layer(GovernorLayer {
            config: governor_conf,
        });

        (docs_router, rate_limited_api_routes)
    };

    #[cfg(test)]
    let (docs_router, rate_limited_api_routes) = {
        let _ = api_doc;
        (Router::new(), api_routes)
    };

    let mut app = Router::new()
        .merge(rate_limited_api_routes)
        .merge(docs_router);

    #[cfg(not(test))]
    {
        app = app.layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );
    }

    app
}
