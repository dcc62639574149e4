pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post, put},
    Router,
};

use crate::evaluation::handlers as evaluation;
use crate::session::handlers as session;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let upload_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/test", get(health::llm_probe_handler))
        // Stateless evaluation
        .route("/api/analyze", post(evaluation::handle_analyze))
        .route(
            "/api/analyze/upload",
            post(evaluation::handle_analyze_upload),
        )
        // Session state machine
        .route("/api/sessions", post(session::handle_create_session))
        .route(
            "/api/sessions/:id",
            get(session::handle_get_session).delete(session::handle_delete_session),
        )
        .route(
            "/api/sessions/:id/resume",
            post(session::handle_select_resume).delete(session::handle_clear_resume),
        )
        .route(
            "/api/sessions/:id/job-description",
            put(session::handle_set_job_description),
        )
        .route(
            "/api/sessions/:id/analyze",
            post(session::handle_start_analysis),
        )
        .route(
            "/api/sessions/:id/update-resume",
            post(session::handle_request_resume_update),
        )
        .route("/api/sessions/:id/back", post(session::handle_go_back))
        .layer(DefaultBodyLimit::max(upload_limit))
        .with_state(state)
}
