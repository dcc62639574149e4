use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::evaluation::evaluator::EvaluationError;
use crate::extraction::ExtractionError;
use crate::llm_client::LlmError;
use crate::session::store::SessionError;
use crate::session::TransitionError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    #[error("Transport error: {0}")]
    Transport(#[from] LlmError),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error(transparent)]
    Transition(#[from] TransitionError),
}

impl From<EvaluationError> for AppError {
    fn from(err: EvaluationError) -> Self {
        match err {
            EvaluationError::Validation(msg) => AppError::Validation(msg),
            EvaluationError::Transport(e) => AppError::Transport(e),
            EvaluationError::MalformedResponse(msg) => AppError::MalformedResponse(msg),
        }
    }
}

impl From<SessionError> for AppError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::NotFound(id) => AppError::NotFound(format!("Session {id} not found")),
            SessionError::Transition(e) => AppError::Transition(e),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Extraction(e) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "EXTRACTION_ERROR",
                e.to_string(),
            ),
            AppError::Transport(e) => {
                tracing::error!("LLM transport error: {e}");
                (
                    StatusCode::BAD_GATEWAY,
                    "TRANSPORT_ERROR",
                    "The evaluation service is unavailable".to_string(),
                )
            }
            AppError::MalformedResponse(msg) => {
                tracing::warn!("Malformed model response: {msg}");
                (
                    StatusCode::BAD_GATEWAY,
                    "MALFORMED_RESPONSE",
                    format!("The evaluation service returned an unreadable response: {msg}"),
                )
            }
            AppError::Transition(e) => {
                let code = match e {
                    TransitionError::AnalysisInFlight => "ANALYSIS_IN_PROGRESS",
                    _ => "INVALID_TRANSITION",
                };
                (StatusCode::CONFLICT, code, e.to_string())
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
