//! Axum route handlers for the session API. Every handler runs one
//! transition and answers with the freshly rendered screen.

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::extract::ApiJson;
use crate::screens::{render, Action, ScreenView};
use crate::session::store::{run_analysis, Session};
use crate::state::AppState;
use crate::upload::parse_resume_form;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub session_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub view: ScreenView,
    pub actions: &'static [Action],
}

impl From<&Session> for SessionView {
    fn from(session: &Session) -> Self {
        let view = render(&session.state);
        Self {
            session_id: session.id,
            created_at: session.created_at,
            actions: view.actions(),
            view,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobDescriptionBody {
    #[serde(default)]
    pub job_description: String,
}

/// POST /api/sessions
pub async fn handle_create_session(
    State(state): State<AppState>,
) -> (StatusCode, Json<SessionView>) {
    let session = state.sessions.create().await;
    (StatusCode::CREATED, Json(SessionView::from(&session)))
}

/// GET /api/sessions/:id
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    let session = state.sessions.get(id).await?;
    Ok(Json(SessionView::from(&session)))
}

/// DELETE /api/sessions/:id
pub async fn handle_delete_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.sessions.remove(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/sessions/:id/resume
///
/// Multipart upload; the `resume` field selects the file. A `jobDescription`
/// field in the same form is applied too.
pub async fn handle_select_resume(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> Result<Json<SessionView>, AppError> {
    let form = parse_resume_form(multipart).await?;
    let resume = form
        .resume
        .ok_or_else(|| AppError::Validation("A resume file is required.".to_string()))?;

    let (session, ()) = state
        .sessions
        .apply(id, |s| {
            s.select_resume(&resume.file_name, resume.data)?;
            match &form.job_description {
                Some(text) => s.set_job_description(text),
                None => Ok(()),
            }
        })
        .await?;
    Ok(Json(SessionView::from(&session)))
}

/// DELETE /api/sessions/:id/resume
pub async fn handle_clear_resume(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    let (session, ()) = state.sessions.apply(id, |s| s.clear_resume()).await?;
    Ok(Json(SessionView::from(&session)))
}

/// PUT /api/sessions/:id/job-description
pub async fn handle_set_job_description(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ApiJson(body): ApiJson<JobDescriptionBody>,
) -> Result<Json<SessionView>, AppError> {
    let (session, ()) = state
        .sessions
        .apply(id, |s| s.set_job_description(&body.job_description))
        .await?;
    Ok(Json(SessionView::from(&session)))
}

/// POST /api/sessions/:id/analyze
///
/// Waits for the whole pipeline. Field errors and pipeline failures come
/// back as a Home view; a second call while one is running gets 409.
pub async fn handle_start_analysis(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    let session = run_analysis(
        &state.sessions,
        id,
        state.extractor.clone(),
        &state.evaluator,
    )
    .await?;
    Ok(Json(SessionView::from(&session)))
}

/// POST /api/sessions/:id/update-resume
pub async fn handle_request_resume_update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    let (session, ()) = state
        .sessions
        .apply(id, |s| s.request_resume_update())
        .await?;
    Ok(Json(SessionView::from(&session)))
}

/// POST /api/sessions/:id/back
///
/// Serves both "Go back" on the result screens and "Done" on the comparison.
pub async fn handle_go_back(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    let (session, ()) = state.sessions.apply(id, |s| s.go_back()).await?;
    Ok(Json(SessionView::from(&session)))
}
