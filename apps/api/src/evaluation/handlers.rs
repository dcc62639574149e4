//! Axum route handlers for stateless evaluation.

use axum::{extract::Multipart, extract::State, Json};

use crate::errors::AppError;
use crate::extract::ApiJson;
use crate::evaluation::models::{EvaluationRequest, EvaluationResult};
use crate::extraction::{extract_in_background, DocumentFormat};
use crate::state::AppState;
use crate::upload::parse_resume_form;

/// POST /api/analyze
///
/// Evaluates already-extracted resume text against a job description.
pub async fn handle_analyze(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<EvaluationRequest>,
) -> Result<Json<EvaluationResult>, AppError> {
    let result = state.evaluator.evaluate_request(&request).await?;
    Ok(Json(result))
}

/// POST /api/analyze/upload
///
/// Multipart variant: `resume` file plus `jobDescription` text. Extracts the
/// document, then evaluates it in the same request.
pub async fn handle_analyze_upload(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<EvaluationResult>, AppError> {
    let form = parse_resume_form(multipart).await?;

    let job_description = form.job_description.unwrap_or_default();
    if job_description.trim().is_empty() {
        return Err(AppError::Validation("Job Description is required.".to_string()));
    }
    let resume = form
        .resume
        .ok_or_else(|| AppError::Validation("A resume file is required.".to_string()))?;

    let format = DocumentFormat::detect(&resume.file_name, &resume.data)?.ensure_readable()?;
    let resume_text = extract_in_background(state.extractor.clone(), resume.data, format).await?;

    let result = state
        .evaluator
        .evaluate(&resume_text, &job_description)
        .await?;
    Ok(Json(result))
}
