use axum::extract::Multipart;
use bytes::Bytes;

use crate::errors::AppError;

/// A resume file as it arrived in the form.
#[derive(Debug)]
pub struct UploadedResume {
    pub file_name: String,
    pub data: Bytes,
}

/// Parsed fields of a resume upload form.
#[derive(Debug, Default)]
pub struct ResumeForm {
    pub resume: Option<UploadedResume>,
    pub job_description: Option<String>,
}

/// Reads a multipart form with a `resume` file field and an optional
/// `jobDescription` text field. Unknown fields are drained and ignored.
pub async fn parse_resume_form(mut multipart: Multipart) -> Result<ResumeForm, AppError> {
    let mut form = ResumeForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Failed to read form field: {e}")))?
    {
        let name = field.name().unwrap_or("").to_string();

        match name.as_str() {
            "resume" | "file" => {
                let file_name = field.file_name().unwrap_or("resume").to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Failed to read file data: {e}")))?;
                if !data.is_empty() {
                    form.resume = Some(UploadedResume { file_name, data });
                }
            }
            "jobDescription" => {
                let text = field.text().await.map_err(|e| {
                    AppError::Validation(format!("Failed to read jobDescription: {e}"))
                })?;
                form.job_description = Some(text);
            }
            _ => {
                let _ = field.bytes().await;
            }
        }
    }

    Ok(form)
}
