//! Application State Machine — one user's cycle from Home through a result
//! and back.
//!
//! Home → Loading → {HighResult, LowResult} → UpdatedResume → Home
//!
//! Exactly one screen is active; the result payload lives beside it in
//! `last_result`. Transitions are the only code that mutates a session.

pub mod handlers;
pub mod store;

use bytes::Bytes;
use serde::Serialize;
use thiserror::Error;

use crate::evaluation::evaluator::EvaluationError;
use crate::evaluation::models::EvaluationResult;
use crate::extraction::{DocumentFormat, ExtractionError};

/// Scores at or above this land on the high-score result screen.
pub const HIGH_SCORE_THRESHOLD: u8 = 90;

const MISSING_RESUME: &str = "Please upload your resume (DOCX or PDF).";
const MISSING_JOB_DESCRIPTION: &str = "Please paste the job description.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Screen {
    Home,
    Loading,
    HighResult,
    LowResult,
    UpdatedResume,
}

impl Screen {
    pub fn for_score(score: u8) -> Screen {
        if score >= HIGH_SCORE_THRESHOLD {
            Screen::HighResult
        } else {
            Screen::LowResult
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum TransitionError {
    #[error("An analysis is already in progress for this session")]
    AnalysisInFlight,

    #[error("Cannot {action} from the {screen:?} screen")]
    InvalidTransition { action: &'static str, screen: Screen },

    #[error("The last evaluation did not include an updated resume")]
    NoUpdatedResume,
}

/// Why an analysis ended without a result.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    #[error(transparent)]
    Evaluation(#[from] EvaluationError),

    #[error("Analysis was interrupted: {0}")]
    Interrupted(String),
}

/// Per-field messages shown inline on the Home screen.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationErrors {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resume: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_description: Option<String>,
}

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.resume.is_none() && self.job_description.is_none()
    }
}

/// The selected resume file, held until analysis reads it.
#[derive(Debug, Clone)]
pub struct ResumeUpload {
    pub file_name: String,
    pub format: DocumentFormat,
    pub data: Bytes,
}

/// Everything the pipeline needs once a session has moved to Loading.
#[derive(Debug, Clone)]
pub struct AnalysisInput {
    pub resume: ResumeUpload,
    pub job_description: String,
}

#[derive(Debug)]
pub enum AnalysisStart {
    /// Inputs failed validation; the session stays on Home with field errors.
    Invalid,
    Started(AnalysisInput),
}

#[derive(Debug, Clone)]
pub struct SessionState {
    pub current_screen: Screen,
    pub resume: Option<ResumeUpload>,
    pub job_description_text: String,
    pub last_result: Option<EvaluationResult>,
    pub validation_errors: ValidationErrors,
    /// Blocking message from the last failed analysis.
    pub notice: Option<String>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            current_screen: Screen::Home,
            resume: None,
            job_description_text: String::new(),
            last_result: None,
            validation_errors: ValidationErrors::default(),
            notice: None,
        }
    }
}

impl SessionState {
    pub fn resume_file_name(&self) -> Option<&str> {
        self.resume.as_ref().map(|r| r.file_name.as_str())
    }

    /// Records the chosen resume file. An unrecognised or unreadable type
    /// (legacy `.doc`) becomes a resume field error and clears any earlier
    /// selection.
    pub fn select_resume(&mut self, file_name: &str, data: Bytes) -> Result<(), TransitionError> {
        self.require_home("select a resume")?;
        self.notice = None;

        let format =
            DocumentFormat::detect(file_name, &data).and_then(DocumentFormat::ensure_readable);
        match format {
            Ok(format) => {
                self.resume = Some(ResumeUpload {
                    file_name: file_name.to_string(),
                    format,
                    data,
                });
                self.validation_errors.resume = None;
            }
            Err(e) => {
                self.resume = None;
                self.validation_errors.resume = Some(e.to_string());
            }
        }
        Ok(())
    }

    pub fn clear_resume(&mut self) -> Result<(), TransitionError> {
        self.require_home("clear the resume")?;
        self.resume = None;
        Ok(())
    }

    pub fn set_job_description(&mut self, text: &str) -> Result<(), TransitionError> {
        self.require_home("edit the job description")?;
        self.notice = None;
        self.job_description_text = text.to_string();
        if !text.trim().is_empty() {
            self.validation_errors.job_description = None;
        }
        Ok(())
    }

    /// Validates inputs and, if they pass, moves to Loading and hands back
    /// what the pipeline needs. A session already Loading is refused so at
    /// most one evaluation is ever in flight.
    pub fn begin_analysis(&mut self) -> Result<AnalysisStart, TransitionError> {
        if self.current_screen == Screen::Loading {
            return Err(TransitionError::AnalysisInFlight);
        }
        self.require_home("start an analysis")?;

        let errors = ValidationErrors {
            resume: self.resume.is_none().then(|| MISSING_RESUME.to_string()),
            job_description: self
                .job_description_text
                .trim()
                .is_empty()
                .then(|| MISSING_JOB_DESCRIPTION.to_string()),
        };
        self.validation_errors = errors;
        self.notice = None;

        let resume = match (&self.resume, self.validation_errors.is_empty()) {
            (Some(resume), true) => resume.clone(),
            _ => return Ok(AnalysisStart::Invalid),
        };

        self.current_screen = Screen::Loading;
        Ok(AnalysisStart::Started(AnalysisInput {
            resume,
            job_description: self.job_description_text.clone(),
        }))
    }

    /// Applies the pipeline outcome. Success routes by score; failure
    /// returns to a cleared Home that only keeps the error message.
    pub fn complete_analysis(
        &mut self,
        outcome: Result<EvaluationResult, AnalysisError>,
    ) -> Result<(), TransitionError> {
        if self.current_screen != Screen::Loading {
            return Err(TransitionError::InvalidTransition {
                action: "finish an analysis",
                screen: self.current_screen,
            });
        }

        match outcome {
            Ok(result) => {
                self.current_screen = Screen::for_score(result.score);
                self.last_result = Some(result);
            }
            Err(e) => {
                self.reset();
                self.notice = Some(e.to_string());
            }
        }
        Ok(())
    }

    /// Shows the improved resume that arrived with the evaluation. No I/O.
    pub fn request_resume_update(&mut self) -> Result<(), TransitionError> {
        if !matches!(self.current_screen, Screen::HighResult | Screen::LowResult) {
            return Err(TransitionError::InvalidTransition {
                action: "request a resume update",
                screen: self.current_screen,
            });
        }
        let has_update = self
            .last_result
            .as_ref()
            .is_some_and(|r| !r.updated_resume.trim().is_empty());
        if !has_update {
            return Err(TransitionError::NoUpdatedResume);
        }
        self.current_screen = Screen::UpdatedResume;
        Ok(())
    }

    /// Leaves a result screen, discarding inputs and the result.
    pub fn go_back(&mut self) -> Result<(), TransitionError> {
        if !matches!(
            self.current_screen,
            Screen::HighResult | Screen::LowResult | Screen::UpdatedResume
        ) {
            return Err(TransitionError::InvalidTransition {
                action: "go back",
                screen: self.current_screen,
            });
        }
        self.reset();
        Ok(())
    }

    fn reset(&mut self) {
        *self = SessionState::default();
    }

    fn require_home(&self, action: &'static str) -> Result<(), TransitionError> {
        match self.current_screen {
            Screen::Home => Ok(()),
            Screen::Loading => Err(TransitionError::AnalysisInFlight),
            screen => Err(TransitionError::InvalidTransition { action, screen }),
        }
    }
}
