//! Screen view models. Each view is a pure function of a session snapshot;
//! no screen owns state or performs I/O. Actions name the callbacks a screen
//! may invoke, each backed by one session endpoint.

use serde::Serialize;

use crate::session::{Screen, SessionState, ValidationErrors};

const ACCEPTED_FORMATS: &[&str] = &[".docx", ".pdf"];

/// User actions a screen can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Action {
    SelectResume,
    ClearResume,
    SetJobDescription,
    Analyze,
    UpdateResume,
    GoBack,
    Done,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "screen", rename_all = "camelCase")]
pub enum ScreenView {
    #[serde(rename_all = "camelCase")]
    Home {
        resume_file_name: Option<String>,
        accepted_formats: &'static [&'static str],
        job_description: String,
        errors: ValidationErrors,
        notice: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    Loading {
        message: &'static str,
        detail: &'static str,
    },
    #[serde(rename_all = "camelCase")]
    HighResult {
        score: u8,
        headline: &'static str,
        message: &'static str,
        strong_areas: Vec<String>,
    },
    #[serde(rename_all = "camelCase")]
    LowResult {
        score: u8,
        headline: &'static str,
        message: &'static str,
        missing_areas: Vec<String>,
        prompt: &'static str,
    },
    #[serde(rename_all = "camelCase")]
    UpdatedResume {
        score: u8,
        original_resume: String,
        updated_resume: String,
        updated_points: Vec<String>,
    },
}

impl ScreenView {
    pub fn actions(&self) -> &'static [Action] {
        match self {
            ScreenView::Home { .. } => &[
                Action::SelectResume,
                Action::ClearResume,
                Action::SetJobDescription,
                Action::Analyze,
            ],
            ScreenView::Loading { .. } => &[],
            ScreenView::HighResult { .. } | ScreenView::LowResult { .. } => {
                &[Action::UpdateResume, Action::GoBack]
            }
            ScreenView::UpdatedResume { .. } => &[Action::Done],
        }
    }
}

/// Renders the active screen. A result screen without a result falls back
/// to Home rather than showing an empty verdict.
pub fn render(state: &SessionState) -> ScreenView {
    match (state.current_screen, &state.last_result) {
        (Screen::Loading, _) => ScreenView::Loading {
            message: "Analyzing your resume...",
            detail: "This may take a few moments",
        },
        (Screen::HighResult, Some(result)) => ScreenView::HighResult {
            score: result.score,
            headline: "Great Match!",
            message: "Your resume aligns well with the job description.",
            strong_areas: result.strong_areas.clone(),
        },
        (Screen::LowResult, Some(result)) => ScreenView::LowResult {
            score: result.score,
            headline: "Needs Improvement",
            message: "Your resume could be better aligned with the job description.",
            missing_areas: result.missing_areas.clone(),
            prompt: "Do you want me to further improve your resume based on this JD?",
        },
        (Screen::UpdatedResume, Some(result)) => ScreenView::UpdatedResume {
            score: result.score,
            original_resume: result.original_resume.clone(),
            updated_resume: result.updated_resume.clone(),
            updated_points: result.updated_points.clone(),
        },
        _ => ScreenView::Home {
            resume_file_name: state.resume_file_name().map(str::to_string),
            accepted_formats: ACCEPTED_FORMATS,
            job_description: state.job_description_text.clone(),
            errors: state.validation_errors.clone(),
            notice: state.notice.clone(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluation::models::EvaluationResult;
    use bytes::Bytes;

    fn finished(score: u8) -> SessionState {
        let mut state = SessionState::default();
        state
            .select_resume("cv.docx", Bytes::from_static(b"PK\x03\x04"))
            .unwrap();
        state.set_job_description("Platform engineer").unwrap();
        state.begin_analysis().unwrap();
        state
            .complete_analysis(Ok(EvaluationResult {
                score,
                strong_areas: vec!["Rust".to_string()],
                missing_areas: vec!["Kubernetes".to_string()],
                updated_resume: "Better".to_string(),
                updated_points: vec!["Added Kubernetes".to_string()],
                original_resume: "Worse".to_string(),
            }))
            .unwrap();
        state
    }

    #[test]
    fn test_home_view_echoes_inputs() {
        let mut state = SessionState::default();
        state
            .select_resume("cv.docx", Bytes::from_static(b"PK\x03\x04"))
            .unwrap();
        state.set_job_description("Platform engineer").unwrap();

        match render(&state) {
            ScreenView::Home {
                resume_file_name,
                job_description,
                ..
            } => {
                assert_eq!(resume_file_name.as_deref(), Some("cv.docx"));
                assert_eq!(job_description, "Platform engineer");
            }
            other => panic!("expected home, got {other:?}"),
        }
    }

    #[test]
    fn test_high_result_shows_strong_areas() {
        let view = render(&finished(93));
        assert!(matches!(
            &view,
            ScreenView::HighResult { score: 93, strong_areas, .. } if strong_areas == &["Rust"]
        ));
        assert_eq!(view.actions(), &[Action::UpdateResume, Action::GoBack]);
    }

    #[test]
    fn test_low_result_shows_missing_areas() {
        let view = render(&finished(61));
        assert!(matches!(
            &view,
            ScreenView::LowResult { score: 61, missing_areas, .. } if missing_areas == &["Kubernetes"]
        ));
    }

    #[test]
    fn test_updated_resume_shows_both_sides() {
        let mut state = finished(61);
        state.request_resume_update().unwrap();
        let view = render(&state);
        assert_eq!(
            view,
            ScreenView::UpdatedResume {
                score: 61,
                original_resume: "Worse".to_string(),
                updated_resume: "Better".to_string(),
                updated_points: vec!["Added Kubernetes".to_string()],
            }
        );
        assert_eq!(view.actions(), &[Action::Done]);
    }

    #[test]
    fn test_loading_view_has_no_actions() {
        let mut state = SessionState::default();
        state
            .select_resume("cv.docx", Bytes::from_static(b"PK\x03\x04"))
            .unwrap();
        state.set_job_description("x").unwrap();
        state.begin_analysis().unwrap();
        let view = render(&state);
        assert!(matches!(view, ScreenView::Loading { .. }));
        assert!(view.actions().is_empty());
    }

    #[test]
    fn test_view_serializes_with_screen_tag() {
        let value = serde_json::to_value(render(&finished(61))).unwrap();
        assert_eq!(value["screen"], "lowResult");
        assert_eq!(value["missingAreas"][0], "Kubernetes");

        let home = serde_json::to_value(render(&SessionState::default())).unwrap();
        assert_eq!(home["screen"], "home");
        assert_eq!(home["acceptedFormats"], serde_json::json!([".docx", ".pdf"]));
        assert!(home["resumeFileName"].is_null());
    }
}
