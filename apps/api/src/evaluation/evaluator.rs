//! Match Evaluation Client — builds the prompt, makes exactly one model call,
//! and normalizes the reply.
//!
//! Flow: validate inputs → build prompt → complete() → strip fences →
//!       parse JSON object → attach originalResume → type as EvaluationResult.
//!
//! Nothing here retries. Every failure is surfaced to the caller.

use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info};

use crate::evaluation::models::{EvaluationRequest, EvaluationResult};
use crate::evaluation::prompts::build_evaluation_prompt;
use crate::llm_client::prompts::JSON_ONLY_SYSTEM;
use crate::llm_client::{strip_json_fences, CompletionService, LlmError};

#[derive(Debug, Error)]
pub enum EvaluationError {
    #[error("{0}")]
    Validation(String),

    #[error("Evaluation service unavailable: {0}")]
    Transport(#[from] LlmError),

    #[error("Model response could not be read: {0}")]
    MalformedResponse(String),
}

impl EvaluationRequest {
    /// Builds a request, refusing blank inputs before any network activity.
    pub fn new(resume_text: &str, job_description: &str) -> Result<Self, EvaluationError> {
        let request = Self {
            resume_text: resume_text.to_string(),
            job_description: job_description.to_string(),
        };
        request.validate()?;
        Ok(request)
    }

    pub fn validate(&self) -> Result<(), EvaluationError> {
        match (
            self.resume_text.trim().is_empty(),
            self.job_description.trim().is_empty(),
        ) {
            (false, false) => Ok(()),
            (true, true) => Err(EvaluationError::Validation(
                "Resume text and Job Description are required.".to_string(),
            )),
            (true, false) => Err(EvaluationError::Validation(
                "Resume text is required.".to_string(),
            )),
            (false, true) => Err(EvaluationError::Validation(
                "Job Description is required.".to_string(),
            )),
        }
    }
}

/// Evaluates a resume against a job description using a completion backend.
#[derive(Clone)]
pub struct MatchEvaluator {
    llm: Arc<dyn CompletionService>,
}

impl MatchEvaluator {
    pub fn new(llm: Arc<dyn CompletionService>) -> Self {
        Self { llm }
    }

    pub async fn evaluate(
        &self,
        resume_text: &str,
        job_description: &str,
    ) -> Result<EvaluationResult, EvaluationError> {
        let request = EvaluationRequest::new(resume_text, job_description)?;
        self.evaluate_request(&request).await
    }

    pub async fn evaluate_request(
        &self,
        request: &EvaluationRequest,
    ) -> Result<EvaluationResult, EvaluationError> {
        request.validate()?;

        info!(
            resume_chars = request.resume_text.len(),
            job_description_chars = request.job_description.len(),
            "Starting match evaluation"
        );

        let prompt = build_evaluation_prompt(&request.resume_text, &request.job_description);
        let reply = self.llm.complete(&prompt, Some(JSON_ONLY_SYSTEM)).await?;
        debug!("Model reply received ({} chars)", reply.len());

        let result = parse_evaluation_reply(&reply, &request.resume_text)?;

        info!(
            score = result.score,
            strong_areas = result.strong_areas.len(),
            missing_areas = result.missing_areas.len(),
            "Match evaluation complete"
        );
        Ok(result)
    }
}

/// Normalizes a raw model reply into an `EvaluationResult`.
///
/// The reply must be a JSON object once fences are stripped. `originalResume`
/// is written into it (overwriting anything the model sent) before typing.
pub fn parse_evaluation_reply(
    reply: &str,
    resume_text: &str,
) -> Result<EvaluationResult, EvaluationError> {
    let cleaned = strip_json_fences(reply);

    let mut value: Value = serde_json::from_str(cleaned).map_err(|e| {
        EvaluationError::MalformedResponse(format!("reply is not valid JSON: {e}"))
    })?;

    let object = value.as_object_mut().ok_or_else(|| {
        EvaluationError::MalformedResponse("reply is not a JSON object".to_string())
    })?;
    object.insert(
        "originalResume".to_string(),
        Value::String(resume_text.to_string()),
    );

    serde_json::from_value(value).map_err(|e| {
        EvaluationError::MalformedResponse(format!("reply does not match the expected shape: {e}"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::StubCompletion;

    const REPLY: &str = r#"{"score":68,"strongAreas":["X"],"missingAreas":["Y"],"updatedResume":"...","updatedPoints":["Z"]}"#;

    #[test]
    fn test_fenced_and_plain_replies_parse_identically() {
        let plain = parse_evaluation_reply(REPLY, "resume").unwrap();
        let tagged = parse_evaluation_reply(&format!("```json\n{REPLY}\n```"), "resume").unwrap();
        let bare = parse_evaluation_reply(&format!("  ```\n{REPLY}\n```  "), "resume").unwrap();
        assert_eq!(plain, tagged);
        assert_eq!(plain, bare);
    }

    #[test]
    fn test_original_resume_is_injected() {
        let result = parse_evaluation_reply(REPLY, "  Built features using JavaScript\n").unwrap();
        assert_eq!(result.original_resume, "  Built features using JavaScript\n");
    }

    #[test]
    fn test_model_supplied_original_resume_is_overwritten() {
        let reply = r#"{"score": 50, "originalResume": "hallucinated"}"#;
        let result = parse_evaluation_reply(reply, "real").unwrap();
        assert_eq!(result.original_resume, "real");
    }

    #[test]
    fn test_non_json_reply_is_malformed() {
        let err = parse_evaluation_reply("Sure! Here is your analysis.", "r").unwrap_err();
        assert!(matches!(err, EvaluationError::MalformedResponse(_)));
    }

    #[test]
    fn test_json_array_reply_is_malformed() {
        let err = parse_evaluation_reply("[1, 2, 3]", "r").unwrap_err();
        assert!(matches!(err, EvaluationError::MalformedResponse(_)));
    }

    #[test]
    fn test_out_of_range_score_is_malformed() {
        let err = parse_evaluation_reply(r#"{"score": 140}"#, "r").unwrap_err();
        assert!(matches!(err, EvaluationError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn test_blank_inputs_fail_before_any_call() {
        let stub = Arc::new(StubCompletion::replying(REPLY));
        let evaluator = MatchEvaluator::new(stub.clone());

        let err = evaluator.evaluate("   ", "Senior React Developer").await.unwrap_err();
        assert!(matches!(err, EvaluationError::Validation(_)));
        let err = evaluator.evaluate("resume", "\n\t").await.unwrap_err();
        assert!(matches!(err, EvaluationError::Validation(_)));

        assert_eq!(stub.calls(), 0);
    }

    #[tokio::test]
    async fn test_evaluate_sends_one_prompt_with_both_texts() {
        let stub = Arc::new(StubCompletion::replying(REPLY));
        let evaluator = MatchEvaluator::new(stub.clone());

        let result = evaluator
            .evaluate("Built features using JavaScript", "Senior React Developer")
            .await
            .unwrap();

        assert_eq!(result.score, 68);
        assert_eq!(result.missing_areas, vec!["Y"]);
        assert_eq!(result.original_resume, "Built features using JavaScript");
        assert_eq!(stub.calls(), 1);
        let prompt = stub.last_prompt().unwrap();
        assert!(prompt.contains("Built features using JavaScript"));
        assert!(prompt.contains("Senior React Developer"));
    }

    #[tokio::test]
    async fn test_transport_failure_is_not_retried() {
        let stub = Arc::new(StubCompletion::failing(503, "overloaded"));
        let evaluator = MatchEvaluator::new(stub.clone());

        let err = evaluator.evaluate("resume", "job").await.unwrap_err();
        assert!(matches!(
            err,
            EvaluationError::Transport(LlmError::Api { status: 503, .. })
        ));
        assert_eq!(stub.calls(), 1);
    }
}
