//! Test doubles shared by unit and router tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Notify;

use crate::config::Config;
use crate::evaluation::evaluator::MatchEvaluator;
use crate::extraction::{DocumentFormat, ExtractionError, TextExtractor};
use crate::llm_client::{CompletionService, LlmError};
use crate::session::store::SessionStore;
use crate::state::AppState;

enum Reply {
    Text(String),
    ApiError { status: u16, message: String },
}

/// Completion backend with a canned reply that records every prompt it sees.
pub struct StubCompletion {
    reply: Reply,
    calls: AtomicUsize,
    prompts: Mutex<Vec<String>>,
    gate: Option<Arc<Notify>>,
}

impl StubCompletion {
    pub fn replying(text: &str) -> Self {
        Self::with_reply(Reply::Text(text.to_string()))
    }

    pub fn failing(status: u16, message: &str) -> Self {
        Self::with_reply(Reply::ApiError {
            status,
            message: message.to_string(),
        })
    }

    /// Holds every call until `gate.notify_one()` is called.
    pub fn gated(text: &str, gate: Arc<Notify>) -> Self {
        Self {
            gate: Some(gate),
            ..Self::replying(text)
        }
    }

    fn with_reply(reply: Reply) -> Self {
        Self {
            reply,
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
            gate: None,
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.prompts.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl CompletionService for StubCompletion {
    async fn complete(&self, prompt: &str, _system: Option<&str>) -> Result<String, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(prompt.to_string());
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        match &self.reply {
            Reply::Text(text) => Ok(text.clone()),
            Reply::ApiError { status, message } => Err(LlmError::Api {
                status: *status,
                message: message.clone(),
            }),
        }
    }
}

/// Extractor that ignores the bytes and returns fixed text (or fails).
pub struct StubExtractor {
    text: Option<String>,
}

impl StubExtractor {
    pub fn returning(text: &str) -> Self {
        Self {
            text: Some(text.to_string()),
        }
    }

    pub fn empty() -> Self {
        Self { text: None }
    }
}

impl TextExtractor for StubExtractor {
    fn extract(&self, _data: &[u8], _format: DocumentFormat) -> Result<String, ExtractionError> {
        self.text.clone().ok_or(ExtractionError::Empty)
    }
}

pub fn test_config() -> Config {
    Config {
        gemini_api_key: "test-key".to_string(),
        gemini_model: "test-model".to_string(),
        gemini_api_base: "http://127.0.0.1:9".to_string(),
        llm_timeout_secs: 5,
        max_upload_bytes: 1024 * 1024,
        session_idle_secs: 60,
        port: 0,
        rust_log: "debug".to_string(),
    }
}

pub fn test_state(llm: Arc<StubCompletion>, extractor: Arc<dyn TextExtractor>) -> AppState {
    AppState {
        evaluator: MatchEvaluator::new(llm.clone()),
        llm,
        extractor,
        sessions: SessionStore::default(),
        config: test_config(),
    }
}
