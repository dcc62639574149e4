use std::sync::Arc;

use crate::config::Config;
use crate::evaluation::evaluator::MatchEvaluator;
use crate::extraction::TextExtractor;
use crate::llm_client::CompletionService;
use crate::session::store::SessionStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Raw completion backend, used directly only by the connectivity probe.
    pub llm: Arc<dyn CompletionService>,
    pub evaluator: MatchEvaluator,
    pub extractor: Arc<dyn TextExtractor>,
    pub sessions: SessionStore,
    pub config: Config,
}
