// Match evaluation: one prompt, one model reply, normalized into an
// EvaluationResult. All model calls go through llm_client.

pub mod evaluator;
pub mod handlers;
pub mod models;
pub mod prompts;
