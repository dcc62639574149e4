use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::errors::AppError;
use crate::llm_client::prompts::PROBE_PROMPT;
use crate::state::AppState;

/// GET /health
/// Returns a simple status object with service version.
pub async fn health_handler() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "resumatch"
    }))
}

/// GET /api/test
/// Sends a fixed short prompt to the model to confirm the key and model name work.
pub async fn llm_probe_handler(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let output = state.llm.complete(PROBE_PROMPT, None).await?;
    Ok(Json(json!({ "output": output })))
}
