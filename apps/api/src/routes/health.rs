use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /
/// Liveness banner kept for clients that ping the root path.
pub async fn home_handler() -> Json<Value> {
    Json(json!({ "message": "ResumeMatch API Running" }))
}

/// GET /health
/// Returns service status, version, and the active scoring configuration.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "resumatch-api",
        "encoder": state.scorer.encoder_name(),
        "scoring": state.scorer.config(),
    }))
}
