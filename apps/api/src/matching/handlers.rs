//! Axum route handlers for the Match API.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};

use crate::errors::AppError;
use crate::matching::models::{ScoreRequest, ScoreResult};
use crate::state::AppState;

/// POST /api/match
///
/// Scores a resume against a job description. Empty or whitespace-only fields → 400.
/// A malformed body is answered with the same JSON error shape.
pub async fn handle_match(
    State(state): State<AppState>,
    payload: Result<Json<ScoreRequest>, JsonRejection>,
) -> Result<Json<ScoreResult>, AppError> {
    let Json(request) = payload?;

    let result = state
        .scorer
        .score(&request.resume, &request.job_description)
        .await?;

    Ok(Json(result))
}
