use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::candidates::models::{Answer, Candidate, InterviewStats, NewCandidate};
use crate::errors::AppError;
use crate::state::AppState;
use crate::summary::summarize;

/// POST /api/v1/interviews/start
/// Creates the candidate record in `in-progress` status.
pub async fn handle_start_interview(
    State(state): State<AppState>,
    Json(req): Json<NewCandidate>,
) -> Result<(StatusCode, Json<Candidate>), AppError> {
    let candidate = state.store.create(req).await?;
    Ok((StatusCode::CREATED, Json(candidate)))
}

/// GET /api/v1/interviews/stats
pub async fn handle_stats(
    State(state): State<AppState>,
) -> Result<Json<InterviewStats>, AppError> {
    Ok(Json(state.store.stats().await?))
}

/// GET /api/v1/candidates
pub async fn handle_list_candidates(
    State(state): State<AppState>,
) -> Result<Json<Vec<Candidate>>, AppError> {
    Ok(Json(state.store.list().await?))
}

/// GET /api/v1/candidates/:id
pub async fn handle_get_candidate(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Candidate>, AppError> {
    Ok(Json(state.store.get(id).await?))
}

/// POST /api/v1/candidates/:id/answers
/// Appends one scored answer. Field validation happens before the record is
/// touched; a store failure surfaces as-is with no retry.
pub async fn handle_append_answer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(answer): Json<Answer>,
) -> Result<Json<Candidate>, AppError> {
    let candidate = state.store.append_answer(id, answer).await?;
    Ok(Json(candidate))
}

/// POST /api/v1/candidates/:id/complete
/// Runs the summary aggregator over the stored answers and persists the
/// final score and narrative. The server computes the outcome itself; the
/// client does not get to assert its own score.
pub async fn handle_complete_interview(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Candidate>, AppError> {
    let candidate = state.store.get(id).await?;
    let outcome = summarize(&candidate.answers);
    let candidate = state.store.complete(id, outcome.score, outcome.summary).await?;
    Ok(Json(candidate))
}
