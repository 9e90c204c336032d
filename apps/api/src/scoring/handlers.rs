use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::questions::Question;
use crate::scoring::events::EvaluationEvent;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct EvaluateAnswerRequest {
    pub question: Question,
    pub answer: String,
    pub time_spent: u32,
}

#[derive(Debug, Serialize)]
pub struct EvaluateAnswerResponse {
    pub score: u32,
}

/// POST /api/v1/ai/evaluate-answer
/// Runs the scoring cascade. Always produces a score — oracle failures only
/// advance the cascade toward the deterministic keyword fallback.
pub async fn handle_evaluate_answer(
    State(state): State<AppState>,
    Json(req): Json<EvaluateAnswerRequest>,
) -> Result<Json<EvaluateAnswerResponse>, AppError> {
    if req.time_spent > req.question.max_time {
        return Err(AppError::Validation(format!(
            "time_spent {} exceeds the question's max_time {}",
            req.time_spent, req.question.max_time
        )));
    }
    let score = state
        .evaluator
        .evaluate(&req.question, &req.answer, req.time_spent)
        .await;
    Ok(Json(EvaluateAnswerResponse { score }))
}

/// GET /api/v1/evaluations/recent
/// The interviewer-facing audit log: recent evaluation events, oldest first.
pub async fn handle_recent_evaluations(
    State(state): State<AppState>,
) -> Json<Vec<EvaluationEvent>> {
    Json(state.events.recent())
}
