use axum::{extract::State, Json};
use serde::Deserialize;

use crate::candidates::models::Answer;
use crate::errors::AppError;
use crate::questions::{Question, QUESTION_COUNT};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct GenerateQuestionRequest {
    pub question_index: usize,
    #[serde(default)]
    pub previous_answers: Vec<Answer>,
}

/// POST /api/v1/ai/generate-question
/// Never fails on oracle trouble — the fallback pool always answers.
pub async fn handle_generate_question(
    State(state): State<AppState>,
    Json(req): Json<GenerateQuestionRequest>,
) -> Result<Json<Question>, AppError> {
    if req.question_index >= QUESTION_COUNT {
        return Err(AppError::Validation(format!(
            "question_index must be below {QUESTION_COUNT}"
        )));
    }
    let question = state
        .questions
        .question(req.question_index, &req.previous_answers)
        .await;
    Ok(Json(question))
}
