pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::candidates::handlers as candidates;
use crate::questions::handlers as questions;
use crate::resume::handlers as resume;
use crate::scoring::handlers as scoring;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Interview lifecycle
        .route(
            "/api/v1/interviews/start",
            post(candidates::handle_start_interview),
        )
        .route("/api/v1/interviews/stats", get(candidates::handle_stats))
        // Candidate records (interviewer dashboard)
        .route("/api/v1/candidates", get(candidates::handle_list_candidates))
        .route("/api/v1/candidates/:id", get(candidates::handle_get_candidate))
        .route(
            "/api/v1/candidates/:id/answers",
            post(candidates::handle_append_answer),
        )
        .route(
            "/api/v1/candidates/:id/complete",
            post(candidates::handle_complete_interview),
        )
        // Question generation and answer scoring
        .route(
            "/api/v1/ai/generate-question",
            post(questions::handle_generate_question),
        )
        .route(
            "/api/v1/ai/evaluate-answer",
            post(scoring::handle_evaluate_answer),
        )
        .route(
            "/api/v1/evaluations/recent",
            get(scoring::handle_recent_evaluations),
        )
        // Resume intake
        .route("/api/v1/resumes", post(resume::handle_upload_resume))
        .with_state(state)
}
