use std::sync::Arc;

use crate::candidates::store::CandidateStore;
use crate::questions::QuestionSource;
use crate::scoring::events::EvaluationSink;
use crate::scoring::Evaluator;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Candidate record store. Production: Postgres-backed.
    pub store: Arc<dyn CandidateStore>,
    /// Question source — oracle-generated with canned fallback pools.
    pub questions: Arc<QuestionSource>,
    /// Scoring cascade orchestrator.
    pub evaluator: Arc<Evaluator>,
    /// Evaluation event sink for the interviewer audit log.
    pub events: EvaluationSink,
}
