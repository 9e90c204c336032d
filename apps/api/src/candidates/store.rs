//! Candidate record store — the persistence collaborator behind one trait.
//!
//! The core never retries store writes; any failure surfaces to the caller
//! as an `AppError` (accepted inconsistency risk: the client's transient
//! session state may then be ahead of the record).

use anyhow::anyhow;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::candidates::models::{
    Answer, Candidate, CandidateStatus, InterviewStats, NewCandidate,
};
use crate::errors::AppError;

/// The candidate store contract consumed by handlers and the session
/// controller. Carried in `AppState` as `Arc<dyn CandidateStore>`; tests
/// swap in an in-memory implementation.
#[async_trait]
pub trait CandidateStore: Send + Sync {
    /// Creates a candidate in `in-progress` status (interview start).
    async fn create(&self, new: NewCandidate) -> Result<Candidate, AppError>;

    async fn get(&self, id: Uuid) -> Result<Candidate, AppError>;

    /// All candidates, newest first.
    async fn list(&self) -> Result<Vec<Candidate>, AppError>;

    /// Appends one answer and advances `current_question_index` to the new
    /// answer count. Validates fields before touching the record.
    async fn append_answer(&self, id: Uuid, answer: Answer) -> Result<Candidate, AppError>;

    /// Marks the interview completed with its final score and summary.
    async fn complete(&self, id: Uuid, score: u32, summary: String)
        -> Result<Candidate, AppError>;

    async fn stats(&self) -> Result<InterviewStats, AppError>;
}

// ────────────────────────────────────────────────────────────────────────────
// Postgres implementation
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, FromRow)]
struct CandidateRow {
    id: Uuid,
    name: String,
    email: String,
    phone: String,
    resume_text: Option<String>,
    status: String,
    score: i32,
    summary: Option<String>,
    answers: serde_json::Value,
    current_question_index: i32,
    created_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
}

impl TryFrom<CandidateRow> for Candidate {
    type Error = AppError;

    fn try_from(row: CandidateRow) -> Result<Self, AppError> {
        let status = CandidateStatus::parse(&row.status)
            .ok_or_else(|| AppError::Internal(anyhow!("unknown candidate status {}", row.status)))?;
        let answers: Vec<Answer> = serde_json::from_value(row.answers)
            .map_err(|e| AppError::Internal(anyhow!("corrupt answers column: {e}")))?;
        Ok(Candidate {
            id: row.id,
            name: row.name,
            email: row.email,
            phone: row.phone,
            resume_text: row.resume_text,
            status,
            score: row.score.max(0) as u32,
            summary: row.summary,
            answers,
            current_question_index: row.current_question_index.max(0) as usize,
            created_at: row.created_at,
            completed_at: row.completed_at,
        })
    }
}

#[derive(Debug, FromRow)]
struct StatsRow {
    total_candidates: i64,
    completed_interviews: i64,
    in_progress_interviews: i64,
    average_score: f64,
}

pub struct PgCandidateStore {
    pool: PgPool,
}

impl PgCandidateStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch(&self, id: Uuid) -> Result<CandidateRow, AppError> {
        let row: Option<CandidateRow> =
            sqlx::query_as("SELECT * FROM candidates WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        row.ok_or_else(|| AppError::NotFound(format!("Candidate {id} not found")))
    }
}

#[async_trait]
impl CandidateStore for PgCandidateStore {
    async fn create(&self, new: NewCandidate) -> Result<Candidate, AppError> {
        new.validate()?;
        let row: CandidateRow = sqlx::query_as(
            r#"
            INSERT INTO candidates (id, name, email, phone, resume_text, status)
            VALUES ($1, $2, $3, $4, $5, 'in-progress')
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&new.name)
        .bind(&new.email)
        .bind(&new.phone)
        .bind(&new.resume_text)
        .fetch_one(&self.pool)
        .await?;
        row.try_into()
    }

    async fn get(&self, id: Uuid) -> Result<Candidate, AppError> {
        self.fetch(id).await?.try_into()
    }

    async fn list(&self) -> Result<Vec<Candidate>, AppError> {
        let rows: Vec<CandidateRow> =
            sqlx::query_as("SELECT * FROM candidates ORDER BY created_at DESC")
                .fetch_all(&self.pool)
                .await?;
        rows.into_iter().map(Candidate::try_from).collect()
    }

    async fn append_answer(&self, id: Uuid, answer: Answer) -> Result<Candidate, AppError> {
        answer.validate()?;

        let existing: Candidate = self.fetch(id).await?.try_into()?;
        let mut answers = existing.answers;
        answers.push(answer);
        let answers_json = serde_json::to_value(&answers)
            .map_err(|e| AppError::Internal(anyhow!("failed to encode answers: {e}")))?;

        // Invariant: current_question_index tracks the answer count.
        let row: CandidateRow = sqlx::query_as(
            r#"
            UPDATE candidates
            SET answers = $1, current_question_index = $2
            WHERE id = $3
            RETURNING *
            "#,
        )
        .bind(answers_json)
        .bind(answers.len() as i32)
        .bind(id)
        .fetch_one(&self.pool)
        .await?;
        row.try_into()
    }

    async fn complete(
        &self,
        id: Uuid,
        score: u32,
        summary: String,
    ) -> Result<Candidate, AppError> {
        let row: Option<CandidateRow> = sqlx::query_as(
            r#"
            UPDATE candidates
            SET status = 'completed', score = $1, summary = $2, completed_at = now()
            WHERE id = $3
            RETURNING *
            "#,
        )
        .bind(score as i32)
        .bind(&summary)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.ok_or_else(|| AppError::NotFound(format!("Candidate {id} not found")))?
            .try_into()
    }

    async fn stats(&self) -> Result<InterviewStats, AppError> {
        let row: StatsRow = sqlx::query_as(
            r#"
            SELECT
                COUNT(*) AS total_candidates,
                COUNT(*) FILTER (WHERE status = 'completed') AS completed_interviews,
                COUNT(*) FILTER (WHERE status = 'in-progress') AS in_progress_interviews,
                COALESCE(AVG(score::float8) FILTER (WHERE status = 'completed' AND score > 0), 0)
                    AS average_score
            FROM candidates
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(InterviewStats {
            total_candidates: row.total_candidates,
            completed_interviews: row.completed_interviews,
            in_progress_interviews: row.in_progress_interviews,
            average_score: row.average_score,
        })
    }
}
