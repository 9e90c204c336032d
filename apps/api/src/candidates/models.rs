use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;

/// Question difficulty. Fixed per slot position, never chosen dynamically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// Score multiplier applied to the 0–10 base score.
    ///
    /// Note the asymmetry: a perfect easy answer (base 10) yields 10 of the
    /// per-question maximum of 20, while a perfect hard answer reaches 20
    /// exactly. Deliberate product behavior, pinned by tests in `scoring`.
    pub fn multiplier(self) -> f64 {
        match self {
            Difficulty::Easy => 1.0,
            Difficulty::Medium => 1.5,
            Difficulty::Hard => 2.0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Candidate lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CandidateStatus {
    Pending,
    InProgress,
    Completed,
}

impl CandidateStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            CandidateStatus::Pending => "pending",
            CandidateStatus::InProgress => "in-progress",
            CandidateStatus::Completed => "completed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(CandidateStatus::Pending),
            "in-progress" => Some(CandidateStatus::InProgress),
            "completed" => Some(CandidateStatus::Completed),
            _ => None,
        }
    }
}

/// One answered (or timed-out) question slot. Immutable once appended.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Answer {
    pub question_id: String,
    pub question: String,
    pub answer: String,
    /// Seconds spent before submission or timeout. Never exceeds `max_time`.
    pub time_spent: u32,
    pub max_time: u32,
    /// Final per-answer score, 0–20 (difficulty multiplier already applied).
    pub score: u32,
    pub difficulty: Difficulty,
}

impl Answer {
    /// Synchronous field validation run before any append. Rejected answers
    /// never reach the store (and a rejected submission never reached the
    /// evaluator in the first place — the session guards that upstream).
    pub fn validate(&self) -> Result<(), AppError> {
        if self.question_id.trim().is_empty() || self.question.trim().is_empty() {
            return Err(AppError::Validation(
                "answer must reference a question".to_string(),
            ));
        }
        if self.answer.is_empty() {
            return Err(AppError::Validation(
                "answer text must not be empty".to_string(),
            ));
        }
        if self.max_time == 0 {
            return Err(AppError::Validation(
                "max_time must be positive".to_string(),
            ));
        }
        if self.time_spent > self.max_time {
            return Err(AppError::Validation(format!(
                "time_spent {} exceeds max_time {}",
                self.time_spent, self.max_time
            )));
        }
        if self.score > 20 {
            return Err(AppError::Validation(format!(
                "score {} exceeds the per-question maximum of 20",
                self.score
            )));
        }
        Ok(())
    }
}

/// A candidate with their interview record. Answers are ordered by slot;
/// `current_question_index == answers.len()` once the interview is in
/// progress.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candidate {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub resume_text: Option<String>,
    pub status: CandidateStatus,
    /// Final percentage, 0–100. Zero until completion.
    pub score: u32,
    pub summary: Option<String>,
    pub answers: Vec<Answer>,
    pub current_question_index: usize,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

/// Fields supplied when an interview starts. The store assigns identity,
/// timestamps and the `in-progress` status.
#[derive(Debug, Clone, Deserialize)]
pub struct NewCandidate {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub resume_text: Option<String>,
}

impl NewCandidate {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.name.trim().is_empty() {
            return Err(AppError::Validation("name is required".to_string()));
        }
        if self.email.trim().is_empty() {
            return Err(AppError::Validation("email is required".to_string()));
        }
        if self.phone.trim().is_empty() {
            return Err(AppError::Validation("phone is required".to_string()));
        }
        Ok(())
    }
}

/// Aggregate counters for the interviewer dashboard.
#[derive(Debug, Clone, Serialize)]
pub struct InterviewStats {
    pub total_candidates: i64,
    pub completed_interviews: i64,
    pub in_progress_interviews: i64,
    /// Mean final score across completed interviews with a non-zero score.
    pub average_score: f64,
}
