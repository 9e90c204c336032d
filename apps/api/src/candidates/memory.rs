//! In-memory `CandidateStore` used by session-controller and handler tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::candidates::models::{
    Answer, Candidate, CandidateStatus, InterviewStats, NewCandidate,
};
use crate::candidates::store::CandidateStore;
use crate::errors::AppError;

#[derive(Default)]
pub struct InMemoryStore {
    inner: Mutex<HashMap<Uuid, Candidate>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn with<T>(&self, f: impl FnOnce(&mut HashMap<Uuid, Candidate>) -> T) -> T {
        let mut guard = self.inner.lock().expect("store mutex poisoned");
        f(&mut guard)
    }
}

#[async_trait]
impl CandidateStore for InMemoryStore {
    async fn create(&self, new: NewCandidate) -> Result<Candidate, AppError> {
        new.validate()?;
        let candidate = Candidate {
            id: Uuid::new_v4(),
            name: new.name,
            email: new.email,
            phone: new.phone,
            resume_text: new.resume_text,
            status: CandidateStatus::InProgress,
            score: 0,
            summary: None,
            answers: Vec::new(),
            current_question_index: 0,
            created_at: Utc::now(),
            completed_at: None,
        };
        self.with(|m| m.insert(candidate.id, candidate.clone()));
        Ok(candidate)
    }

    async fn get(&self, id: Uuid) -> Result<Candidate, AppError> {
        self.with(|m| m.get(&id).cloned())
            .ok_or_else(|| AppError::NotFound(format!("Candidate {id} not found")))
    }

    async fn list(&self) -> Result<Vec<Candidate>, AppError> {
        let mut all = self.with(|m| m.values().cloned().collect::<Vec<_>>());
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(all)
    }

    async fn append_answer(&self, id: Uuid, answer: Answer) -> Result<Candidate, AppError> {
        answer.validate()?;
        self.with(|m| {
            let candidate = m
                .get_mut(&id)
                .ok_or_else(|| AppError::NotFound(format!("Candidate {id} not found")))?;
            candidate.answers.push(answer);
            candidate.current_question_index = candidate.answers.len();
            Ok(candidate.clone())
        })
    }

    async fn complete(
        &self,
        id: Uuid,
        score: u32,
        summary: String,
    ) -> Result<Candidate, AppError> {
        self.with(|m| {
            let candidate = m
                .get_mut(&id)
                .ok_or_else(|| AppError::NotFound(format!("Candidate {id} not found")))?;
            candidate.status = CandidateStatus::Completed;
            candidate.score = score;
            candidate.summary = Some(summary);
            candidate.completed_at = Some(Utc::now());
            Ok(candidate.clone())
        })
    }

    async fn stats(&self) -> Result<InterviewStats, AppError> {
        self.with(|m| {
            let total = m.len() as i64;
            let completed: Vec<_> = m
                .values()
                .filter(|c| c.status == CandidateStatus::Completed)
                .collect();
            let in_progress = m
                .values()
                .filter(|c| c.status == CandidateStatus::InProgress)
                .count() as i64;
            let scored: Vec<_> = completed.iter().filter(|c| c.score > 0).collect();
            let average_score = if scored.is_empty() {
                0.0
            } else {
                scored.iter().map(|c| c.score as f64).sum::<f64>() / scored.len() as f64
            };
            Ok(InterviewStats {
                total_candidates: total,
                completed_interviews: completed.len() as i64,
                in_progress_interviews: in_progress,
                average_score,
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::candidates::models::Difficulty;

    fn new_candidate() -> NewCandidate {
        NewCandidate {
            name: "Ada Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            phone: "555-0100".to_string(),
            resume_text: None,
        }
    }

    fn answer(score: u32) -> Answer {
        Answer {
            question_id: "1".to_string(),
            question: "Explain borrowing.".to_string(),
            answer: "References without ownership.".to_string(),
            time_spent: 10,
            max_time: 20,
            score,
            difficulty: Difficulty::Easy,
        }
    }

    #[tokio::test]
    async fn test_create_starts_in_progress() {
        let store = InMemoryStore::new();
        let c = store.create(new_candidate()).await.unwrap();
        assert_eq!(c.status, CandidateStatus::InProgress);
        assert_eq!(c.current_question_index, 0);
        assert!(c.answers.is_empty());
    }

    #[tokio::test]
    async fn test_append_advances_question_index() {
        let store = InMemoryStore::new();
        let c = store.create(new_candidate()).await.unwrap();
        let c = store.append_answer(c.id, answer(8)).await.unwrap();
        assert_eq!(c.answers.len(), 1);
        assert_eq!(c.current_question_index, 1);
    }

    #[tokio::test]
    async fn test_complete_sets_score_summary_status() {
        let store = InMemoryStore::new();
        let c = store.create(new_candidate()).await.unwrap();
        let c = store
            .complete(c.id, 75, "Solid performance.".to_string())
            .await
            .unwrap();
        assert_eq!(c.status, CandidateStatus::Completed);
        assert_eq!(c.score, 75);
        assert_eq!(c.summary.as_deref(), Some("Solid performance."));
        assert!(c.completed_at.is_some());
    }

    #[tokio::test]
    async fn test_get_missing_is_not_found() {
        let store = InMemoryStore::new();
        let err = store.get(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_stats_counts_and_average() {
        let store = InMemoryStore::new();
        let a = store.create(new_candidate()).await.unwrap();
        let b = store.create(new_candidate()).await.unwrap();
        store.create(new_candidate()).await.unwrap();
        store.complete(a.id, 80, "s".to_string()).await.unwrap();
        store.complete(b.id, 40, "s".to_string()).await.unwrap();

        let stats = store.stats().await.unwrap();
        assert_eq!(stats.total_candidates, 3);
        assert_eq!(stats.completed_interviews, 2);
        assert_eq!(stats.in_progress_interviews, 1);
        assert!((stats.average_score - 60.0).abs() < f64::EPSILON);
    }
}
