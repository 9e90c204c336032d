#![allow(dead_code)]

//! Timer / Session Controller — the per-interview finite state machine.
//!
//! One `InterviewSession` drives one candidate through the six slots:
//!
//! ```text
//! Idle -> QuestionLoaded -> Answering -> (Submitted | TimedOut)
//!                 ^                                |
//!                 +--------- index < 6 -----------+
//!                                                 |
//!                            index == 6 -> Completed
//! ```
//!
//! The session is transient client-facing state: nothing here is persisted
//! beyond what goes through the candidate store, and completing or
//! abandoning a session simply drops it. The countdown is advanced by
//! `tick()`, one call per elapsed second; `run()` is a convenience driver
//! on a tokio interval for callers that want the clock handled for them.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info};
use uuid::Uuid;

use crate::candidates::models::Answer;
use crate::candidates::store::CandidateStore;
use crate::errors::AppError;
use crate::questions::{Question, QuestionSource, QUESTION_COUNT};
use crate::scoring::Evaluator;
use crate::summary::summarize;

/// Placeholder text recorded when the countdown expires unanswered.
pub const TIMEOUT_ANSWER: &str = "(No answer provided - time expired)";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    QuestionLoaded,
    Answering,
    Submitted,
    TimedOut,
    Completed,
}

pub struct InterviewSession {
    candidate_id: Uuid,
    phase: Phase,
    index: usize,
    current: Option<Question>,
    time_remaining: u32,
    paused: bool,
    /// Single-flight guard: while an append/evaluation is in flight, ticks
    /// are ignored and further submissions rejected.
    busy: bool,
    questions: Arc<QuestionSource>,
    evaluator: Arc<Evaluator>,
    store: Arc<dyn CandidateStore>,
}

impl InterviewSession {
    pub fn new(
        candidate_id: Uuid,
        questions: Arc<QuestionSource>,
        evaluator: Arc<Evaluator>,
        store: Arc<dyn CandidateStore>,
    ) -> Self {
        Self {
            candidate_id,
            phase: Phase::Idle,
            index: 0,
            current: None,
            time_remaining: 0,
            paused: false,
            busy: false,
            questions,
            evaluator,
            store,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn question_index(&self) -> usize {
        self.index
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.current.as_ref()
    }

    pub fn time_remaining(&self) -> u32 {
        self.time_remaining
    }

    /// Idle -> QuestionLoaded -> Answering for slot 0.
    pub async fn start(&mut self) -> Result<&Question, AppError> {
        if self.phase != Phase::Idle {
            return Err(AppError::Validation(
                "interview has already started".to_string(),
            ));
        }
        self.load_question().await?;
        Ok(self.current.as_ref().expect("question loaded on start"))
    }

    /// Explicit submission with non-empty text. Evaluates, appends the
    /// answer and advances to the next slot (or completion).
    pub async fn submit(&mut self, text: &str) -> Result<u32, AppError> {
        if self.phase != Phase::Answering {
            return Err(AppError::Validation(
                "no question is awaiting an answer".to_string(),
            ));
        }
        if self.busy {
            return Err(AppError::Validation(
                "a submission is already in progress".to_string(),
            ));
        }
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(AppError::Validation(
                "answer text must not be empty".to_string(),
            ));
        }
        let question = self
            .current
            .clone()
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("answering without a question")))?;

        self.busy = true;
        let time_spent = question.max_time - self.time_remaining;
        let score = self.evaluator.evaluate(&question, trimmed, time_spent).await;
        let result = self
            .store
            .append_answer(
                self.candidate_id,
                Answer {
                    question_id: question.id.clone(),
                    question: question.text.clone(),
                    answer: trimmed.to_string(),
                    time_spent,
                    max_time: question.max_time,
                    score,
                    difficulty: question.difficulty,
                },
            )
            .await;
        self.busy = false;
        result?;

        debug!(
            "Slot {} submitted: score {score}, {time_spent}s of {}s",
            self.index + 1,
            question.max_time
        );
        self.phase = Phase::Submitted;
        self.index += 1;
        self.advance().await?;
        Ok(score)
    }

    /// Advances the countdown by one second. No-op while paused, busy or
    /// outside `Answering`. Fires the timeout transition when it reaches 0.
    pub async fn tick(&mut self) -> Result<(), AppError> {
        if self.paused || self.busy || self.phase != Phase::Answering {
            return Ok(());
        }
        if self.time_remaining > 0 {
            self.time_remaining -= 1;
        }
        if self.time_remaining == 0 {
            self.time_out().await?;
        }
        Ok(())
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    /// Drives the countdown on a one-second interval until completion.
    /// Timeout-only interviews run to the end without any submission.
    pub async fn run(&mut self) -> Result<(), AppError> {
        if self.phase == Phase::Idle {
            self.start().await?;
        }
        let mut clock = tokio::time::interval(Duration::from_secs(1));
        clock.tick().await; // first tick completes immediately
        while self.phase != Phase::Completed {
            clock.tick().await;
            self.tick().await?;
        }
        Ok(())
    }

    /// Countdown expiry: synthesize a zero-score placeholder answer without
    /// invoking the evaluator, then advance.
    async fn time_out(&mut self) -> Result<(), AppError> {
        let question = self
            .current
            .clone()
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("timeout without a question")))?;

        self.busy = true;
        let result = self
            .store
            .append_answer(
                self.candidate_id,
                Answer {
                    question_id: question.id.clone(),
                    question: question.text.clone(),
                    answer: TIMEOUT_ANSWER.to_string(),
                    time_spent: question.max_time,
                    max_time: question.max_time,
                    score: 0,
                    difficulty: question.difficulty,
                },
            )
            .await;
        self.busy = false;
        result?;

        debug!("Slot {} timed out", self.index + 1);
        self.phase = Phase::TimedOut;
        self.index += 1;
        self.advance().await
    }

    async fn advance(&mut self) -> Result<(), AppError> {
        if self.index < QUESTION_COUNT {
            self.load_question().await
        } else {
            self.complete().await
        }
    }

    async fn load_question(&mut self) -> Result<(), AppError> {
        self.phase = Phase::QuestionLoaded;
        let prior = self.store.get(self.candidate_id).await?.answers;
        let question = self.questions.question(self.index, &prior).await;
        self.time_remaining = question.max_time;
        self.current = Some(question);
        self.phase = Phase::Answering;
        Ok(())
    }

    /// Runs the aggregator exactly once, persists the outcome and clears
    /// all transient state.
    async fn complete(&mut self) -> Result<(), AppError> {
        let candidate = self.store.get(self.candidate_id).await?;
        let outcome = summarize(&candidate.answers);
        self.store
            .complete(self.candidate_id, outcome.score, outcome.summary)
            .await?;
        info!(
            "Interview completed for candidate {}: {}%",
            self.candidate_id, outcome.score
        );
        self.current = None;
        self.time_remaining = 0;
        self.paused = false;
        self.phase = Phase::Completed;
        Ok(())
    }
}
