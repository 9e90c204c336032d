//! Question Source — six fixed difficulty slots, oracle generation with a
//! canned fallback pool per difficulty.
//!
//! `question()` is deliberately infallible: a generation failure of any kind
//! (network, non-2xx, junk text) is swallowed and answered from the pool.

pub mod handlers;
pub mod prompts;

use std::sync::Arc;

use async_trait::async_trait;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::candidates::models::{Answer, Difficulty};
use crate::oracle::{ChatOracle, OracleError, OracleReply};

pub const QUESTION_COUNT: usize = 6;

/// The pinned slot table: indices 0,1 easy/20s; 2,3 medium/60s; 4,5 hard/120s.
/// The summary aggregator's fixed 120-point denominator depends on exactly
/// this shape.
pub const SLOTS: [(Difficulty, u32); QUESTION_COUNT] = [
    (Difficulty::Easy, 20),
    (Difficulty::Easy, 20),
    (Difficulty::Medium, 60),
    (Difficulty::Medium, 60),
    (Difficulty::Hard, 120),
    (Difficulty::Hard, 120),
];

const GENERATED_CATEGORY: &str = "AI Generated";
const FALLBACK_CATEGORY: &str = "Fallback Pool";

/// Accept generated text only inside this exclusive character range.
const MIN_QUESTION_LEN: usize = 10;
const MAX_QUESTION_LEN: usize = 300;

const GENERATION_MAX_TOKENS: u32 = 100;
const GENERATION_TEMPERATURE: f32 = 0.7;

/// A question issued to the candidate. Immutable once issued; ephemeral —
/// only the `Answer` referencing it is persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    pub text: String,
    pub difficulty: Difficulty,
    pub max_time: u32,
    pub category: String,
}

const FALLBACK_EASY: [&str; 5] = [
    "Explain the difference between == and === in JavaScript.",
    "What is the purpose of the \"this\" keyword in JavaScript?",
    "How do you handle asynchronous operations in JavaScript?",
    "What are the main differences between var, let, and const?",
    "Explain what closures are in JavaScript with an example.",
];

const FALLBACK_MEDIUM: [&str; 5] = [
    "How would you optimize a React application for better performance?",
    "Explain the concept of RESTful APIs and their design principles.",
    "What is the difference between SQL and NoSQL databases?",
    "How do you implement error handling in a Node.js application?",
    "Describe the MVC architecture pattern and its benefits.",
];

const FALLBACK_HARD: [&str; 5] = [
    "Design a scalable chat application architecture for millions of users.",
    "How would you implement a distributed caching system?",
    "Explain microservices architecture and its trade-offs.",
    "Design a system for handling real-time notifications at scale.",
    "How would you implement authentication in a distributed system?",
];

fn fallback_pool(difficulty: Difficulty) -> &'static [&'static str] {
    match difficulty {
        Difficulty::Easy => &FALLBACK_EASY,
        Difficulty::Medium => &FALLBACK_MEDIUM,
        Difficulty::Hard => &FALLBACK_HARD,
    }
}

/// Seam for the remote generator. Production plugs in `ChatOracle`; tests
/// substitute canned or failing generators to exercise both outcomes of
/// `question()`.
#[async_trait]
pub trait QuestionGenerator: Send + Sync {
    async fn generate(
        &self,
        prompt: &str,
        max_tokens: u32,
        temperature: f32,
    ) -> Result<OracleReply, OracleError>;
}

#[async_trait]
impl QuestionGenerator for ChatOracle {
    async fn generate(
        &self,
        prompt: &str,
        max_tokens: u32,
        temperature: f32,
    ) -> Result<OracleReply, OracleError> {
        self.call(prompt, max_tokens, temperature).await
    }
}

pub struct QuestionSource {
    generator: Option<Arc<dyn QuestionGenerator>>,
}

impl QuestionSource {
    pub fn new(generator: Option<Arc<dyn QuestionGenerator>>) -> Self {
        Self { generator }
    }

    /// Returns the question for slot `index` (0..5). Prior answers feed an
    /// avoid-list so the generator steers away from covered topics.
    ///
    /// Panics if `index` is out of range; callers validate it first.
    pub async fn question(&self, index: usize, prior: &[Answer]) -> Question {
        let (difficulty, max_time) = SLOTS[index];

        if let Some(generator) = &self.generator {
            let prompt = prompts::generation_prompt(index, difficulty, prior);
            match generator
                .generate(&prompt, GENERATION_MAX_TOKENS, GENERATION_TEMPERATURE)
                .await
            {
                Ok(reply) => {
                    let text = reply.text.trim();
                    let len = text.chars().count();
                    if len > MIN_QUESTION_LEN && len < MAX_QUESTION_LEN {
                        debug!("Generated question {} ({difficulty})", index + 1);
                        return Question {
                            id: (index + 1).to_string(),
                            text: text.to_string(),
                            difficulty,
                            max_time,
                            category: GENERATED_CATEGORY.to_string(),
                        };
                    }
                    warn!(
                        "Generated question {} rejected (length {len}), using fallback pool",
                        index + 1
                    );
                }
                Err(e) => {
                    warn!("Question generation failed for slot {index}: {e}; using fallback pool");
                }
            }
        }

        self.fallback_question(index)
    }

    /// Uniform random pick from the slot's difficulty pool. No de-duplication
    /// across a session — accepted limitation.
    pub fn fallback_question(&self, index: usize) -> Question {
        let (difficulty, max_time) = SLOTS[index];
        let pool = fallback_pool(difficulty);
        let pick = rand::thread_rng().gen_range(0..pool.len());
        Question {
            id: (index + 1).to_string(),
            text: pool[pick].to_string(),
            difficulty,
            max_time,
            category: FALLBACK_CATEGORY.to_string(),
        }
    }
}
