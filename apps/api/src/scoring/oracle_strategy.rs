//! Remote oracle scoring strategies.
//!
//! Both wire shapes share the same contract: prompt for a labeled sub-score,
//! scan the reply tolerantly, and default the base to 5.0 when the label is
//! missing. A missing label is not a failure — oracle replies are
//! best-effort text, not schema.

use std::sync::OnceLock;

use async_trait::async_trait;
use regex::Regex;

use crate::oracle::{ChatOracle, CohereOracle};
use crate::questions::Question;
use crate::scoring::prompts::{evaluation_prompt, generate_style_prompt};
use crate::scoring::{ScoreStrategy, StrategyError, StrategyOutcome};

const EVALUATION_MAX_TOKENS: u32 = 200;
const EVALUATION_TEMPERATURE: f32 = 0.1;

/// Base score assumed when the oracle replied but forgot the label.
const DEFAULT_BASE_SCORE: f64 = 5.0;

fn score_pattern() -> &'static Regex {
    static SCORE_RE: OnceLock<Regex> = OnceLock::new();
    SCORE_RE.get_or_init(|| {
        Regex::new(r"(?i)score:\s*([0-9]+(?:\.[0-9]+)?)").expect("score pattern is valid")
    })
}

/// Tolerant `SCORE: X.X` extraction, clamped to the 0–10 base scale.
pub fn extract_base_score(text: &str) -> Option<f64> {
    score_pattern()
        .captures(text)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .map(|s| s.clamp(0.0, 10.0))
}

/// Strategy backed by an OpenAI-style chat oracle (Groq, Perplexity).
pub struct ChatOracleStrategy {
    oracle: ChatOracle,
}

impl ChatOracleStrategy {
    pub fn new(oracle: ChatOracle) -> Self {
        Self { oracle }
    }
}

#[async_trait]
impl ScoreStrategy for ChatOracleStrategy {
    fn label(&self) -> &str {
        self.oracle.model()
    }

    async fn base_score(
        &self,
        question: &Question,
        answer: &str,
        time_spent: u32,
    ) -> Result<StrategyOutcome, StrategyError> {
        let prompt = evaluation_prompt(question, answer, time_spent);
        let reply = self
            .oracle
            .call(&prompt, EVALUATION_MAX_TOKENS, EVALUATION_TEMPERATURE)
            .await?;

        let base = extract_base_score(&reply.text).unwrap_or(DEFAULT_BASE_SCORE);
        Ok(StrategyOutcome {
            base,
            raw_response: reply.text,
        })
    }
}

/// Strategy backed by the Cohere generate oracle.
pub struct CohereStrategy {
    oracle: CohereOracle,
}

impl CohereStrategy {
    pub fn new(oracle: CohereOracle) -> Self {
        Self { oracle }
    }
}

#[async_trait]
impl ScoreStrategy for CohereStrategy {
    fn label(&self) -> &str {
        crate::oracle::COHERE_MODEL
    }

    async fn base_score(
        &self,
        question: &Question,
        answer: &str,
        _time_spent: u32,
    ) -> Result<StrategyOutcome, StrategyError> {
        let prompt = generate_style_prompt(question, answer);
        let reply = self
            .oracle
            .call(&prompt, EVALUATION_MAX_TOKENS, EVALUATION_TEMPERATURE)
            .await?;

        let base = extract_base_score(&reply.text).unwrap_or(DEFAULT_BASE_SCORE);
        Ok(StrategyOutcome {
            base,
            raw_response: reply.text,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_labeled_score() {
        assert_eq!(
            extract_base_score("SCORE: 8.5 | ANALYSIS: strong answer"),
            Some(8.5)
        );
    }

    #[test]
    fn test_extraction_is_case_insensitive() {
        assert_eq!(extract_base_score("score: 7"), Some(7.0));
        assert_eq!(extract_base_score("Score:9.5"), Some(9.5));
    }

    #[test]
    fn test_score_found_mid_text() {
        let text = "The candidate shows depth.\nSCORE: 6.0/10 | good coverage";
        assert_eq!(extract_base_score(text), Some(6.0));
    }

    #[test]
    fn test_missing_label_yields_none() {
        assert_eq!(extract_base_score("a solid 8 out of 10 answer"), None);
        assert_eq!(extract_base_score(""), None);
    }

    #[test]
    fn test_out_of_range_scores_clamped() {
        assert_eq!(extract_base_score("SCORE: 25"), Some(10.0));
        assert_eq!(extract_base_score("SCORE: 0.0"), Some(0.0));
    }
}
