//! Local scoring heuristics — the tail of the cascade.
//!
//! `SimulationStrategy` blends concept coverage, text-structure proxies and
//! a time-efficiency bonus into a 0–10 base with templated narrative
//! feedback. `KeywordStrategy` is the terminal fallback: pure keyword
//! matching plus length and time bonuses, deterministic in its inputs, and
//! incapable of failing.
//!
//! Both consult fixed per-slot term tables keyed by question id ("1".."6").
//! Generated questions reuse the slot id, so the tables still apply;
//! an unknown id simply contributes zero coverage.

use async_trait::async_trait;

use crate::questions::Question;
use crate::scoring::{ScoreStrategy, StrategyError, StrategyOutcome};

pub const SIMULATION_LABEL: &str = "ai-simulation";
pub const KEYWORD_LABEL: &str = "keyword-fallback";

/// Concept vocabulary per slot for the simulation's coverage estimate.
fn technical_terms(question_id: &str) -> &'static [&'static str] {
    match question_id {
        "1" => &[
            "let",
            "const",
            "var",
            "scope",
            "hoisting",
            "block-scoped",
            "function-scoped",
            "temporal dead zone",
        ],
        "2" => &[
            "component",
            "reusable",
            "jsx",
            "props",
            "state",
            "virtual dom",
            "lifecycle",
            "render",
        ],
        "3" => &[
            "usestate",
            "hook",
            "state management",
            "functional component",
            "destructuring",
            "setter function",
        ],
        "4" => &[
            "sql",
            "nosql",
            "relational",
            "acid",
            "schema",
            "scalability",
            "consistency",
            "document database",
        ],
        "5" => &[
            "authentication",
            "authorization",
            "jwt",
            "session",
            "middleware",
            "bcrypt",
            "oauth",
            "rbac",
        ],
        "6" => &[
            "websocket",
            "push notification",
            "pub/sub",
            "message queue",
            "microservices",
            "load balancing",
        ],
        _ => &[],
    }
}

/// Expected keywords per slot for the terminal fallback.
fn expected_keywords(question_id: &str) -> &'static [&'static str] {
    match question_id {
        "1" => &[
            "let", "const", "var", "scope", "hoisting", "block", "function", "redeclare",
            "reassign",
        ],
        "2" => &[
            "component", "reusable", "ui", "jsx", "props", "state", "render", "function", "class",
        ],
        "3" => &[
            "usestate",
            "hook",
            "state",
            "functional",
            "component",
            "array",
            "destructuring",
            "setstate",
        ],
        "4" => &[
            "sql",
            "nosql",
            "relational",
            "document",
            "schema",
            "scalability",
            "acid",
            "consistency",
        ],
        "5" => &[
            "authentication",
            "authorization",
            "jwt",
            "token",
            "session",
            "password",
            "hash",
            "middleware",
        ],
        "6" => &[
            "websocket",
            "push",
            "notification",
            "scalable",
            "queue",
            "microservice",
            "real-time",
            "pubsub",
        ],
        _ => &[],
    }
}

fn found_terms<'a>(terms: &[&'a str], answer_lower: &str) -> Vec<&'a str> {
    terms
        .iter()
        .copied()
        .filter(|t| answer_lower.contains(&t.to_lowercase()))
        .collect()
}

fn coverage(found: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        found as f64 / total as f64
    }
}

fn time_efficiency(max_time: u32, time_spent: u32) -> f64 {
    if max_time == 0 {
        return 0.0;
    }
    ((max_time as f64 - time_spent as f64) / max_time as f64).max(0.0)
}

// ────────────────────────────────────────────────────────────────────────────
// Simulation
// ────────────────────────────────────────────────────────────────────────────

/// Computes the simulation base score and its narrative feedback.
pub fn simulation_base_score(
    question: &Question,
    answer: &str,
    time_spent: u32,
) -> (f64, String) {
    let answer_lower = answer.trim().to_lowercase();
    let terms = technical_terms(&question.id);
    let found = found_terms(terms, &answer_lower);

    // Concept coverage dominates (0–6), structure and completeness are
    // length proxies (0–2, 0–1.5), finishing early earns up to 0.5.
    let concept_points = coverage(found.len(), terms.len()) * 6.0;
    let structure_points = (answer_lower.len() as f64 / 100.0).min(2.0);
    let completeness_points = if answer_lower.len() > 50 {
        1.5
    } else {
        answer_lower.len() as f64 / 50.0 * 1.5
    };
    let time_points = time_efficiency(question.max_time, time_spent) * 0.5;

    let base = (concept_points + structure_points + completeness_points + time_points).min(10.0);
    let feedback = simulation_feedback(answer, base, &found, terms);
    (base, feedback)
}

fn simulation_feedback(answer: &str, base: f64, found: &[&str], all_terms: &[&str]) -> String {
    let coverage_pct = coverage(found.len(), all_terms.len()) * 100.0;
    let missing: Vec<&str> = all_terms
        .iter()
        .copied()
        .filter(|t| !found.contains(t))
        .collect();

    let mut feedback = format!("Heuristic Evaluation\nSCORE: {base:.1}/10 | ");

    if coverage_pct >= 70.0 {
        feedback.push_str(&format!(
            "TECHNICAL ACCURACY: Excellent - demonstrates strong understanding of core concepts ({}).",
            found.iter().take(3).copied().collect::<Vec<_>>().join(", ")
        ));
    } else if coverage_pct >= 50.0 {
        feedback.push_str(&format!(
            "TECHNICAL ACCURACY: Good - covers key points but could include more details about {}.",
            missing.iter().take(2).copied().collect::<Vec<_>>().join(" and ")
        ));
    } else {
        feedback.push_str(&format!(
            "TECHNICAL ACCURACY: Needs improvement - missing important concepts like {}.",
            all_terms.iter().take(3).copied().collect::<Vec<_>>().join(", ")
        ));
    }

    feedback.push_str("\n\nCOMMUNICATION: ");
    if answer.len() > 200 {
        feedback.push_str("Well-structured and detailed explanation.");
    } else if answer.len() > 100 {
        feedback.push_str("Clear but could benefit from more examples or elaboration.");
    } else {
        feedback.push_str("Too brief - expand with examples and more detailed explanations.");
    }

    if !missing.is_empty() {
        feedback.push_str(&format!(
            "\n\nSUGGESTIONS: Consider discussing {} to provide a more comprehensive answer.",
            missing.iter().take(2).copied().collect::<Vec<_>>().join(" and ")
        ));
    }

    feedback
}

/// Local heuristic scorer standing in for a remote oracle when all remotes
/// are down.
pub struct SimulationStrategy;

#[async_trait]
impl ScoreStrategy for SimulationStrategy {
    fn label(&self) -> &str {
        SIMULATION_LABEL
    }

    async fn base_score(
        &self,
        question: &Question,
        answer: &str,
        time_spent: u32,
    ) -> Result<StrategyOutcome, StrategyError> {
        let (base, raw_response) = simulation_base_score(question, answer, time_spent);
        Ok(StrategyOutcome { base, raw_response })
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Keyword fallback
// ────────────────────────────────────────────────────────────────────────────

/// Terminal fallback: up to 7 points keyword coverage, up to 2 points
/// length bonus, up to 1 point time bonus; capped at 10. A pure function of
/// `(question id, answer, time_spent)`.
pub fn keyword_base_score(question: &Question, answer: &str, time_spent: u32) -> (f64, String) {
    let answer_lower = answer.trim().to_lowercase();
    let keywords = expected_keywords(&question.id);
    let found = found_terms(keywords, &answer_lower);

    let correctness = (coverage(found.len(), keywords.len()) * 7.0).min(7.0);
    let length_bonus = (answer_lower.len() as f64 / 100.0).min(2.0);
    let time_bonus = time_efficiency(question.max_time, time_spent);

    let base = (correctness + length_bonus + time_bonus).min(10.0);
    let raw = format!(
        "FALLBACK EVALUATION (Keyword Matching)\nSCORE: {base:.1} | REASON: Found {}/{} key \
         concepts. Length bonus: {length_bonus:.1}, Time bonus: {time_bonus:.1}. Multiplier: \
         {}x for {} difficulty.",
        found.len(),
        keywords.len(),
        question.difficulty.multiplier(),
        question.difficulty
    );
    (base, raw)
}

/// The strategy that cannot fail. Always last in the cascade.
pub struct KeywordStrategy;

#[async_trait]
impl ScoreStrategy for KeywordStrategy {
    fn label(&self) -> &str {
        KEYWORD_LABEL
    }

    async fn base_score(
        &self,
        question: &Question,
        answer: &str,
        time_spent: u32,
    ) -> Result<StrategyOutcome, StrategyError> {
        let (base, raw_response) = keyword_base_score(question, answer, time_spent);
        Ok(StrategyOutcome { base, raw_response })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::candidates::models::Difficulty;

    fn slot_question(id: &str, difficulty: Difficulty, max_time: u32) -> Question {
        Question {
            id: id.to_string(),
            text: "placeholder".to_string(),
            difficulty,
            max_time,
            category: "Fallback Pool".to_string(),
        }
    }

    #[test]
    fn test_keyword_fallback_is_deterministic() {
        let q = slot_question("1", Difficulty::Easy, 20);
        let answer = "let and const are block scoped, var hoists to function scope";
        let (a, ra) = keyword_base_score(&q, answer, 12);
        let (b, rb) = keyword_base_score(&q, answer, 12);
        assert_eq!(a, b);
        assert_eq!(ra, rb);
    }

    #[test]
    fn test_keyword_base_never_exceeds_ten() {
        let q = slot_question("1", Difficulty::Hard, 120);
        let answer = "let const var scope hoisting block function redeclare reassign "
            .repeat(5);
        let (base, _) = keyword_base_score(&q, &answer, 0);
        assert!(base <= 10.0);
    }

    #[test]
    fn test_keyword_coverage_drives_score() {
        let q = slot_question("4", Difficulty::Medium, 60);
        let (rich, _) = keyword_base_score(
            &q,
            "sql is relational with a fixed schema and acid guarantees, nosql document \
             stores trade consistency for scalability",
            30,
        );
        let (poor, _) = keyword_base_score(&q, "databases store data somewhere", 30);
        assert!(rich > poor);
    }

    #[test]
    fn test_unknown_question_id_contributes_zero_coverage() {
        let q = slot_question("99", Difficulty::Easy, 20);
        let (base, _) = keyword_base_score(&q, "a short answer", 20);
        // Only the length bonus can contribute; no NaN from an empty table.
        assert!(base.is_finite());
        assert!(base < 1.0);
    }

    #[test]
    fn test_time_bonus_rewards_finishing_early() {
        let q = slot_question("1", Difficulty::Easy, 20);
        let answer = "let and const are block scoped";
        let (fast, _) = keyword_base_score(&q, answer, 2);
        let (slow, _) = keyword_base_score(&q, answer, 20);
        assert!(fast > slow);
    }

    #[test]
    fn test_simulation_base_bounded_zero_to_ten() {
        let q = slot_question("2", Difficulty::Easy, 20);
        let long = "component reusable jsx props state virtual dom lifecycle render ".repeat(10);
        let (high, _) = simulation_base_score(&q, &long, 0);
        let (low, _) = simulation_base_score(&q, "x", 20);
        assert!(high <= 10.0);
        assert!(low >= 0.0);
    }

    #[test]
    fn test_simulation_feedback_carries_score_label() {
        let q = slot_question("5", Difficulty::Hard, 120);
        let (_, feedback) =
            simulation_base_score(&q, "use jwt tokens with middleware for authentication", 60);
        assert!(feedback.contains("SCORE:"));
        assert!(feedback.contains("TECHNICAL ACCURACY"));
    }

    #[test]
    fn test_term_matching_is_case_insensitive() {
        let q = slot_question("5", Difficulty::Hard, 120);
        let (upper, _) = keyword_base_score(&q, "JWT AUTHENTICATION MIDDLEWARE", 30);
        let (lower, _) = keyword_base_score(&q, "jwt authentication middleware", 30);
        assert_eq!(upper, lower);
    }
}
