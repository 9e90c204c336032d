//! Summary Aggregator — reduces the six answer scores into a final
//! percentage and a narrative verdict.
//!
//! The denominator is always 120 (6 questions x 20 points), even for
//! abandoned interviews: an unanswered slot is indistinguishable from an
//! answered slot that scored zero. Acknowledged design point, not a bug to
//! fix here.

use serde::Serialize;

use crate::candidates::models::Answer;

/// Total achievable points across the six slots.
pub const MAX_POSSIBLE_SCORE: u32 = 120;

#[derive(Debug, Clone, Serialize)]
pub struct InterviewOutcome {
    /// Final percentage, 0–100.
    pub score: u32,
    pub summary: String,
}

/// Qualitative banding applied to the final percentage.
fn band(percentage: f64) -> &'static str {
    if percentage >= 80.0 {
        "EXCELLENT: Outstanding technical knowledge and communication skills. Highly recommended \
         for the position!"
    } else if percentage >= 60.0 {
        "GOOD: Solid fundamentals with room for growth. Shows strong potential for the role."
    } else if percentage >= 40.0 {
        "AVERAGE: Basic understanding present. Would benefit from additional training and \
         development."
    } else {
        "NEEDS IMPROVEMENT: Significant knowledge gaps identified. Requires substantial \
         preparation before role readiness."
    }
}

/// Aggregates all answers into the candidate's final result.
pub fn summarize(answers: &[Answer]) -> InterviewOutcome {
    if answers.is_empty() {
        return InterviewOutcome {
            score: 0,
            summary: "No answers provided. Interview was not completed.".to_string(),
        };
    }

    let total: u32 = answers.iter().map(|a| a.score).sum();
    let percentage = total as f64 / MAX_POSSIBLE_SCORE as f64 * 100.0;
    let answered = answers
        .iter()
        .filter(|a| !a.answer.trim().is_empty())
        .count();
    let avg = total as f64 / answers.len() as f64;

    let mut summary = String::from("Interview Analysis:\n");
    summary.push_str(&format!("- Questions Answered: {answered}/6\n"));
    summary.push_str(&format!(
        "- Total Score: {total}/{MAX_POSSIBLE_SCORE} points\n"
    ));
    summary.push_str(&format!("- Average per Question: {avg:.1}/20 points\n\n"));
    summary.push_str(band(percentage));

    InterviewOutcome {
        score: percentage.round() as u32,
        summary,
    }
}
