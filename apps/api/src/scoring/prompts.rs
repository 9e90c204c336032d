//! Prompt construction for the remote scoring oracles.

use crate::questions::Question;

/// Chat-oracle evaluation prompt. Asks for a labeled `SCORE: X.X` the
/// tolerant extractor can find anywhere in the reply.
pub fn evaluation_prompt(question: &Question, answer: &str, time_spent: u32) -> String {
    format!(
        "You are an expert technical interviewer evaluating a candidate's answer.\n\n\
         Question ({}): {}\n\
         Candidate Answer: {}\n\
         Time Used: {}s out of {}s\n\n\
         Evaluate this answer considering:\n\
         1. Technical accuracy (40%)\n\
         2. Completeness (30%)\n\
         3. Clarity (20%)\n\
         4. Time efficiency (10%)\n\n\
         Provide: SCORE: X.X/10 | ANALYSIS: detailed feedback",
        question.difficulty.as_str().to_uppercase(),
        question.text,
        answer,
        time_spent,
        question.max_time
    )
}

/// Shorter prompt for generate-style oracles with small token budgets.
pub fn generate_style_prompt(question: &Question, answer: &str) -> String {
    format!(
        "Rate this technical interview answer from 0-10:\n\n\
         Q: {}\n\
         A: {}\n\n\
         Respond with SCORE: X.X and a brief reason.",
        question.text, answer
    )
}
