//! Prompt construction for question generation.

use crate::candidates::models::{Answer, Difficulty};

/// Fixed topic focus per slot index. Slots progress from fundamentals to
/// system design in step with the difficulty table.
pub const TOPIC_HINTS: [&str; 6] = [
    "JavaScript fundamentals, ES6 features, or basic programming concepts",
    "Frontend frameworks (React/Vue/Angular), CSS, or web development",
    "Backend development, APIs, databases, or server-side concepts",
    "System design, architecture, scalability, or performance optimization",
    "Advanced algorithms, data structures, security, or complex problem solving",
    "Real-world system architecture, distributed systems, or scalability challenges",
];

/// Builds the generation prompt: difficulty, the slot's topic hint, and an
/// avoid-list made of the opening words of previously asked questions.
pub fn generation_prompt(index: usize, difficulty: Difficulty, prior: &[Answer]) -> String {
    let mut prompt = format!(
        "Generate a unique {difficulty} level technical interview question for a software developer.\n\n"
    );

    prompt.push_str(&format!(
        "Question {}/6 - Topic: {}\n",
        index + 1,
        TOPIC_HINTS[index]
    ));
    prompt.push_str(&format!(
        "Difficulty: {}\n\n",
        difficulty.as_str().to_uppercase()
    ));

    if !prior.is_empty() {
        prompt.push_str("Avoid these already covered topics: ");
        for answer in prior {
            let topic: Vec<&str> = answer.question.split_whitespace().take(4).collect();
            prompt.push_str(&format!("\"{}\" ", topic.join(" ")));
        }
        prompt.push_str("\n\n");
    }

    prompt.push_str("Requirements:\n");
    prompt.push_str("- Generate ONE specific, clear question\n");
    prompt.push_str("- Make it interview-appropriate and professional\n");
    prompt.push_str("- Ensure it tests practical knowledge\n");
    prompt.push_str("- Keep it concise (1-2 sentences max)\n");
    prompt.push_str("- No examples needed in the question\n\n");
    prompt.push_str("Question:");

    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prior_answer(question: &str) -> Answer {
        Answer {
            question_id: "1".to_string(),
            question: question.to_string(),
            answer: "something".to_string(),
            time_spent: 5,
            max_time: 20,
            score: 5,
            difficulty: Difficulty::Easy,
        }
    }

    #[test]
    fn test_prompt_names_slot_and_topic() {
        let p = generation_prompt(2, Difficulty::Medium, &[]);
        assert!(p.contains("Question 3/6"));
        assert!(p.contains(TOPIC_HINTS[2]));
        assert!(p.contains("Difficulty: MEDIUM"));
        assert!(!p.contains("Avoid these"));
    }

    #[test]
    fn test_prompt_includes_avoid_list() {
        let prior = vec![prior_answer("What is the event loop in Node.js?")];
        let p = generation_prompt(1, Difficulty::Easy, &prior);
        assert!(p.contains("Avoid these already covered topics"));
        assert!(p.contains("\"What is the event\""));
    }
}
