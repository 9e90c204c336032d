//! Résumé intake — PDF text extraction plus best-effort contact detection.
//!
//! Extraction itself is a library call (`pdf-extract`); everything here is
//! heuristic and non-fatal: a résumé with no detectable name still parses,
//! the client just gets fewer prefilled fields.

pub mod handlers;

use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

use crate::errors::AppError;

#[derive(Debug, Clone, Serialize)]
pub struct ParsedResume {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub text: String,
}

fn email_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b")
            .expect("email pattern is valid")
    })
}

fn phone_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(\+?\d{1,3}[-.\s]?)?\(?\d{3}\)?[-.\s]?\d{3}[-.\s]?\d{4}")
            .expect("phone pattern is valid")
    })
}

/// Extracts text from an uploaded PDF and scans it for contact details.
pub fn parse_resume_pdf(data: &[u8]) -> Result<ParsedResume, AppError> {
    let text = pdf_extract::extract_text_from_mem(data)
        .map_err(|e| AppError::Validation(format!("could not extract text from PDF: {e}")))?;
    Ok(parse_resume_text(text))
}

/// Contact extraction over already-extracted text.
pub fn parse_resume_text(text: String) -> ParsedResume {
    let email = email_pattern()
        .find(&text)
        .map(|m| m.as_str().to_string());
    let phone = phone_pattern()
        .find(&text)
        .map(|m| m.as_str().trim().to_string());
    let name = guess_name(&text);
    ParsedResume {
        name,
        email,
        phone,
        text,
    }
}

/// Words that disqualify a line from being the candidate's name.
const NAME_SKIP_WORDS: [&str; 16] = [
    "resume",
    "curriculum",
    "cv",
    "education",
    "experience",
    "skills",
    "projects",
    "technical",
    "objective",
    "summary",
    "contact",
    "email",
    "mobile",
    "phone",
    "linkedin",
    "github",
];

/// First plausible name-looking line among the opening lines of the résumé.
fn guess_name(text: &str) -> Option<String> {
    for line in text.lines().filter(|l| !l.trim().is_empty()).take(10) {
        let line = line.trim();
        if line.len() < 2 || line.len() > 50 {
            continue;
        }
        if line.contains('@')
            || line.contains('|')
            || line.contains(':')
            || line.contains('+')
            || line.contains(',')
            || line.contains("www")
            || line.contains(".com")
        {
            continue;
        }
        let lower = line.to_lowercase();
        if NAME_SKIP_WORDS.iter().any(|w| lower.contains(w)) {
            continue;
        }
        if line.chars().any(|c| c.is_ascii_digit()) {
            continue;
        }
        return Some(line.to_string());
    }
    None
}
