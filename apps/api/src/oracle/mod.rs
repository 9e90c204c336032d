//! Oracle clients — the single point of entry for all remote AI calls.
//!
//! Two wire shapes exist in the wild for the services this app talks to:
//! OpenAI-style chat completions (Groq, Perplexity) and Cohere-style
//! generate. Both are thin reqwest wrappers returning plain text; callers
//! treat the services as best-effort black boxes and never rely on richer
//! schema than "some text came back".
//!
//! There is no retry logic here on purpose: the scoring cascade is the
//! retry mechanism, and the question source falls back to canned pools.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

const GROQ_API_URL: &str = "https://api.groq.com/openai/v1/chat/completions";
const PERPLEXITY_API_URL: &str = "https://api.perplexity.ai/chat/completions";
const COHERE_API_URL: &str = "https://api.cohere.ai/v1/generate";

pub const GROQ_MODEL: &str = "llama-3.3-70b-versatile";
pub const PERPLEXITY_MODEL: &str = "llama-3.1-sonar-small-128k-online";
pub const COHERE_MODEL: &str = "command-light";

/// Per-request timeout. Strategies additionally wrap calls in their own
/// deadline, so this is a backstop for stuck connections.
const HTTP_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Error)]
pub enum OracleError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Oracle returned empty content")]
    EmptyContent,
}

/// Text returned by an oracle, tagged with the model that produced it.
#[derive(Debug, Clone)]
pub struct OracleReply {
    pub text: String,
    pub model: String,
}

// ────────────────────────────────────────────────────────────────────────────
// OpenAI-style chat completions (Groq, Perplexity)
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
    model: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// Chat-completions oracle client. One instance per configured endpoint.
#[derive(Clone)]
pub struct ChatOracle {
    client: Client,
    url: &'static str,
    model: &'static str,
    api_key: String,
}

impl ChatOracle {
    pub fn groq(api_key: String) -> Self {
        Self::new(GROQ_API_URL, GROQ_MODEL, api_key)
    }

    pub fn perplexity(api_key: String) -> Self {
        Self::new(PERPLEXITY_API_URL, PERPLEXITY_MODEL, api_key)
    }

    fn new(url: &'static str, model: &'static str, api_key: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(HTTP_TIMEOUT_SECS))
                .build()
                .expect("Failed to build HTTP client"),
            url,
            model,
            api_key,
        }
    }

    pub fn model(&self) -> &'static str {
        self.model
    }

    /// Sends a single user prompt and returns the first choice's text.
    pub async fn call(
        &self,
        prompt: &str,
        max_tokens: u32,
        temperature: f32,
    ) -> Result<OracleReply, OracleError> {
        let request_body = ChatRequest {
            model: self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            max_tokens,
            temperature,
        };

        let response = self
            .client
            .post(self.url)
            .header("authorization", format!("Bearer {}", self.api_key))
            .header("content-type", "application/json")
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(OracleError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: ChatResponse = response.json().await?;
        let model = parsed.model.unwrap_or_else(|| self.model.to_string());
        let text = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or(OracleError::EmptyContent)?;

        debug!("Oracle call succeeded: model={model}, chars={}", text.len());
        Ok(OracleReply { text, model })
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Cohere-style generate
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    generations: Vec<Generation>,
}

#[derive(Debug, Deserialize)]
struct Generation {
    text: String,
}

/// Cohere generate oracle client.
#[derive(Clone)]
pub struct CohereOracle {
    client: Client,
    api_key: String,
}

impl CohereOracle {
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(HTTP_TIMEOUT_SECS))
                .build()
                .expect("Failed to build HTTP client"),
            api_key,
        }
    }

    pub async fn call(
        &self,
        prompt: &str,
        max_tokens: u32,
        temperature: f32,
    ) -> Result<OracleReply, OracleError> {
        let request_body = GenerateRequest {
            model: COHERE_MODEL,
            prompt,
            max_tokens,
            temperature,
        };

        let response = self
            .client
            .post(COHERE_API_URL)
            .header("authorization", format!("Bearer {}", self.api_key))
            .header("content-type", "application/json")
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(OracleError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let parsed: GenerateResponse = response.json().await?;
        let text = parsed
            .generations
            .into_iter()
            .next()
            .map(|g| g.text.trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or(OracleError::EmptyContent)?;

        debug!("Cohere call succeeded: chars={}", text.len());
        Ok(OracleReply {
            text,
            model: COHERE_MODEL.to_string(),
        })
    }
}
