use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
///
/// Oracle API keys are supplied exclusively through the environment;
/// nothing secret-looking is ever compiled into the binary.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    /// Primary scoring/generation oracle (Groq). Required.
    pub groq_api_key: String,
    /// Secondary scoring oracle (Cohere). The strategy is skipped when unset.
    pub cohere_api_key: Option<String>,
    /// Tertiary scoring oracle (Perplexity). The strategy is skipped when unset.
    pub perplexity_api_key: Option<String>,
    pub port: u16,
    pub rust_log: String,
    /// How many recent evaluation events the audit ring retains.
    pub event_ring_capacity: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            groq_api_key: require_env("GROQ_API_KEY")?,
            cohere_api_key: optional_env("COHERE_API_KEY"),
            perplexity_api_key: optional_env("PERPLEXITY_API_KEY"),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            event_ring_capacity: std::env::var("EVENT_RING_CAPACITY")
                .unwrap_or_else(|_| "64".to_string())
                .parse::<usize>()
                .context("EVENT_RING_CAPACITY must be a positive integer")?,
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
