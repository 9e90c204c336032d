mod candidates;
mod config;
mod db;
mod errors;
mod oracle;
mod questions;
mod resume;
mod routes;
mod scoring;
mod session;
mod state;
mod summary;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::candidates::store::PgCandidateStore;
use crate::config::Config;
use crate::db::create_pool;
use crate::oracle::{ChatOracle, CohereOracle};
use crate::questions::QuestionSource;
use crate::routes::build_router;
use crate::scoring::events::EvaluationSink;
use crate::scoring::heuristics::{KeywordStrategy, SimulationStrategy};
use crate::scoring::oracle_strategy::{ChatOracleStrategy, CohereStrategy};
use crate::scoring::{Evaluator, ScoreStrategy};
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails fast on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting interview API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url).await?;

    // Candidate record store
    let store = Arc::new(PgCandidateStore::new(db));

    // Question source: primary oracle for generation, canned pools as fallback
    let generator = ChatOracle::groq(config.groq_api_key.clone());
    let questions = Arc::new(QuestionSource::new(Some(Arc::new(generator))));
    info!("Question source initialized (model: {})", oracle::GROQ_MODEL);

    // Evaluation event sink feeding the interviewer audit log
    let events = EvaluationSink::new(config.event_ring_capacity);

    // Scoring cascade: remote oracles in fixed order, then the local
    // heuristic, then the pure keyword fallback which cannot fail.
    let mut strategies: Vec<Arc<dyn ScoreStrategy>> = Vec::new();
    strategies.push(Arc::new(ChatOracleStrategy::new(ChatOracle::groq(
        config.groq_api_key.clone(),
    ))));
    if let Some(key) = config.cohere_api_key.clone() {
        strategies.push(Arc::new(CohereStrategy::new(CohereOracle::new(key))));
    }
    if let Some(key) = config.perplexity_api_key.clone() {
        strategies.push(Arc::new(ChatOracleStrategy::new(ChatOracle::perplexity(
            key,
        ))));
    }
    strategies.push(Arc::new(SimulationStrategy));
    strategies.push(Arc::new(KeywordStrategy));
    info!(
        "Evaluator cascade initialized ({} strategies)",
        strategies.len()
    );

    let evaluator = Arc::new(Evaluator::new(strategies, events.clone()));

    // Build app state
    let state = AppState {
        store,
        questions,
        evaluator,
        events,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS in production

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
