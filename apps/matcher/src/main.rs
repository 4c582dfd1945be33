mod config;
mod errors;
mod extraction;
mod llm_client;
mod matching;
mod models;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use std::sync::Arc;

use crate::config::Config;
use crate::extraction::TextExtractor;
use crate::llm_client::LlmClient;
use crate::matching::distiller::FieldDistiller;
use crate::matching::pipeline::MatchPipeline;
use crate::matching::scorer::{EmbeddingScorer, RubricScorer, ScoringStrategy, SemanticScorer};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing or malformed env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting resume matcher v{}", env!("CARGO_PKG_VERSION"));

    // Initialize LLM client
    let llm = Arc::new(LlmClient::new(
        config.openai_api_key.clone(),
        config.openai_base_url.clone(),
        config.external_call_timeout,
    )?);
    info!(
        "LLM client initialized (chat: {}, embeddings: {})",
        llm_client::CHAT_MODEL,
        llm_client::EMBEDDING_MODEL
    );

    // Initialize scorer (embedding by default; swap via SCORING_STRATEGY)
    let scorer: Arc<dyn SemanticScorer> = match config.scoring_strategy {
        ScoringStrategy::Embedding => Arc::new(EmbeddingScorer::new(
            FieldDistiller::new(llm.clone()),
            llm.clone(),
        )),
        ScoringStrategy::Rubric => {
            Arc::new(RubricScorer::new(llm.clone(), config.skill_vocabulary.clone()))
        }
    };
    info!(
        "Scoring strategy: {:?}, up to {} documents in flight",
        config.scoring_strategy, config.max_concurrent_documents
    );

    let pipeline = MatchPipeline::new(
        Arc::new(TextExtractor),
        scorer,
        config.max_concurrent_documents,
        config.external_call_timeout,
    );

    // Build app state
    let state = AppState {
        config: config.clone(),
        pipeline: Arc::new(pipeline),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict allowed origins once a frontend host is fixed

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
