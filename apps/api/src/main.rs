mod ats;
mod config;
mod corpus_client;
mod errors;
mod llm_client;
mod models;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::ats::engine::AtsEngine;
use crate::ats::random::RandomSeed;
use crate::ats::writer::TextProvider;
use crate::config::Config;
use crate::corpus_client::{CorpusClient, ExampleSource};
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
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

    info!("Starting ATS API v{}", env!("CARGO_PKG_VERSION"));

    // Corpus client (dataset suggestions and scoring)
    let corpus: Option<Arc<dyn ExampleSource>> = if config.corpus_enabled {
        let client = CorpusClient::new(
            config.corpus_base_url.clone(),
            config.corpus_dataset.clone(),
            config.corpus_timeout,
        )?;
        info!("Corpus client initialized (dataset: {})", config.corpus_dataset);
        Some(Arc::new(client))
    } else {
        info!("Corpus disabled, using rule-based analysis only");
        None
    };

    // LLM client (summary and experience drafts)
    let llm = match &config.hf_token {
        Some(token) => {
            let client = LlmClient::new(
                config.llm_base_url.clone(),
                token.clone(),
                config.llm_model.clone(),
                config.llm_timeout,
            )?;
            info!("LLM client initialized (model: {})", client.model());
            Some(client)
        }
        None => {
            info!("HF_TOKEN not set, drafts will use templates");
            None
        }
    };

    let seed = match config.random_seed {
        Some(seed) => {
            info!("Using fixed random seed {seed}");
            RandomSeed::Fixed(seed)
        }
        None => RandomSeed::Entropy,
    };

    let writer = TextProvider::new(llm);
    info!("Text writers: {}", writer.strategy_names().join(" -> "));

    let engine = AtsEngine::new(corpus, writer, seed);
    info!("ATS engine ready (dataset analysis: {})", engine.corpus_enabled());
    let state = AppState {
        engine: Arc::new(engine),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
