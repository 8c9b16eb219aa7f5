mod config;
mod errors;
mod llm_client;
mod models;
mod routes;
mod screening;
mod state;
mod store;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::screening::dialogue::DialogueEngine;
use crate::screening::questions::LlmQuestionProvider;
use crate::screening::sessions::SessionRegistry;
use crate::state::AppState;
use crate::store::RecordStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed values)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting TalentScout API v{}", env!("CARGO_PKG_VERSION"));

    // Open the encrypted candidate store (generates the key on first run)
    let store = Arc::new(RecordStore::open(&config.data_file, &config.key_file)?);
    info!("Candidate store at {}", store.path().display());

    // Initialize LLM client
    let llm = LlmClient::new(
        config.ollama_url.clone(),
        Duration::from_secs(config.llm_timeout_secs),
    )?;
    info!(
        "LLM client initialized (backend: {}, model: {})",
        config.ollama_url,
        llm_client::MODEL
    );

    // Question provider (LlmQuestionProvider by default; fallback content on failure)
    let provider = Arc::new(LlmQuestionProvider(llm));

    let state = AppState {
        engine: DialogueEngine::new(store.clone(), provider),
        sessions: SessionRegistry::new(),
        store,
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the chat frontend has a fixed host

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
