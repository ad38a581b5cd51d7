mod anonymize;
mod config;
mod errors;
mod extract;
mod llm_client;
mod models;
mod normalize;
mod pipeline;
mod render;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::normalize::Normalizer;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting CV anonymizer API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize the normalizer. A missing credential is not an error: the
    // deterministic fallback extractor takes over.
    let llm = config.anthropic_api_key.clone().map(LlmClient::new);
    let normalizer = Arc::new(Normalizer::new(llm));
    if normalizer.has_model() {
        info!("LLM client initialized (model: {})", llm_client::MODEL);
    } else {
        info!("no LLM credential configured — heuristic extraction only");
    }

    // Build app state
    let state = AppState {
        config: config.clone(),
        normalizer,
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
