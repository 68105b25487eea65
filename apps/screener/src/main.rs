mod config;
mod errors;
mod llm_client;
mod models;
mod routes;
mod screening;
mod sessions;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::llm_client::{CompletionService, LlmClient};
use crate::routes::build_router;
use crate::sessions::SessionStore;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Resume Screener v{}", env!("CARGO_PKG_VERSION"));

    tokio::fs::create_dir_all(&config.export_dir)
        .await
        .with_context(|| {
            format!(
                "Could not create export directory {}",
                config.export_dir.display()
            )
        })?;
    info!("CSV exports go to {}", config.export_dir.display());

    // Without a key the server still runs; analysis answers with a configuration error
    let llm: Option<Arc<dyn CompletionService>> = match &config.anthropic_api_key {
        Some(key) => {
            let client: Arc<dyn CompletionService> = Arc::new(LlmClient::new(key.clone())?);
            info!("LLM client initialized (model: {})", llm_client::MODEL);
            Some(client)
        }
        None => {
            warn!("ANTHROPIC_API_KEY is not set; analysis requests will be refused");
            None
        }
    };

    let state = AppState {
        llm,
        config: config.clone(),
        sessions: SessionStore::new(config.session_idle_ttl()),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
