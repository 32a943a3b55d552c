mod config;
mod errors;
mod fixtures;
mod llm_client;
mod models;
mod routes;
mod screening;
mod sessions;
mod state;
mod storage;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::llm_client::ProviderClient;
use crate::routes::build_router;
use crate::sessions::SessionStore;
use crate::state::AppState;
use crate::storage::{build_uploader, CandidateStore};

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

    info!("Starting TalentScout API v{}", env!("CARGO_PKG_VERSION"));

    // Provider selection is fixed here for the life of the process
    let provider = ProviderClient::new(config.provider.clone())?;
    info!(
        "LLM provider: {} (model: {})",
        provider.selection(),
        provider.model()
    );

    let uploader = build_uploader(&config).await;
    let storage = CandidateStore::new(config.data_dir.clone(), uploader);
    info!(
        "Saving candidates to {} (blob upload {})",
        storage.data_dir().display(),
        if storage.upload_enabled() { "enabled" } else { "disabled" }
    );

    info!(
        "Sessions expire after {}s idle (max {})",
        config.session_idle_ttl.as_secs(),
        config.max_sessions
    );

    let state = AppState {
        provider: Arc::new(provider),
        sessions: SessionStore::new(config.session_idle_ttl, config.max_sessions),
        storage,
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
