mod changes;
mod config;
mod errors;
mod llm_client;
mod models;
mod routes;
mod state;
mod tailoring;
mod workspace;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::state::AppState;
use crate::tailoring::service::LlmTailoringService;
use crate::workspace::WorkspaceStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting tailor v{}", env!("CARGO_PKG_VERSION"));

    // Initialize LLM client
    let mut llm = LlmClient::new(config.anthropic_api_key.clone())?;
    if let Some(url) = &config.anthropic_api_url {
        llm = llm.with_api_url(url);
        info!("LLM endpoint overridden: {url}");
    }
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    let state = AppState {
        config: config.clone(),
        tailor: Arc::new(LlmTailoringService::new(llm)),
        workspaces: Arc::new(WorkspaceStore::new()),
    };
    info!(
        "Tailoring backend ready (default max new bullets: {})",
        config.max_new_bullets
    );

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the editor host is fixed

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
