use anyhow::Context;
use dotenvy::dotenv;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::common::download::Downloader;
use crate::config::settings::AppConfig;
use crate::infrastructure::processor::facefusion::FaceFusionCli;
use crate::infrastructure::speech::replicate::ReplicateClient;
use crate::infrastructure::storage::s3::StorageService;
use crate::state::AppState;

mod app;
mod common;
mod config;
mod docs;
mod infrastructure;
mod modules;
mod routes;
mod state;
#[cfg(test)]
mod test_support;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("media_gateway=info,tower_http=info")),
        )
        .init();

    info!("Starting server...");

    let config = AppConfig::new().context("Missing required configuration")?;

    std::fs::create_dir_all(&config.download_dir)
        .with_context(|| format!("Cannot create {}", config.download_dir.display()))?;

    let http = reqwest::Client::builder()
        .user_agent(concat!("media-gateway/", env!("CARGO_PKG_VERSION")))
        .build()
        .context("Failed to build HTTP client")?;

    let shutdown = CancellationToken::new();
    let state = AppState::new(
        config.clone(),
        Downloader::new(http.clone()),
        Arc::new(FaceFusionCli::from_config(&config.facefusion)),
        Arc::new(StorageService::new(&config.storage)),
        Arc::new(ReplicateClient::new(http, &config.speech)),
        shutdown.clone(),
    );

    let app = app::create_app(state);

    let addr = format!("0.0.0.0:{}", config.server_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Server running on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutting down, cancelling in-flight jobs");
            shutdown.cancel();
        })
        .await?;

    Ok(())
}
