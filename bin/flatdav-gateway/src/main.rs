//! FlatDav Gateway
//!
//! Serves GET/PUT/DELETE/MOVE on a flat key namespace backed by S3.

use anyhow::Result;
use clap::Parser;
use flatdav_core::config::BackendConfig;
use flatdav_core::{DavHandler, MemoryStore, ObjectStore};
use flatdav_gateway::{AppState, args::Args, router};
use flatdav_s3::S3Store;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| args.log_level.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = args.into_config()?;

    info!("Starting FlatDav Gateway");
    info!("Backend: {}", config.backend.kind());

    let store: Arc<dyn ObjectStore> = match &config.backend {
        BackendConfig::S3(s3) => Arc::new(
            S3Store::new(s3)
                .map_err(|e| anyhow::anyhow!("Failed to set up S3 store: {}", e))?,
        ),
        BackendConfig::Memory => {
            warn!("Using in-memory store, contents are lost on shutdown");
            Arc::new(MemoryStore::new())
        }
    };

    let handler = DavHandler::new(config.auth.credential(), store);
    let state = Arc::new(AppState::new(handler, config.server.default_scheme.clone()));
    let app = router(state, &config.server);

    if config.server.base_path.is_empty() {
        info!("Serving keys at /{{key}}");
    } else {
        info!("Serving keys at {}/{{key}}", config.server.base_path);
    }
    info!("Max upload size: {} bytes", config.server.max_body_bytes);
    info!("Starting HTTP server on {}", config.server.listen);

    let listener = TcpListener::bind(config.server.listen).await?;

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
            info!("Shutting down...");
        })
        .await?;

    info!("Gateway shut down gracefully");

    Ok(())
}
