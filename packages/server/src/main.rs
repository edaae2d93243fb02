use std::net::SocketAddr;

use anyhow::Context;
use common::storage::build_image_store;
use tracing::{Level, error, info};

use registrar_server::config::AppConfig;
use registrar_server::database::init_db;
use registrar_server::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();

    let config = AppConfig::load().context("Failed to load configuration")?;

    let images = build_image_store(&config.storage)
        .await
        .context("Failed to initialize image storage")?;
    info!(backend = ?config.storage.backend, "Image storage ready");

    let db = init_db(&config.database)
        .await
        .context("Failed to initialize database")?;

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("Invalid server.host or server.port")?;

    let app = registrar_server::build_router(AppState { db, images, config });

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Server running at http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
    }
}
