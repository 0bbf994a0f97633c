use std::sync::Arc;

use anyhow::Context;
use tracing::{Level, error, info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use song_service::app;
use song_service::db::{Database, SharedStore};
use song_service::secrets::SecretManager;
use song_service::seed;

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
    }
    info!("Shutting down");
}

async fn run() -> anyhow::Result<()> {
    let secrets = SecretManager::from_env().context("Invalid configuration")?;

    info!("The value of MONGODB_SERVICE is: {}", secrets.mongodb_service());
    if let Some(port) = secrets.mongodb_port() {
        info!("MONGODB_PORT={} is set but not used for the connection", port);
    }
    info!("Connecting to url: {}", secrets.redacted_mongodb_url());

    let database = Database::new(&secrets.mongodb_url())
        .await
        .context("Invalid MongoDB connection settings")?;
    database
        .ping()
        .await
        .context("Failed to reach MongoDB (check host and credentials)")?;
    info!("📊 Connected to MongoDB");

    let store: SharedStore = Arc::new(database);
    seed::reseed(store.as_ref())
        .await
        .context("Failed to load seed songs")?;

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", secrets.port()))
        .await
        .with_context(|| format!("Failed to bind port {}", secrets.port()))?;
    info!("🎧 Song service listening on {}", listener.local_addr()?);

    axum::serve(listener, app(store))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

#[tokio::main]
async fn main() {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(Level::DEBUG.into()))
        .with_target(false)
        .init();

    if let Err(e) = run().await {
        error!("❌ {:#}", e);
        std::process::exit(1);
    }
}
