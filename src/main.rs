use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use bufete_api::config::{config, StoreKind};
use bufete_api::database::{DocumentStore, MemoryStore, PgStore};
use bufete_api::{app, bootstrap, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("bufete_api=info,tower_http=info")),
        )
        .init();

    let config = config();
    tracing::info!("Starting Bufete API in {:?} mode", config.environment);
    config.validate()?;

    let store: Arc<dyn DocumentStore> = match config.store {
        StoreKind::Postgres => {
            let store = PgStore::connect(&config.database)
                .await
                .context("failed to connect to PostgreSQL")?;
            store.ensure_schema().await.context("failed to prepare collections")?;
            Arc::new(store)
        }
        StoreKind::Memory => {
            tracing::warn!("Using the in-memory store; data is lost on restart");
            Arc::new(MemoryStore::new())
        }
    };

    let state = AppState::new(store, config.security.clone());
    bootstrap::seed(&state, &config.bootstrap).await.context("bootstrap failed")?;

    let bind_addr = format!("0.0.0.0:{}", config.api.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;
    tracing::info!("Bufete API listening on http://{}", bind_addr);

    axum::serve(listener, app(state)).await?;
    Ok(())
}
