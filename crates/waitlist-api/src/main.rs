//! # waitlist-api: Binary Entry Point
//!
//! Starts the Axum HTTP server. Backend selection, first match wins:
//! `DATABASE_URL`, then `SUPABASE_URL`, then the in-memory store.

use std::sync::Arc;

use tracing_subscriber::EnvFilter;
use waitlist_api::state::{AppConfig, AppState};
use waitlist_store::{MemoryStore, RestStore, StoreConfig, WaitlistStore};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var("WAITLIST_LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

async fn select_store() -> Result<Arc<dyn WaitlistStore>, Box<dyn std::error::Error>> {
    if let Some(pool) = waitlist_api::db::init_pool().await.map_err(|e| {
        tracing::error!("Database initialization failed: {e}");
        e
    })? {
        return Ok(Arc::new(waitlist_api::db::PgStore::new(pool)));
    }

    if let Some(config) = StoreConfig::from_env().map_err(|e| {
        tracing::error!("Store configuration invalid: {e}");
        e
    })? {
        tracing::info!(?config, "Using hosted REST table");
        return Ok(Arc::new(RestStore::new(config)?));
    }

    tracing::warn!(
        "Neither DATABASE_URL nor SUPABASE_URL is set. Running on the in-memory store; \
         entries will not survive restarts."
    );
    Ok(Arc::new(MemoryStore::new()))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let config = AppConfig::from_env();
    let port = config.port;
    let store = select_store().await?;
    tracing::info!(backend = store.backend(), "Waitlist store ready");

    let state = AppState::new(store, config)?;
    let app = waitlist_api::app(state);

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Waitlist API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
