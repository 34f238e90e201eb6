//! Codex Edge - Main entry point
//!
//! Serves the posts API:
//! - Loads posts from the directory-backed store on every request
//! - Routes requests through a fresh router per request
//! - Caches rendered responses in memory

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use codex_edge::cache::{CacheConfig, ResponseCache};
use codex_edge::cors::CorsPolicy;
use codex_edge::server::create_app;
use codex_edge::store::DirStore;
use codex_edge::{AppConfig, AppContext};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "info,codex_edge=debug".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Codex Edge");

    let config = AppConfig::from_env();
    tracing::info!("Configuration loaded: {:?}", config);

    let store = DirStore::new(&config.data_dir);
    tokio::fs::create_dir_all(store.root())
        .await
        .with_context(|| format!("Failed to create data directory {:?}", store.root()))?;

    let cache = ResponseCache::start(CacheConfig {
        ttl: Duration::from_secs(config.cache_ttl_secs),
        max_entries: config.cache_max_entries,
    });

    let ctx = AppContext::new(
        Arc::new(store),
        cache,
        CorsPolicy::new(config.cors_hosts.clone()),
    );
    let app = create_app(ctx, &config);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("Listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
