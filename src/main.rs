use std::sync::Arc;

use anyhow::Context;
use dotenvy::dotenv;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use viemo::app;
use viemo::config::settings::{AppConfig, StoreBackend};
use viemo::infrastructure::db::pool::{connect_to_db, run_migrations};
use viemo::infrastructure::redis::client::RedisService;
use viemo::infrastructure::storage::s3::StorageService;
use viemo::modules::content::cache::CatalogCache;
use viemo::modules::content::memory::MemoryContentStore;
use viemo::modules::content::repository::ContentRepository;
use viemo::modules::content::store::ContentStore;
use viemo::state::AppState;
use viemo::workers::cache_invalidator::start_cache_invalidator;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("viemo=info,tower_http=info")),
        )
        .init();

    info!("Starting server...");

    let config = AppConfig::new().context("Invalid configuration")?;

    let store: Arc<dyn ContentStore> = match config.store_backend {
        StoreBackend::Postgres => {
            let url = config
                .database_url
                .as_deref()
                .context("DATABASE_URL is not set")?;
            let pool = connect_to_db(url).await.context("Failed to connect to PostgreSQL")?;
            run_migrations(&pool).await.context("Failed to run migrations")?;
            Arc::new(ContentRepository::new(pool))
        }
        StoreBackend::Memory => {
            info!("Using in-memory content store");
            Arc::new(MemoryContentStore::new())
        }
    };

    let cache = match config.redis_url.as_deref() {
        Some(url) => {
            let redis = RedisService::new(url).await.context("Failed to connect to Redis")?;
            Some(CatalogCache::new(redis, config.catalog_cache_ttl_secs))
        }
        None => None,
    };

    let media = config.media.as_ref().map(StorageService::new);
    if media.is_none() {
        info!("Media storage not configured, upload endpoints disabled");
    }

    let port = config.server_port;
    let state = AppState::new(config, store, cache, media);

    if let Some(cache) = state.cache.clone() {
        tokio::spawn(start_cache_invalidator(state.events.clone(), cache));
    }

    let app = app::create_app(state).await;

    let addr = format!("0.0.0.0:{port}");
    let listener = TcpListener::bind(&addr).await?;
    info!("Server running on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    info!("Shutting down");
}
