use tokio::sync::broadcast::error::RecvError;
use tracing::{info, warn};
use crate::infrastructure::events::bus::EventBus;
use crate::modules::content::cache::CatalogCache;

/// Bumps the catalog cache generation on every content change until the
/// event bus closes.
pub async fn start_cache_invalidator(events: EventBus, cache: CatalogCache) {
    let mut rx = events.subscribe();
    info!("🧹 Catalog cache invalidator listening");

    loop {
        match rx.recv().await {
            Ok(_) | Err(RecvError::Lagged(_)) => match cache.invalidate().await {
                Ok(generation) => info!(generation, "Catalog cache invalidated"),
                Err(e) => warn!(error = %e, "Catalog cache invalidation failed"),
            },
            Err(RecvError::Closed) => break,
        }
    }

    info!("Catalog cache invalidator stopped");
}
