use std::sync::Arc;

use crate::config::settings::AppConfig;
use crate::infrastructure::events::bus::EventBus;
use crate::infrastructure::storage::s3::StorageService;
use crate::modules::content::cache::CatalogCache;
use crate::modules::content::memory::MemoryContentStore;
use crate::modules::content::store::ContentStore;
use crate::modules::popularity::service::RankSynchronizer;

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub store: Arc<dyn ContentStore>,
    pub events: EventBus,
    pub cache: Option<CatalogCache>,
    pub media: Option<StorageService>,
    pub ranking: Arc<RankSynchronizer>,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        store: Arc<dyn ContentStore>,
        cache: Option<CatalogCache>,
        media: Option<StorageService>,
    ) -> Self {
        let events = EventBus::new();
        let ranking = Arc::new(RankSynchronizer::new(store.clone(), events.clone()));

        Self {
            config,
            store,
            events,
            cache,
            media,
            ranking,
        }
    }

    /// Default config over the given store, without cache or media.
    pub fn with_store(store: Arc<dyn ContentStore>) -> Self {
        Self::new(AppConfig::default(), store, None, None)
    }

    pub fn in_memory() -> Self {
        Self::with_store(Arc::new(MemoryContentStore::new()))
    }
}
