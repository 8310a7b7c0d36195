use redis::AsyncCommands;
use tracing::warn;
use crate::infrastructure::redis::client::RedisService;
use super::model::Content;
use super::store::CatalogQuery;

const GENERATION_KEY: &str = "catalog:generation";

/// Redis cache for public catalog listings.
///
/// Keys embed a generation counter; bumping it orphans every cached listing at
/// once and the TTL reclaims them. Failures are logged and read as a miss.
#[derive(Clone)]
pub struct CatalogCache {
    redis: RedisService,
    ttl_secs: u64,
}

impl CatalogCache {
    pub fn new(redis: RedisService, ttl_secs: u64) -> Self {
        Self { redis, ttl_secs }
    }

    fn key(generation: u64, query: &CatalogQuery) -> String {
        format!("catalog:{}:{}", generation, query.cache_key())
    }

    async fn current_key(&self, query: &CatalogQuery) -> Result<(redis::aio::MultiplexedConnection, String), redis::RedisError> {
        let mut conn = self.redis.get_conn().await?;
        let generation: Option<u64> = conn.get(GENERATION_KEY).await?;
        Ok((conn, Self::key(generation.unwrap_or(0), query)))
    }

    pub async fn get(&self, query: &CatalogQuery) -> Option<Vec<Content>> {
        let lookup = async {
            let (mut conn, key) = self.current_key(query).await?;
            let raw: Option<String> = conn.get(&key).await?;
            Ok::<_, redis::RedisError>(raw)
        };

        match lookup.await {
            Ok(Some(raw)) => match serde_json::from_str(&raw) {
                Ok(items) => Some(items),
                Err(e) => {
                    warn!(error = %e, "Discarding unreadable catalog cache entry");
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                warn!(error = %e, "Catalog cache read failed");
                None
            }
        }
    }

    pub async fn put(&self, query: &CatalogQuery, items: &[Content]) {
        let payload = match serde_json::to_string(items) {
            Ok(payload) => payload,
            Err(e) => {
                warn!(error = %e, "Could not serialize catalog listing for cache");
                return;
            }
        };

        let write = async {
            let (mut conn, key) = self.current_key(query).await?;
            let _: () = conn.set_ex(key, payload, self.ttl_secs).await?;
            Ok::<_, redis::RedisError>(())
        };

        if let Err(e) = write.await {
            warn!(error = %e, "Catalog cache write failed");
        }
    }

    /// Returns the new generation.
    pub async fn invalidate(&self) -> Result<u64, redis::RedisError> {
        let mut conn = self.redis.get_conn().await?;
        let generation: u64 = conn.incr(GENERATION_KEY, 1u64).await?;
        Ok(generation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::content::store::Section;

    #[test]
    fn keys_change_with_generation_and_query() {
        let popular = CatalogQuery::section(Section::Popular);
        let movies = CatalogQuery::section(Section::Movies);

        assert_eq!(CatalogCache::key(0, &popular), "catalog:0:popular:::24:false");
        assert_ne!(CatalogCache::key(1, &popular), CatalogCache::key(0, &popular));
        assert_ne!(CatalogCache::key(0, &movies), CatalogCache::key(0, &popular));
    }
}
