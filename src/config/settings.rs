use serde::Deserialize;
use thiserror::Error;
use crate::config::env::{self, EnvKey};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set when CONTENT_STORE=postgres")]
    Missing(&'static str),

    #[error("unknown CONTENT_STORE backend `{0}` (expected `postgres` or `memory`)")]
    UnknownBackend(String),
}

#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Postgres,
    Memory,
}

impl std::str::FromStr for StoreBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "pg" => Ok(StoreBackend::Postgres),
            "memory" | "mem" => Ok(StoreBackend::Memory),
            other => Err(ConfigError::UnknownBackend(other.to_string())),
        }
    }
}

/// S3/MinIO settings. Media endpoints are disabled when absent.
#[derive(Clone, Debug, Deserialize)]
pub struct MediaConfig {
    pub endpoint: String,
    pub bucket: String,
    pub access_key: String,
    pub secret_key: String,
    pub public_url: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct AppConfig {
    pub server_port: u16,
    pub store_backend: StoreBackend,
    pub database_url: Option<String>,
    pub redis_url: Option<String>,
    pub catalog_cache_ttl_secs: u64,
    pub media: Option<MediaConfig>,
}

impl AppConfig {
    pub fn new() -> Result<Self, ConfigError> {
        let store_backend = env::get_or(EnvKey::ContentStore, "postgres").parse()?;
        let database_url = env::get_opt(EnvKey::DatabaseUrl);

        if store_backend == StoreBackend::Postgres && database_url.is_none() {
            return Err(ConfigError::Missing(EnvKey::DatabaseUrl.as_str()));
        }

        Ok(Self {
            server_port: env::get_parsed(EnvKey::ServerPort, 3000),
            store_backend,
            database_url,
            redis_url: env::get_opt(EnvKey::RedisUrl),
            catalog_cache_ttl_secs: env::get_parsed(EnvKey::CatalogCacheTtl, 60),
            media: Self::media_from_env(),
        })
    }

    fn media_from_env() -> Option<MediaConfig> {
        let endpoint = env::get_opt(EnvKey::MinioUrl)?;
        let bucket = env::get_opt(EnvKey::MinioBucket)?;
        let public_url = env::get_opt(EnvKey::MediaPublicUrl)
            .unwrap_or_else(|| format!("{}/{}", endpoint.trim_end_matches('/'), bucket));

        Some(MediaConfig {
            access_key: env::get_opt(EnvKey::MinioAccessKey)?,
            secret_key: env::get_opt(EnvKey::MinioSecretKey)?,
            endpoint,
            bucket,
            public_url,
        })
    }
}

impl Default for AppConfig {
    /// In-memory store, no cache, no media. Used by tests and quick local runs.
    fn default() -> Self {
        Self {
            server_port: 3000,
            store_backend: StoreBackend::Memory,
            database_url: None,
            redis_url: None,
            catalog_cache_ttl_secs: 60,
            media: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_backend_names() {
        assert_eq!("postgres".parse::<StoreBackend>().unwrap(), StoreBackend::Postgres);
        assert_eq!(" Memory ".parse::<StoreBackend>().unwrap(), StoreBackend::Memory);
        assert!(matches!(
            "mongo".parse::<StoreBackend>(),
            Err(ConfigError::UnknownBackend(name)) if name == "mongo"
        ));
    }
}
