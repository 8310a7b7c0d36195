use std::env;
use std::str::FromStr;

pub enum EnvKey {
    ServerPort,
    ContentStore,
    DatabaseUrl,
    RedisUrl,
    CatalogCacheTtl,
    MinioUrl,
    MinioBucket,
    MinioAccessKey,
    MinioSecretKey,
    MediaPublicUrl,
}

impl EnvKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            EnvKey::ServerPort => "APP_PORT",
            EnvKey::ContentStore => "CONTENT_STORE",
            EnvKey::DatabaseUrl => "DATABASE_URL",
            EnvKey::RedisUrl => "REDIS_URL",
            EnvKey::CatalogCacheTtl => "CATALOG_CACHE_TTL_SECS",
            EnvKey::MinioUrl => "MINIO_ENDPOINT",
            EnvKey::MinioBucket => "MINIO_BUCKET_MEDIA",
            EnvKey::MinioAccessKey => "AWS_ACCESS_KEY_ID",
            EnvKey::MinioSecretKey => "AWS_SECRET_ACCESS_KEY",
            EnvKey::MediaPublicUrl => "MEDIA_PUBLIC_URL",
        }
    }
}

pub fn get(key: EnvKey) -> Result<String, env::VarError> {
    env::var(key.as_str())
}

/// Unset and blank variables both read as `None`.
pub fn get_opt(key: EnvKey) -> Option<String> {
    env::var(key.as_str())
        .ok()
        .filter(|val| !val.trim().is_empty())
}

pub fn get_or(key: EnvKey, default: &str) -> String {
    env::var(key.as_str()).unwrap_or_else(|_| default.to_string())
}

pub fn get_parsed<T: FromStr>(key: EnvKey, default: T) -> T {
    match get(key) {
        Ok(val) => val.parse::<T>().unwrap_or(default),
        Err(_) => default,
    }
}
