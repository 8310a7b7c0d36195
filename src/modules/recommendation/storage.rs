use std::sync::Mutex;

use thiserror::Error;
use time::Duration;
use tower_cookies::cookie::SameSite;
use tower_cookies::{Cookie, Cookies};
use tracing::warn;
use url::form_urlencoded;
use uuid::Uuid;

use super::history::ViewHistory;

pub const HISTORY_KEY: &str = "viewHistory";
const MAX_COOKIE_BYTES: usize = 4096;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("history storage could not be read: {0}")]
    Read(String),

    #[error("history storage could not be written: {0}")]
    Write(String),

    #[error("history value is {0} bytes, over the storage limit")]
    TooLarge(usize),

    #[error("stored history is not valid JSON: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Client-side key/value slot holding the serialized view history.
pub trait HistoryStorage {
    fn read(&self) -> Result<Option<String>, StorageError>;
    fn write(&self, value: &str) -> Result<(), StorageError>;
}

/// Keeps the history in a long-lived browser cookie.
pub struct CookieStorage {
    cookies: Cookies,
}

impl CookieStorage {
    pub fn new(cookies: Cookies) -> Self {
        Self { cookies }
    }

    fn encode(value: &str) -> String {
        form_urlencoded::byte_serialize(value.as_bytes()).collect()
    }

    fn decode(raw: &str) -> String {
        // With no '=' present the whole input parses as one decoded key.
        form_urlencoded::parse(raw.as_bytes())
            .next()
            .map(|(key, _)| key.into_owned())
            .unwrap_or_default()
    }
}

impl HistoryStorage for CookieStorage {
    fn read(&self) -> Result<Option<String>, StorageError> {
        Ok(self
            .cookies
            .get(HISTORY_KEY)
            .map(|c| Self::decode(c.value()))
            .filter(|v| !v.is_empty()))
    }

    fn write(&self, value: &str) -> Result<(), StorageError> {
        let encoded = Self::encode(value);
        if encoded.len() > MAX_COOKIE_BYTES {
            return Err(StorageError::TooLarge(encoded.len()));
        }

        let cookie = Cookie::build((HISTORY_KEY, encoded))
            .path("/")
            .max_age(Duration::days(365))
            .same_site(SameSite::Lax)
            .http_only(true)
            .build();
        self.cookies.add(cookie);
        Ok(())
    }
}

/// In-process slot, used where there is no browser on the other end.
#[derive(Default)]
pub struct MemoryStorage {
    value: Mutex<Option<String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(value: impl Into<String>) -> Self {
        Self {
            value: Mutex::new(Some(value.into())),
        }
    }
}

impl HistoryStorage for MemoryStorage {
    fn read(&self) -> Result<Option<String>, StorageError> {
        self.value
            .lock()
            .map(|v| v.clone())
            .map_err(|e| StorageError::Read(e.to_string()))
    }

    fn write(&self, value: &str) -> Result<(), StorageError> {
        let mut slot = self
            .value
            .lock()
            .map_err(|e| StorageError::Write(e.to_string()))?;
        *slot = Some(value.to_string());
        Ok(())
    }
}

fn try_load(storage: &dyn HistoryStorage) -> Result<ViewHistory, StorageError> {
    match storage.read()? {
        Some(raw) => Ok(serde_json::from_str(&raw)?),
        None => Ok(ViewHistory::new()),
    }
}

/// Current history. Unreadable or corrupt storage reads as empty.
pub fn load_history(storage: &dyn HistoryStorage) -> ViewHistory {
    try_load(storage).unwrap_or_else(|e| {
        warn!(error = %e, "Ignoring unreadable view history");
        ViewHistory::new()
    })
}

/// Read-modify-write of the stored history. A failed write is logged and the
/// updated history is still returned.
pub fn record_view_in(
    storage: &dyn HistoryStorage,
    content_id: Uuid,
    genre: Option<String>,
) -> ViewHistory {
    let history = load_history(storage).record_view(content_id, genre);

    let saved = serde_json::to_string(&history)
        .map_err(StorageError::from)
        .and_then(|raw| storage.write(&raw));
    if let Err(e) = saved {
        warn!(error = %e, %content_id, "Could not save view history");
    }
    history
}
