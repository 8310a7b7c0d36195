use axum::http::StatusCode;
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;
use super::dto::UploadedImage;
use crate::common::upload::ImageForm;
use crate::infrastructure::storage::s3::StorageService;
use crate::state::AppState;

/// Every object this service writes lives under this prefix.
pub const KEY_PREFIX: &str = "viemo/";

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("Media storage is not configured")]
    Unconfigured,

    #[error("{0}")]
    Invalid(String),

    #[error("Storage request failed: {0}")]
    Storage(String),
}

impl MediaError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            MediaError::Unconfigured => StatusCode::SERVICE_UNAVAILABLE,
            MediaError::Invalid(_) => StatusCode::BAD_REQUEST,
            MediaError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub struct MediaService;

impl MediaService {
    fn storage(state: &AppState) -> Result<&StorageService, MediaError> {
        state.media.as_ref().ok_or(MediaError::Unconfigured)
    }

    pub fn object_key(form: &ImageForm) -> String {
        format!("{}{}/{}.{}", KEY_PREFIX, form.folder, Uuid::new_v4(), form.extension())
    }

    pub async fn upload(state: &AppState, form: ImageForm) -> Result<UploadedImage, MediaError> {
        let storage = Self::storage(state)?;
        let key = Self::object_key(&form);

        storage
            .put_object(&key, form.content_type.essence_str(), form.body)
            .await
            .map_err(|e| MediaError::Storage(e.to_string()))?;
        info!(key = %key, "Image uploaded");

        Ok(UploadedImage {
            url: storage.public_url(&key),
            public_id: key,
        })
    }

    pub async fn delete(state: &AppState, public_id: &str) -> Result<(), MediaError> {
        let storage = Self::storage(state)?;
        if !public_id.starts_with(KEY_PREFIX) || public_id.contains("..") {
            return Err(MediaError::Invalid(format!("Unknown publicId {public_id}")));
        }

        storage
            .delete_object(public_id)
            .await
            .map_err(|e| MediaError::Storage(e.to_string()))?;
        info!(key = %public_id, "Image deleted");
        Ok(())
    }

    /// Cleanup after the owning record changed. Failures are only logged and
    /// an unconfigured store is a no-op.
    pub async fn delete_quietly(state: &AppState, public_id: &str) {
        if state.media.is_none() || public_id.trim().is_empty() {
            return;
        }
        if let Err(e) = Self::delete(state, public_id).await {
            warn!(error = %e, key = %public_id, "Could not delete replaced image");
        }
    }
}
