use axum::http::StatusCode;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;
use super::dto::HeroArtRequest;
use crate::modules::content::model::Content;
use crate::modules::content::store::StoreError;
use crate::modules::media::service::MediaService;
use crate::state::AppState;

#[derive(Debug, Error)]
pub enum HeroError {
    #[error("Content {0} not found")]
    NotFound(Uuid),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl HeroError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            HeroError::NotFound(_) => StatusCode::NOT_FOUND,
            HeroError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Stored images a hero update leaves orphaned: a previous publicId whose
/// field was sent with a different value.
pub fn replaced_images(current: &Content, req: &HeroArtRequest) -> Vec<String> {
    [
        (&current.hero_bg_public_id, &req.hero_bg_public_id),
        (&current.hero_character_public_id, &req.hero_character_public_id),
        (&current.hero_title_public_id, &req.hero_title_public_id),
    ]
    .into_iter()
    .filter_map(|(old, new)| match (old, new) {
        (Some(old), Some(new)) if new.as_ref() != Some(old) => Some(old.clone()),
        _ => None,
    })
    .collect()
}

pub struct HeroService;

impl HeroService {
    pub async fn save(state: AppState, id: Uuid, req: HeroArtRequest) -> Result<Content, HeroError> {
        let current = state.store.find(id).await?.ok_or(HeroError::NotFound(id))?;

        let updated = state
            .store
            .patch(id, &req.to_patch())
            .await?
            .ok_or(HeroError::NotFound(id))?;
        info!(%id, "Hero art saved");

        for public_id in replaced_images(&current, &req) {
            MediaService::delete_quietly(&state, &public_id).await;
        }

        state.events.content_changed();
        Ok(updated)
    }
}
