use axum::http::StatusCode;
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;
use super::dto::{
    AdminListParams, AdminSort, CatalogParams, CatalogStats, ContentDetailResponse, ContentPatch,
    CreateContentRequest,
};
use super::model::{Content, ContentKind};
use super::store::{CatalogQuery, Section, StoreError};
use crate::common::response::validation_message;
use crate::modules::media::service::MediaService;
use crate::state::AppState;

pub const SIMILAR_LIMIT: usize = 6;

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("Content {0} not found")]
    NotFound(Uuid),

    #[error("{0}")]
    Invalid(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ContentError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ContentError::NotFound(_) => StatusCode::NOT_FOUND,
            ContentError::Invalid(_) => StatusCode::BAD_REQUEST,
            ContentError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub struct ContentService;

impl ContentService {
    pub fn catalog_query(params: &CatalogParams) -> CatalogQuery {
        let section = Section::parse(params.endpoint.as_deref());
        let query = CatalogQuery {
            section,
            genre: params.genre.clone().filter(|g| !g.trim().is_empty()),
            kind: params.kind,
            ..CatalogQuery::default()
        };
        query.with_limit(params.limit)
    }

    /// Public listing. Served from the catalog cache when one is configured.
    pub async fn list_catalog(state: AppState, query: CatalogQuery) -> Result<Vec<Content>, ContentError> {
        if let Some(cache) = &state.cache {
            if let Some(hit) = cache.get(&query).await {
                return Ok(hit);
            }
        }

        let items = state.store.list(&query).await?;

        if let Some(cache) = &state.cache {
            cache.put(&query, &items).await;
        }
        Ok(items)
    }

    pub async fn get_detail(state: AppState, id: Uuid) -> Result<ContentDetailResponse, ContentError> {
        let content = state
            .store
            .find(id)
            .await?
            .ok_or(ContentError::NotFound(id))?;

        let similar = match &content.genre {
            Some(genre) => {
                let query = CatalogQuery {
                    genre: Some(genre.clone()),
                    limit: Some(SIMILAR_LIMIT as i64 + 1),
                    ..CatalogQuery::default()
                };
                state
                    .store
                    .list(&query)
                    .await?
                    .into_iter()
                    .filter(|c| c.id != content.id)
                    .take(SIMILAR_LIMIT)
                    .collect()
            }
            None => Vec::new(),
        };

        Ok(ContentDetailResponse { content, similar })
    }

    pub async fn admin_list(state: AppState, params: AdminListParams) -> Result<Vec<Content>, ContentError> {
        if params.popular_only {
            return Ok(state.store.list(&CatalogQuery::admin_popular()).await?);
        }

        let mut items = state.store.list(&CatalogQuery::admin_all()).await?;
        Self::sort_admin(&mut items, params.sort.unwrap_or_default());
        Ok(items)
    }

    fn sort_admin(items: &mut [Content], sort: AdminSort) {
        match sort {
            AdminSort::Newest => items.sort_by(|a, b| b.updated_at.cmp(&a.updated_at)),
            AdminSort::Rating => items.sort_by(|a, b| {
                b.rating.unwrap_or(0.0).total_cmp(&a.rating.unwrap_or(0.0))
            }),
            AdminSort::Year => items.sort_by(|a, b| b.year.unwrap_or(0).cmp(&a.year.unwrap_or(0))),
        }
    }

    pub async fn stats(state: AppState) -> Result<CatalogStats, ContentError> {
        let items = state.store.list(&CatalogQuery::admin_all()).await?;
        Ok(Self::count(&items))
    }

    fn count(items: &[Content]) -> CatalogStats {
        CatalogStats {
            total: items.len(),
            movies: items.iter().filter(|c| c.kind == ContentKind::Movie).count(),
            series: items.iter().filter(|c| c.kind == ContentKind::Series).count(),
            originals: items.iter().filter(|c| c.is_original()).count(),
        }
    }

    pub async fn create(state: AppState, req: CreateContentRequest) -> Result<Content, ContentError> {
        req.validate()
            .map_err(|e| ContentError::Invalid(validation_message(&e)))?;

        let content = state.store.create(req.into_content()).await?;
        info!(id = %content.id, title = %content.title, "Content created");

        state.events.content_changed();
        Ok(content)
    }

    pub async fn update(state: AppState, id: Uuid, patch: ContentPatch) -> Result<Content, ContentError> {
        patch
            .validate()
            .map_err(|e| ContentError::Invalid(validation_message(&e)))?;
        if patch.touches_popularity() {
            return Err(ContentError::Invalid(
                "isPopular and popularityRank are managed through the popularity endpoints".to_string(),
            ));
        }

        let content = state
            .store
            .patch(id, &patch)
            .await?
            .ok_or(ContentError::NotFound(id))?;

        state.events.content_changed();
        Ok(content)
    }

    /// Deletes the record, then makes a best-effort attempt to remove its posters
    /// from media storage. Deleting a popular record renumbers the rest.
    pub async fn delete(state: AppState, id: Uuid) -> Result<Content, ContentError> {
        let content = state
            .store
            .delete(id)
            .await?
            .ok_or(ContentError::NotFound(id))?;
        info!(id = %content.id, title = %content.title, "Content deleted");

        for public_id in content.poster_public_ids() {
            MediaService::delete_quietly(&state, public_id).await;
        }

        if content.is_popular {
            if let Err(e) = state.ranking.close_gaps().await {
                warn!(id = %content.id, error = %e, "Popular ranks left with a gap after delete");
            }
        }

        state.events.content_changed();
        Ok(content)
    }
}
