use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use super::dto::ContentPatch;
use super::model::{Content, ContentKind};
use super::store::{CatalogQuery, ContentStore, Section, StoreError};

/// Process-local content store. Records keep insertion order, which stands in
/// for the natural order of the database when no sort applies.
#[derive(Clone, Default)]
pub struct MemoryContentStore {
    items: Arc<RwLock<Vec<Content>>>,
}

impl MemoryContentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_items(items: Vec<Content>) -> Self {
        Self {
            items: Arc::new(RwLock::new(items)),
        }
    }

    fn poisoned() -> StoreError {
        StoreError::Unavailable("memory store lock poisoned".to_string())
    }
}

pub(crate) fn matches(query: &CatalogQuery, content: &Content, now: OffsetDateTime) -> bool {
    if !query.include_drafts && !content.is_published() {
        return false;
    }

    match query.section {
        Section::Popular => content.is_popular,
        Section::ComingSoon => content.is_upcoming(now),
        Section::Movies => content.kind == ContentKind::Movie,
        Section::Series => content.kind == ContentKind::Series,
        Section::Originals => content.is_original(),
        Section::All => {
            let genre_ok = match (&query.genre, &content.genre) {
                (None, _) => true,
                (Some(wanted), Some(genre)) => wanted.eq_ignore_ascii_case(genre),
                (Some(_), None) => false,
            };
            let kind_ok = query.kind.is_none_or(|kind| kind == content.kind);
            genre_ok && kind_ok
        }
    }
}

pub(crate) fn order(query: &CatalogQuery, items: &mut [Content]) {
    match query.section {
        // Unranked popular records sort last, mirroring NULLS LAST in SQL.
        Section::Popular => items.sort_by_key(|c| (c.popularity_rank.is_none(), c.popularity_rank)),
        Section::ComingSoon => items.sort_by_key(|c| c.release_date),
        _ => {}
    }
}

#[async_trait]
impl ContentStore for MemoryContentStore {
    async fn list(&self, query: &CatalogQuery) -> Result<Vec<Content>, StoreError> {
        let now = OffsetDateTime::now_utc();
        let items = self.items.read().map_err(|_| Self::poisoned())?;

        let mut found: Vec<Content> = items
            .iter()
            .filter(|c| matches(query, c, now))
            .cloned()
            .collect();
        order(query, &mut found);

        if let Some(limit) = query.limit {
            found.truncate(limit.max(0) as usize);
        }
        Ok(found)
    }

    async fn find(&self, id: Uuid) -> Result<Option<Content>, StoreError> {
        let items = self.items.read().map_err(|_| Self::poisoned())?;
        Ok(items.iter().find(|c| c.id == id).cloned())
    }

    async fn create(&self, content: Content) -> Result<Content, StoreError> {
        let mut items = self.items.write().map_err(|_| Self::poisoned())?;
        items.push(content.clone());
        Ok(content)
    }

    async fn patch(&self, id: Uuid, patch: &ContentPatch) -> Result<Option<Content>, StoreError> {
        let mut items = self.items.write().map_err(|_| Self::poisoned())?;
        Ok(items.iter_mut().find(|c| c.id == id).map(|content| {
            patch.apply_to(content);
            content.clone()
        }))
    }

    async fn delete(&self, id: Uuid) -> Result<Option<Content>, StoreError> {
        let mut items = self.items.write().map_err(|_| Self::poisoned())?;
        Ok(items
            .iter()
            .position(|c| c.id == id)
            .map(|idx| items.remove(idx)))
    }
}
