use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;
use super::dto::ContentPatch;
use super::model::{Content, ContentKind};

pub const DEFAULT_LIMIT: i64 = 24;
pub const MAX_LIMIT: i64 = 100;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Content store unavailable: {0}")]
    Unavailable(String),
}

/// Catalog shortcuts served by `GET /content?endpoint=`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Section {
    #[default]
    All,
    Popular,
    ComingSoon,
    Movies,
    Series,
    Originals,
}

impl Section {
    pub fn parse(endpoint: Option<&str>) -> Self {
        match endpoint.map(str::trim) {
            Some("popular") => Section::Popular,
            Some("coming-soon") => Section::ComingSoon,
            Some("movies") => Section::Movies,
            Some("series") => Section::Series,
            Some("originals") => Section::Originals,
            _ => Section::All,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Section::All => "all",
            Section::Popular => "popular",
            Section::ComingSoon => "coming-soon",
            Section::Movies => "movies",
            Section::Series => "series",
            Section::Originals => "originals",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct CatalogQuery {
    pub section: Section,
    /// Case-insensitive exact match. Only applied to `Section::All`.
    pub genre: Option<String>,
    /// Only applied to `Section::All`.
    pub kind: Option<ContentKind>,
    /// `None` means unbounded (admin views).
    pub limit: Option<i64>,
    pub include_drafts: bool,
}

impl CatalogQuery {
    pub fn section(section: Section) -> Self {
        Self {
            section,
            limit: Some(DEFAULT_LIMIT),
            ..Self::default()
        }
    }

    /// Every popular record regardless of status, ascending rank.
    pub fn admin_popular() -> Self {
        Self {
            section: Section::Popular,
            include_drafts: true,
            ..Self::default()
        }
    }

    pub fn admin_all() -> Self {
        Self {
            include_drafts: true,
            ..Self::default()
        }
    }

    pub fn with_limit(mut self, limit: Option<i64>) -> Self {
        self.limit = Some(limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT));
        self
    }

    /// Stable identifier used as a cache key component.
    pub fn cache_key(&self) -> String {
        format!(
            "{}:{}:{}:{}:{}",
            self.section.as_str(),
            self.genre.as_deref().map(str::to_lowercase).unwrap_or_default(),
            self.kind.map(|k| k.as_str()).unwrap_or(""),
            self.limit.map(|l| l.to_string()).unwrap_or_default(),
            self.include_drafts,
        )
    }
}

/// The persistence collaborator behind the catalog, the ranking synchronizer,
/// and the admin CMS.
///
/// Contract for `Section::Popular`: results are sorted by ascending
/// `popularity_rank`. Callers rely on that order and never re-sort.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContentStore: Send + Sync {
    async fn list(&self, query: &CatalogQuery) -> Result<Vec<Content>, StoreError>;

    async fn find(&self, id: Uuid) -> Result<Option<Content>, StoreError>;

    async fn create(&self, content: Content) -> Result<Content, StoreError>;

    /// Returns the updated record, or `None` when no record has this id.
    async fn patch(&self, id: Uuid, patch: &ContentPatch) -> Result<Option<Content>, StoreError>;

    /// Returns the removed record, or `None` when no record has this id.
    async fn delete(&self, id: Uuid) -> Result<Option<Content>, StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_endpoint_falls_back_to_generic_listing() {
        assert_eq!(Section::parse(Some("coming-soon")), Section::ComingSoon);
        assert_eq!(Section::parse(Some("trending")), Section::All);
        assert_eq!(Section::parse(None), Section::All);
    }

    #[test]
    fn limit_is_defaulted_and_capped() {
        assert_eq!(CatalogQuery::default().with_limit(None).limit, Some(24));
        assert_eq!(CatalogQuery::default().with_limit(Some(500)).limit, Some(100));
        assert_eq!(CatalogQuery::default().with_limit(Some(0)).limit, Some(1));
    }
}
