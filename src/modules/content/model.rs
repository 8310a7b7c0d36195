use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;
use utoipa::ToSchema;

pub const DEFAULT_AGE_RATING: &str = "13+";
pub const ORIGINAL_TAG: &str = "original";

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Movie,
    Series,
}

impl ContentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentKind::Movie => "movie",
            ContentKind::Series => "series",
        }
    }
}

impl From<String> for ContentKind {
    fn from(s: String) -> Self {
        match s.as_str() {
            "series" => ContentKind::Series,
            _ => ContentKind::Movie,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ContentStatus {
    Draft,
    #[default]
    Published,
}

impl ContentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentStatus::Draft => "draft",
            ContentStatus::Published => "published",
        }
    }
}

impl From<String> for ContentStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "draft" => ContentStatus::Draft,
            _ => ContentStatus::Published,
        }
    }
}

/// A catalog record: one movie or one series.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Content {
    pub id: Uuid,
    #[serde(rename = "type")]
    #[sqlx(try_from = "String")]
    pub kind: ContentKind,
    pub title: String,
    pub description: Option<String>,
    pub poster: Option<String>,
    pub public_id: Option<String>,
    pub landscape_poster: Option<String>,
    pub landscape_public_id: Option<String>,
    pub year: Option<i32>,
    pub genre: Option<String>,
    pub rating: Option<f64>,
    pub duration: Option<String>,
    pub episodes: Option<i32>,
    pub country: Option<String>,
    pub age_rating: String,
    #[serde(default, with = "time::serde::rfc3339::option")]
    #[schema(value_type = Option<String>, format = DateTime)]
    pub release_date: Option<OffsetDateTime>,
    pub cast: Vec<String>,
    pub tags: Vec<String>,
    pub is_popular: bool,
    pub popularity_rank: Option<i32>,
    pub hero_bg: Option<String>,
    pub hero_bg_public_id: Option<String>,
    pub hero_character: Option<String>,
    pub hero_character_public_id: Option<String>,
    pub hero_title: Option<String>,
    pub hero_title_public_id: Option<String>,
    #[sqlx(try_from = "String")]
    pub status: ContentStatus,
    #[serde(with = "time::serde::rfc3339")]
    #[schema(value_type = String, format = DateTime)]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    #[schema(value_type = String, format = DateTime)]
    pub updated_at: OffsetDateTime,
}

impl Content {
    /// A fresh published record with every optional field empty.
    pub fn new(kind: ContentKind, title: impl Into<String>) -> Self {
        let now = OffsetDateTime::now_utc();
        Self {
            id: Uuid::new_v4(),
            kind,
            title: title.into(),
            description: None,
            poster: None,
            public_id: None,
            landscape_poster: None,
            landscape_public_id: None,
            year: None,
            genre: None,
            rating: None,
            duration: None,
            episodes: None,
            country: None,
            age_rating: DEFAULT_AGE_RATING.to_string(),
            release_date: None,
            cast: Vec::new(),
            tags: Vec::new(),
            is_popular: false,
            popularity_rank: None,
            hero_bg: None,
            hero_bg_public_id: None,
            hero_character: None,
            hero_character_public_id: None,
            hero_title: None,
            hero_title_public_id: None,
            status: ContentStatus::Published,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_genre(mut self, genre: impl Into<String>) -> Self {
        self.genre = Some(genre.into());
        self
    }

    pub fn is_published(&self) -> bool {
        self.status == ContentStatus::Published
    }

    pub fn is_original(&self) -> bool {
        self.tags.iter().any(|t| t.eq_ignore_ascii_case(ORIGINAL_TAG))
    }

    pub fn is_upcoming(&self, now: OffsetDateTime) -> bool {
        self.release_date.is_some_and(|date| date > now)
    }

    /// Storage ids of the poster images attached to this record.
    pub fn poster_public_ids(&self) -> impl Iterator<Item = &str> {
        [self.public_id.as_deref(), self.landscape_public_id.as_deref()]
            .into_iter()
            .flatten()
    }
}

/// The admin ranking view of a popular record.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PopularItem {
    pub id: Uuid,
    pub title: String,
    pub rank: Option<i32>,
    pub is_popular: bool,
    #[serde(rename = "type")]
    pub kind: ContentKind,
    pub year: Option<i32>,
    pub poster: Option<String>,
    pub status: ContentStatus,
}

impl From<Content> for PopularItem {
    fn from(c: Content) -> Self {
        Self {
            id: c.id,
            title: c.title,
            rank: c.popularity_rank,
            is_popular: c.is_popular,
            kind: c.kind,
            year: c.year,
            poster: c.poster,
            status: c.status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn serializes_with_camel_case_wire_names() {
        let mut content = Content::new(ContentKind::Series, "Moon Garden").with_genre("Fantasy");
        content.is_popular = true;
        content.popularity_rank = Some(2);

        let json = serde_json::to_value(&content).unwrap();
        assert_eq!(json["type"], "series");
        assert_eq!(json["isPopular"], true);
        assert_eq!(json["popularityRank"], 2);
        assert_eq!(json["ageRating"], "13+");
        assert_eq!(json["status"], "published");
    }

    #[test]
    fn upcoming_only_when_release_is_in_the_future() {
        let now = datetime!(2025-06-01 00:00 UTC);
        let mut content = Content::new(ContentKind::Movie, "Later");
        assert!(!content.is_upcoming(now));

        content.release_date = Some(datetime!(2025-07-01 00:00 UTC));
        assert!(content.is_upcoming(now));

        content.release_date = Some(datetime!(2025-01-01 00:00 UTC));
        assert!(!content.is_upcoming(now));
    }

    #[test]
    fn original_tag_is_case_insensitive() {
        let mut content = Content::new(ContentKind::Movie, "Ours");
        content.tags = vec!["Original".into()];
        assert!(content.is_original());
    }

    #[test]
    fn unknown_status_strings_fall_back_to_published() {
        assert_eq!(ContentStatus::from("draft".to_string()), ContentStatus::Draft);
        assert_eq!(ContentStatus::from("archived".to_string()), ContentStatus::Published);
        assert_eq!(ContentKind::from("series".to_string()), ContentKind::Series);
    }
}
