use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;
use uuid::Uuid;
use super::model::{Content, ContentKind, ContentStatus};

// --- CREATE ---

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateContentRequest {
    #[serde(rename = "type")]
    pub kind: ContentKind,
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    pub description: Option<String>,
    pub poster: Option<String>,
    pub public_id: Option<String>,
    pub landscape_poster: Option<String>,
    pub landscape_public_id: Option<String>,
    #[validate(range(min = 1888, max = 2100, message = "Year must be between 1888 and 2100"))]
    pub year: Option<i32>,
    pub genre: Option<String>,
    #[validate(range(min = 0.0, max = 10.0, message = "Rating must be between 0 and 10"))]
    pub rating: Option<f64>,
    pub duration: Option<String>,
    #[validate(range(min = 0, message = "Episodes cannot be negative"))]
    pub episodes: Option<i32>,
    pub country: Option<String>,
    pub age_rating: Option<String>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    #[schema(value_type = Option<String>, format = DateTime)]
    pub release_date: Option<OffsetDateTime>,
    #[serde(default)]
    pub cast: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub status: Option<ContentStatus>,
}

impl CreateContentRequest {
    /// Builds the record to insert, applying the catalog defaults.
    /// Popularity is never set on create; use the popular toggle instead.
    pub fn into_content(self) -> Content {
        let mut content = Content::new(self.kind, self.title.trim());
        content.description = self.description;
        content.poster = self.poster;
        content.public_id = self.public_id;
        content.landscape_poster = self.landscape_poster;
        content.landscape_public_id = self.landscape_public_id;
        content.year = self.year;
        content.genre = self.genre.filter(|g| !g.trim().is_empty());
        content.rating = self.rating;
        content.duration = self.duration;
        content.episodes = self.episodes;
        content.country = self.country;
        if let Some(age_rating) = self.age_rating {
            content.age_rating = age_rating;
        }
        content.release_date = self.release_date;
        content.cast = self.cast;
        content.tags = self.tags;
        content.status = self.status.unwrap_or_default();
        content
    }
}

// --- PATCH ---

/// Partial update. Only these fields can be changed through PATCH; anything else
/// in the body is ignored. Nullable columns take `null` to clear them.
///
/// `isPopular` and `popularityRank` belong to the rank synchronizer; the admin
/// content PATCH refuses a body that sets them.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContentPatch {
    #[validate(length(min = 1, message = "Title cannot be empty"))]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "crate::common::nullable::deserialize")]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "crate::common::nullable::deserialize")]
    #[schema(value_type = Option<String>)]
    pub poster: Option<Option<String>>,
    #[serde(default, deserialize_with = "crate::common::nullable::deserialize")]
    #[schema(value_type = Option<String>)]
    pub public_id: Option<Option<String>>,
    #[serde(default, deserialize_with = "crate::common::nullable::deserialize")]
    #[schema(value_type = Option<String>)]
    pub landscape_poster: Option<Option<String>>,
    #[serde(default, deserialize_with = "crate::common::nullable::deserialize")]
    #[schema(value_type = Option<String>)]
    pub landscape_public_id: Option<Option<String>>,
    #[serde(default, deserialize_with = "crate::common::nullable::deserialize")]
    #[schema(value_type = Option<i32>)]
    pub year: Option<Option<i32>>,
    #[serde(default, deserialize_with = "crate::common::nullable::deserialize")]
    #[schema(value_type = Option<String>)]
    pub genre: Option<Option<String>>,
    #[serde(default, deserialize_with = "crate::common::nullable::deserialize")]
    #[schema(value_type = Option<f64>)]
    pub rating: Option<Option<f64>>,
    #[serde(default, deserialize_with = "crate::common::nullable::deserialize")]
    #[schema(value_type = Option<String>)]
    pub duration: Option<Option<String>>,
    #[serde(default, deserialize_with = "crate::common::nullable::deserialize")]
    #[schema(value_type = Option<i32>)]
    pub episodes: Option<Option<i32>>,
    #[serde(default, deserialize_with = "crate::common::nullable::deserialize")]
    #[schema(value_type = Option<String>)]
    pub country: Option<Option<String>>,
    pub age_rating: Option<String>,
    #[serde(default, deserialize_with = "deserialize_release_date")]
    #[schema(value_type = Option<String>, format = DateTime)]
    pub release_date: Option<Option<OffsetDateTime>>,
    pub cast: Option<Vec<String>>,
    pub tags: Option<Vec<String>>,
    pub is_popular: Option<bool>,
    #[serde(default, deserialize_with = "crate::common::nullable::deserialize")]
    #[schema(value_type = Option<i32>)]
    pub popularity_rank: Option<Option<i32>>,
    pub status: Option<ContentStatus>,
    #[serde(default, deserialize_with = "crate::common::nullable::deserialize")]
    #[schema(value_type = Option<String>)]
    pub hero_bg: Option<Option<String>>,
    #[serde(default, deserialize_with = "crate::common::nullable::deserialize")]
    #[schema(value_type = Option<String>)]
    pub hero_bg_public_id: Option<Option<String>>,
    #[serde(default, deserialize_with = "crate::common::nullable::deserialize")]
    #[schema(value_type = Option<String>)]
    pub hero_character: Option<Option<String>>,
    #[serde(default, deserialize_with = "crate::common::nullable::deserialize")]
    #[schema(value_type = Option<String>)]
    pub hero_character_public_id: Option<Option<String>>,
    #[serde(default, deserialize_with = "crate::common::nullable::deserialize")]
    #[schema(value_type = Option<String>)]
    pub hero_title: Option<Option<String>>,
    #[serde(default, deserialize_with = "crate::common::nullable::deserialize")]
    #[schema(value_type = Option<String>)]
    pub hero_title_public_id: Option<Option<String>>,
}

fn deserialize_release_date<'de, D>(deserializer: D) -> Result<Option<Option<OffsetDateTime>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    time::serde::rfc3339::option::deserialize(deserializer).map(Some)
}

impl ContentPatch {
    /// The update the rank synchronizer issues for one position.
    pub fn rank(rank: i32) -> Self {
        Self {
            is_popular: Some(true),
            popularity_rank: Some(Some(rank)),
            ..Self::default()
        }
    }

    pub fn clear_popularity() -> Self {
        Self {
            is_popular: Some(false),
            popularity_rank: Some(None),
            ..Self::default()
        }
    }

    pub fn touches_popularity(&self) -> bool {
        self.is_popular.is_some() || self.popularity_rank.is_some()
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Applies the patch in place. Shared by every store implementation that
    /// holds records in memory.
    pub fn apply_to(&self, content: &mut Content) {
        fn set<T: Clone>(target: &mut T, value: &Option<T>) {
            if let Some(v) = value {
                *target = v.clone();
            }
        }

        set(&mut content.title, &self.title);
        set(&mut content.description, &self.description);
        set(&mut content.poster, &self.poster);
        set(&mut content.public_id, &self.public_id);
        set(&mut content.landscape_poster, &self.landscape_poster);
        set(&mut content.landscape_public_id, &self.landscape_public_id);
        set(&mut content.year, &self.year);
        set(&mut content.genre, &self.genre);
        set(&mut content.rating, &self.rating);
        set(&mut content.duration, &self.duration);
        set(&mut content.episodes, &self.episodes);
        set(&mut content.country, &self.country);
        set(&mut content.age_rating, &self.age_rating);
        set(&mut content.release_date, &self.release_date);
        set(&mut content.cast, &self.cast);
        set(&mut content.tags, &self.tags);
        set(&mut content.is_popular, &self.is_popular);
        set(&mut content.popularity_rank, &self.popularity_rank);
        set(&mut content.status, &self.status);
        set(&mut content.hero_bg, &self.hero_bg);
        set(&mut content.hero_bg_public_id, &self.hero_bg_public_id);
        set(&mut content.hero_character, &self.hero_character);
        set(&mut content.hero_character_public_id, &self.hero_character_public_id);
        set(&mut content.hero_title, &self.hero_title);
        set(&mut content.hero_title_public_id, &self.hero_title_public_id);
        content.updated_at = OffsetDateTime::now_utc();
    }
}

// --- QUERIES ---

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CatalogParams {
    /// popular | coming-soon | movies | series | originals
    pub endpoint: Option<String>,
    pub genre: Option<String>,
    #[serde(rename = "type")]
    #[param(value_type = Option<String>)]
    pub kind: Option<ContentKind>,
    pub limit: Option<i64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AdminSort {
    #[default]
    Newest,
    Rating,
    Year,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct AdminListParams {
    #[param(value_type = Option<String>)]
    pub sort: Option<AdminSort>,
    #[serde(default)]
    pub popular_only: bool,
}

// --- RESPONSES ---

#[derive(Debug, Serialize, ToSchema)]
pub struct ContentDetailResponse {
    #[serde(flatten)]
    pub content: Content,
    pub similar: Vec<Content>,
}

#[derive(Debug, Serialize, PartialEq, Eq, ToSchema)]
pub struct CatalogStats {
    pub total: usize,
    pub movies: usize,
    pub series: usize,
    pub originals: usize,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TogglePopularRequest {
    pub is_popular: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DeletedResponse {
    pub id: Uuid,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patch_ignores_unknown_fields_and_keeps_nulls() {
        let patch: ContentPatch = serde_json::from_str(
            r#"{"isPopular": false, "popularityRank": null, "createdAt": "nope", "_id": "x"}"#,
        )
        .unwrap();

        assert_eq!(patch, ContentPatch::clear_popularity());
        assert!(patch.touches_popularity());
    }

    #[test]
    fn apply_only_touches_present_fields() {
        let mut content = Content::new(ContentKind::Movie, "Before").with_genre("Drama");
        content.is_popular = true;
        content.popularity_rank = Some(3);

        let patch: ContentPatch =
            serde_json::from_str(r#"{"title": "After", "genre": null}"#).unwrap();
        patch.apply_to(&mut content);

        assert_eq!(content.title, "After");
        assert_eq!(content.genre, None);
        assert!(content.is_popular);
        assert_eq!(content.popularity_rank, Some(3));
        assert!(!patch.touches_popularity());
    }

    #[test]
    fn create_defaults_to_published_and_not_popular() {
        let req: CreateContentRequest =
            serde_json::from_str(r#"{"type": "series", "title": "  Tides  ", "episodes": 8}"#).unwrap();
        assert!(req.validate().is_ok());

        let content = req.into_content();
        assert_eq!(content.title, "Tides");
        assert_eq!(content.status, ContentStatus::Published);
        assert!(!content.is_popular);
        assert_eq!(content.popularity_rank, None);
        assert_eq!(content.age_rating, "13+");
    }

    #[test]
    fn create_rejects_out_of_range_rating() {
        let req: CreateContentRequest =
            serde_json::from_str(r#"{"type": "movie", "title": "Loud", "rating": 11.5}"#).unwrap();
        assert!(req.validate().is_err());
    }
}
