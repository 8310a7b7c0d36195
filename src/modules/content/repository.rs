use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;
use super::dto::ContentPatch;
use super::model::Content;
use super::store::{CatalogQuery, ContentStore, Section, StoreError};

const CONTENT_COLUMNS: &str = r#"
    id, kind, title, description, poster, public_id, landscape_poster, landscape_public_id,
    year, genre, rating, duration, episodes, country, age_rating, release_date, cast_members AS "cast",
    tags, is_popular, popularity_rank, hero_bg, hero_bg_public_id, hero_character,
    hero_character_public_id, hero_title, hero_title_public_id, status, created_at, updated_at
"#;

/// PostgreSQL-backed content store.
#[derive(Clone)]
pub struct ContentRepository {
    pool: PgPool,
}

impl ContentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn push_filters(builder: &mut QueryBuilder<'_, Postgres>, query: &CatalogQuery) {
        builder.push(" WHERE TRUE");

        if !query.include_drafts {
            builder.push(" AND status = 'published'");
        }

        match query.section {
            Section::Popular => {
                builder.push(" AND is_popular");
            }
            Section::ComingSoon => {
                builder.push(" AND release_date > NOW()");
            }
            Section::Movies => {
                builder.push(" AND kind = 'movie'");
            }
            Section::Series => {
                builder.push(" AND kind = 'series'");
            }
            Section::Originals => {
                builder.push(" AND 'original' = ANY(SELECT LOWER(t) FROM UNNEST(tags) AS t)");
            }
            Section::All => {
                if let Some(genre) = &query.genre {
                    builder.push(" AND LOWER(genre) = LOWER(").push_bind(genre.clone()).push(")");
                }
                if let Some(kind) = query.kind {
                    builder.push(" AND kind = ").push_bind(kind.as_str());
                }
            }
        }

        match query.section {
            Section::Popular => builder.push(" ORDER BY popularity_rank ASC NULLS LAST, created_at ASC"),
            Section::ComingSoon => builder.push(" ORDER BY release_date ASC"),
            _ => builder.push(" ORDER BY created_at ASC"),
        };

        if let Some(limit) = query.limit {
            builder.push(" LIMIT ").push_bind(limit);
        }
    }

    fn push_set<'a, T>(
        builder: &mut QueryBuilder<'a, Postgres>,
        first: &mut bool,
        column: &str,
        value: T,
    ) where
        T: 'a + sqlx::Encode<'a, Postgres> + sqlx::Type<Postgres> + Send,
    {
        if !*first {
            builder.push(", ");
        }
        *first = false;
        builder.push(column).push(" = ").push_bind(value);
    }
}

#[async_trait]
impl ContentStore for ContentRepository {
    async fn list(&self, query: &CatalogQuery) -> Result<Vec<Content>, StoreError> {
        let mut builder = QueryBuilder::<Postgres>::new(format!("SELECT {CONTENT_COLUMNS} FROM contents"));
        Self::push_filters(&mut builder, query);

        let items = builder
            .build_query_as::<Content>()
            .fetch_all(&self.pool)
            .await?;
        Ok(items)
    }

    async fn find(&self, id: Uuid) -> Result<Option<Content>, StoreError> {
        let content = sqlx::query_as::<_, Content>(&format!(
            "SELECT {CONTENT_COLUMNS} FROM contents WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(content)
    }

    async fn create(&self, c: Content) -> Result<Content, StoreError> {
        let content = sqlx::query_as::<_, Content>(&format!(
            r#"
            INSERT INTO contents (
                id, kind, title, description, poster, public_id, landscape_poster,
                landscape_public_id, year, genre, rating, duration, episodes, country,
                age_rating, release_date, cast_members, tags, is_popular, popularity_rank, status
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19, $20, $21)
            RETURNING {CONTENT_COLUMNS}
            "#
        ))
        .bind(c.id)
        .bind(c.kind.as_str())
        .bind(&c.title)
        .bind(&c.description)
        .bind(&c.poster)
        .bind(&c.public_id)
        .bind(&c.landscape_poster)
        .bind(&c.landscape_public_id)
        .bind(c.year)
        .bind(&c.genre)
        .bind(c.rating)
        .bind(&c.duration)
        .bind(c.episodes)
        .bind(&c.country)
        .bind(&c.age_rating)
        .bind(c.release_date)
        .bind(&c.cast)
        .bind(&c.tags)
        .bind(c.is_popular)
        .bind(c.popularity_rank)
        .bind(c.status.as_str())
        .fetch_one(&self.pool)
        .await?;
        Ok(content)
    }

    async fn patch(&self, id: Uuid, patch: &ContentPatch) -> Result<Option<Content>, StoreError> {
        if patch.is_empty() {
            return self.find(id).await;
        }

        let mut builder = QueryBuilder::<Postgres>::new("UPDATE contents SET ");
        let mut first = true;
        let b = &mut builder;
        let f = &mut first;

        if let Some(v) = &patch.title { Self::push_set(b, f, "title", v.clone()); }
        if let Some(v) = &patch.description { Self::push_set(b, f, "description", v.clone()); }
        if let Some(v) = &patch.poster { Self::push_set(b, f, "poster", v.clone()); }
        if let Some(v) = &patch.public_id { Self::push_set(b, f, "public_id", v.clone()); }
        if let Some(v) = &patch.landscape_poster { Self::push_set(b, f, "landscape_poster", v.clone()); }
        if let Some(v) = &patch.landscape_public_id { Self::push_set(b, f, "landscape_public_id", v.clone()); }
        if let Some(v) = patch.year { Self::push_set(b, f, "year", v); }
        if let Some(v) = &patch.genre { Self::push_set(b, f, "genre", v.clone()); }
        if let Some(v) = patch.rating { Self::push_set(b, f, "rating", v); }
        if let Some(v) = &patch.duration { Self::push_set(b, f, "duration", v.clone()); }
        if let Some(v) = patch.episodes { Self::push_set(b, f, "episodes", v); }
        if let Some(v) = &patch.country { Self::push_set(b, f, "country", v.clone()); }
        if let Some(v) = &patch.age_rating { Self::push_set(b, f, "age_rating", v.clone()); }
        if let Some(v) = patch.release_date { Self::push_set(b, f, "release_date", v); }
        if let Some(v) = &patch.cast { Self::push_set(b, f, "cast_members", v.clone()); }
        if let Some(v) = &patch.tags { Self::push_set(b, f, "tags", v.clone()); }
        if let Some(v) = patch.is_popular { Self::push_set(b, f, "is_popular", v); }
        if let Some(v) = patch.popularity_rank { Self::push_set(b, f, "popularity_rank", v); }
        if let Some(v) = patch.status { Self::push_set(b, f, "status", v.as_str()); }
        if let Some(v) = &patch.hero_bg { Self::push_set(b, f, "hero_bg", v.clone()); }
        if let Some(v) = &patch.hero_bg_public_id { Self::push_set(b, f, "hero_bg_public_id", v.clone()); }
        if let Some(v) = &patch.hero_character { Self::push_set(b, f, "hero_character", v.clone()); }
        if let Some(v) = &patch.hero_character_public_id { Self::push_set(b, f, "hero_character_public_id", v.clone()); }
        if let Some(v) = &patch.hero_title { Self::push_set(b, f, "hero_title", v.clone()); }
        if let Some(v) = &patch.hero_title_public_id { Self::push_set(b, f, "hero_title_public_id", v.clone()); }

        builder
            .push(", updated_at = NOW() WHERE id = ")
            .push_bind(id)
            .push(format!(" RETURNING {CONTENT_COLUMNS}"));

        let updated = builder
            .build_query_as::<Content>()
            .fetch_optional(&self.pool)
            .await?;
        Ok(updated)
    }

    async fn delete(&self, id: Uuid) -> Result<Option<Content>, StoreError> {
        let deleted = sqlx::query_as::<_, Content>(&format!(
            "DELETE FROM contents WHERE id = $1 RETURNING {CONTENT_COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(deleted)
    }
}
