use time::OffsetDateTime;
use super::engine::recommend;
use super::history::ViewHistory;
use crate::modules::content::model::Content;
use crate::modules::content::service::{ContentError, ContentService};
use crate::modules::content::store::{CatalogQuery, Section};
use crate::state::AppState;

pub struct RecommendationService;

impl RecommendationService {
    /// Candidate titles in home page order: popular, then movies, series and
    /// originals that are already released.
    pub async fn top_picks_pool(state: AppState) -> Result<Vec<Content>, ContentError> {
        let now = OffsetDateTime::now_utc();
        let mut pool = ContentService::list_catalog(state.clone(), CatalogQuery::section(Section::Popular)).await?;

        for section in [Section::Movies, Section::Series, Section::Originals] {
            let items = ContentService::list_catalog(state.clone(), CatalogQuery::section(section)).await?;
            pool.extend(items.into_iter().filter(|c| !c.is_upcoming(now)));
        }
        Ok(pool)
    }

    pub async fn top_picks(state: AppState, history: &ViewHistory) -> Result<Vec<Content>, ContentError> {
        if history.genres().is_empty() {
            return Ok(Vec::new());
        }

        let pool = Self::top_picks_pool(state).await?;
        Ok(recommend(history, &pool))
    }
}
