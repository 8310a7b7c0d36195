use std::collections::HashSet;

use uuid::Uuid;
use super::history::ViewHistory;
use crate::modules::content::model::Content;

pub const TOP_PICKS_LIMIT: usize = 6;

/// Titles from `pool` that share a genre with something recently viewed.
///
/// The pool is de-duplicated by id (first occurrence wins) and keeps its own
/// order. Genre comparison is exact.
pub fn recommend(history: &ViewHistory, pool: &[Content]) -> Vec<Content> {
    let genres = history.genres();
    if genres.is_empty() {
        return Vec::new();
    }

    let mut seen: HashSet<Uuid> = HashSet::with_capacity(pool.len());
    pool.iter()
        .filter(|c| seen.insert(c.id))
        .filter(|c| c.genre.as_ref().is_some_and(|g| genres.contains(g)))
        .take(TOP_PICKS_LIMIT)
        .cloned()
        .collect()
}
