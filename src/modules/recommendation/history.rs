use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

pub const HISTORY_LIMIT: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ViewHistoryEntry {
    pub content_id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
}

/// Most recently viewed titles, oldest first.
///
/// Holds at most [`HISTORY_LIMIT`] entries and never the same id twice.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ViewHistory {
    entries: Vec<ViewHistoryEntry>,
}

impl ViewHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a history from stored entries. Anything stored by an older
    /// client that breaks the rules is folded back into shape.
    pub fn from_entries(entries: Vec<ViewHistoryEntry>) -> Self {
        entries
            .into_iter()
            .fold(Self::new(), |history, e| history.record_view(e.content_id, e.genre))
    }

    pub fn entries(&self) -> &[ViewHistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Moves `content_id` to the newest position and drops the oldest entry
    /// past the limit.
    pub fn record_view(mut self, content_id: Uuid, genre: Option<String>) -> Self {
        let genre = genre.filter(|g| !g.trim().is_empty());

        self.entries.retain(|e| e.content_id != content_id);
        self.entries.push(ViewHistoryEntry { content_id, genre });

        if self.entries.len() > HISTORY_LIMIT {
            let overflow = self.entries.len() - HISTORY_LIMIT;
            self.entries.drain(..overflow);
        }
        self
    }

    pub fn genres(&self) -> BTreeSet<String> {
        self.entries
            .iter()
            .filter_map(|e| e.genre.clone())
            .collect()
    }
}

impl<'de> Deserialize<'de> for ViewHistory {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        Vec::<ViewHistoryEntry>::deserialize(deserializer).map(Self::from_entries)
    }
}
