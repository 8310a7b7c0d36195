use std::sync::Arc;

use axum::http::StatusCode;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{info, warn};
use uuid::Uuid;

use super::ranking::{first_duplicate, is_permutation_of, next_rank, rank_plan, stale_ranks};
use crate::infrastructure::events::bus::EventBus;
use crate::modules::content::dto::ContentPatch;
use crate::modules::content::model::{Content, PopularItem};
use crate::modules::content::store::{CatalogQuery, ContentStore, StoreError};

#[derive(Debug, Error)]
pub enum RankError {
    #[error("Could not load popular content: {0}")]
    Fetch(#[source] StoreError),

    #[error(
        "Saved {succeeded} of {total} ranks before {failed_id} failed: {reason}. Retry the whole order."
    )]
    Save {
        succeeded: usize,
        total: usize,
        failed_id: Uuid,
        reason: String,
    },

    #[error("Another ranking save is still running")]
    CommitInProgress,

    #[error("Content {0} not found")]
    NotFound(Uuid),

    #[error("Invalid order: {0}")]
    InvalidOrder(String),
}

impl RankError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            RankError::Fetch(_) => StatusCode::SERVICE_UNAVAILABLE,
            RankError::Save { .. } => StatusCode::BAD_GATEWAY,
            RankError::CommitInProgress => StatusCode::CONFLICT,
            RankError::NotFound(_) => StatusCode::NOT_FOUND,
            RankError::InvalidOrder(_) => StatusCode::BAD_REQUEST,
        }
    }
}

fn too_many() -> RankError {
    RankError::InvalidOrder("too many popular titles to rank".to_string())
}

/// Owns the popular ordering: loads it, and persists a new order as
/// sequential ranks.
///
/// Writes are one record per request, in order, with no rollback. Each write
/// sets an absolute rank, so re-running a partially failed commit with the
/// same order converges to the same state. A batched multi-update would be
/// faster but the store has no such operation.
///
/// `commit_guard` stops two ranking writes from interleaving inside this
/// process. Separate processes are not coordinated: the last full write wins.
pub struct RankSynchronizer {
    store: Arc<dyn ContentStore>,
    events: EventBus,
    commit_guard: Mutex<()>,
}

impl RankSynchronizer {
    pub fn new(store: Arc<dyn ContentStore>, events: EventBus) -> Self {
        Self {
            store,
            events,
            commit_guard: Mutex::new(()),
        }
    }

    /// Popular records in ascending rank, as the store returns them.
    pub async fn load_popular(&self) -> Result<Vec<PopularItem>, RankError> {
        let items = self
            .store
            .list(&CatalogQuery::admin_popular())
            .await
            .map_err(RankError::Fetch)?;
        Ok(items.into_iter().map(PopularItem::from).collect())
    }

    /// Writes `rank = position + 1, isPopular = true` for every id, in order.
    ///
    /// `order` must name every currently popular record exactly once; anything
    /// else would leave the records it omits holding stale ranks.
    pub async fn commit(&self, order: &[Uuid]) -> Result<Vec<PopularItem>, RankError> {
        if let Some(dup) = first_duplicate(order) {
            return Err(RankError::InvalidOrder(format!("{dup} appears more than once")));
        }

        let _guard = self
            .commit_guard
            .try_lock()
            .map_err(|_| RankError::CommitInProgress)?;

        let current = self.load_popular().await?;
        if !is_permutation_of(order, &current) {
            return Err(RankError::InvalidOrder(format!(
                "expected all {} popular titles, each exactly once",
                current.len()
            )));
        }

        let plan = rank_plan(order).ok_or_else(too_many)?;
        let saved = self.write_ranks(&plan).await?;
        info!(count = saved.len(), "Popular ranking committed");
        Ok(saved.into_iter().map(PopularItem::from).collect())
    }

    /// Marks or unmarks a record as popular, keeping ranks contiguous.
    ///
    /// A newly popular record goes to last place right away. Unmarking clears
    /// its rank and closes the gap it leaves.
    pub async fn set_popular(&self, id: Uuid, is_popular: bool) -> Result<Content, RankError> {
        let _guard = self
            .commit_guard
            .try_lock()
            .map_err(|_| RankError::CommitInProgress)?;

        let current = self.load_popular().await?;

        if is_popular {
            if let Some(existing) = current.iter().find(|p| p.id == id && p.rank.is_some()) {
                return self.find(existing.id).await;
            }
            let rank = next_rank(&current, id).ok_or_else(too_many)?;
            let updated = self.patch_one(id, &ContentPatch::rank(rank), 0, 1).await?;
            info!(%id, rank, "Content marked popular");
            self.events.content_changed();
            return Ok(updated);
        }

        let updated = self.patch_one(id, &ContentPatch::clear_popularity(), 0, 1).await?;
        info!(%id, "Content unmarked popular");

        let remaining: Vec<Uuid> = current.iter().map(|p| p.id).filter(|p| *p != id).collect();
        let stale = stale_ranks(&current, &remaining).ok_or_else(too_many)?;

        if stale.is_empty() {
            self.events.content_changed();
        } else {
            self.write_ranks(&stale).await?;
        }
        Ok(updated)
    }

    /// Renumbers the popular set as 1..=N in its current order. Used after a
    /// popular record disappears by some other route, such as deletion.
    /// Waits for a running commit instead of failing. Returns the number of
    /// records rewritten.
    pub async fn close_gaps(&self) -> Result<usize, RankError> {
        let _guard = self.commit_guard.lock().await;

        let current = self.load_popular().await?;
        let ids: Vec<Uuid> = current.iter().map(|p| p.id).collect();
        let stale = stale_ranks(&current, &ids).ok_or_else(too_many)?;

        if stale.is_empty() {
            return Ok(0);
        }
        let saved = self.write_ranks(&stale).await?;
        info!(count = saved.len(), "Popular ranks renumbered");
        Ok(saved.len())
    }

    async fn find(&self, id: Uuid) -> Result<Content, RankError> {
        self.store
            .find(id)
            .await
            .map_err(RankError::Fetch)?
            .ok_or(RankError::NotFound(id))
    }

    /// Sequential rank writes. Announces the change whenever at least one
    /// write landed, so listings never keep showing a half-applied order.
    async fn write_ranks(&self, plan: &[(Uuid, i32)]) -> Result<Vec<Content>, RankError> {
        let mut saved = Vec::with_capacity(plan.len());

        for (id, rank) in plan {
            match self.patch_one(*id, &ContentPatch::rank(*rank), saved.len(), plan.len()).await {
                Ok(content) => saved.push(content),
                Err(e) => {
                    warn!(error = %e, "Ranking write stopped early");
                    if !saved.is_empty() {
                        self.events.content_changed();
                    }
                    return Err(e);
                }
            }
        }

        self.events.content_changed();
        Ok(saved)
    }

    async fn patch_one(
        &self,
        id: Uuid,
        patch: &ContentPatch,
        succeeded: usize,
        total: usize,
    ) -> Result<Content, RankError> {
        let save_error = |reason: String| RankError::Save {
            succeeded,
            total,
            failed_id: id,
            reason,
        };

        match self.store.patch(id, patch).await {
            Ok(Some(content)) => Ok(content),
            Ok(None) if total == 1 => Err(RankError::NotFound(id)),
            Ok(None) => Err(save_error("not found".to_string())),
            Err(e) => Err(save_error(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::events::bus::CatalogEvent;
    use crate::modules::content::memory::MemoryContentStore;
    use crate::modules::content::model::ContentKind;
    use crate::modules::content::store::MockContentStore;
    use async_trait::async_trait;
    use mockall::Sequence;
    use pretty_assertions::assert_eq;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn popular(title: &str, rank: i32) -> Content {
        let mut c = Content::new(ContentKind::Movie, title);
        c.is_popular = true;
        c.popularity_rank = Some(rank);
        c
    }

    async fn ranks(store: &MemoryContentStore) -> Vec<(String, Option<i32>)> {
        store
            .list(&CatalogQuery::admin_popular())
            .await
            .unwrap()
            .into_iter()
            .map(|c| (c.title, c.popularity_rank))
            .collect()
    }

    /// Delegates to a memory store but fails the Nth patch call, once.
    struct FlakyStore {
        inner: MemoryContentStore,
        fail_on: usize,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl ContentStore for FlakyStore {
        async fn list(&self, query: &CatalogQuery) -> Result<Vec<Content>, StoreError> {
            self.inner.list(query).await
        }

        async fn find(&self, id: Uuid) -> Result<Option<Content>, StoreError> {
            self.inner.find(id).await
        }

        async fn create(&self, content: Content) -> Result<Content, StoreError> {
            self.inner.create(content).await
        }

        async fn patch(&self, id: Uuid, patch: &ContentPatch) -> Result<Option<Content>, StoreError> {
            if self.calls.fetch_add(1, Ordering::SeqCst) == self.fail_on {
                return Err(StoreError::Unavailable("connection reset".into()));
            }
            self.inner.patch(id, patch).await
        }

        async fn delete(&self, id: Uuid) -> Result<Option<Content>, StoreError> {
            self.inner.delete(id).await
        }
    }

    #[tokio::test]
    async fn commit_assigns_sequential_ranks_and_announces_it() {
        let (a, b, c) = (popular("A", 3), popular("B", 1), popular("C", 2));
        let order = vec![a.id, b.id, c.id];
        let store = MemoryContentStore::with_items(vec![a, b, c]);
        let events = EventBus::new();
        let mut rx = events.subscribe();
        let sync = RankSynchronizer::new(Arc::new(store.clone()), events);

        let saved = sync.commit(&order).await.unwrap();

        assert_eq!(saved.iter().map(|p| p.rank).collect::<Vec<_>>(), vec![Some(1), Some(2), Some(3)]);
        assert!(saved.iter().all(|p| p.is_popular));
        assert_eq!(
            ranks(&store).await,
            vec![("A".into(), Some(1)), ("B".into(), Some(2)), ("C".into(), Some(3))]
        );
        assert_eq!(rx.recv().await.unwrap(), CatalogEvent::ContentChanged);
    }

    #[tokio::test]
    async fn drag_third_to_first_then_save_renumbers_all_five() {
        let items: Vec<Content> = (1..=5).map(|r| popular(&format!("P{r}"), r)).collect();
        let store = MemoryContentStore::with_items(items);
        let sync = RankSynchronizer::new(Arc::new(store.clone()), EventBus::new());

        let loaded = sync.load_popular().await.unwrap();
        let working = super::super::ranking::reorder(&loaded, 2, 0);
        let order: Vec<Uuid> = working.iter().map(|p| p.id).collect();
        sync.commit(&order).await.unwrap();

        assert_eq!(
            ranks(&store).await,
            vec![
                ("P3".into(), Some(1)),
                ("P1".into(), Some(2)),
                ("P2".into(), Some(3)),
                ("P4".into(), Some(4)),
                ("P5".into(), Some(5)),
            ]
        );
    }

    #[tokio::test]
    async fn partial_failure_keeps_earlier_writes_and_retry_converges() {
        let items: Vec<Content> = (1..=4).map(|r| popular(&format!("P{r}"), r)).collect();
        let mut order: Vec<Uuid> = items.iter().map(|c| c.id).collect();
        order.reverse();

        let inner = MemoryContentStore::with_items(items);
        let flaky = FlakyStore { inner: inner.clone(), fail_on: 2, calls: AtomicUsize::new(0) };
        let sync = RankSynchronizer::new(Arc::new(flaky), EventBus::new());

        let err = sync.commit(&order).await.unwrap_err();
        match err {
            RankError::Save { succeeded, total, failed_id, .. } => {
                assert_eq!((succeeded, total), (2, 4));
                assert_eq!(failed_id, order[2]);
            }
            other => panic!("expected save error, got {other:?}"),
        }
        // P4 and P3 were written, P2 and P1 were not: duplicates until retried
        assert_eq!(inner.find(order[0]).await.unwrap().unwrap().popularity_rank, Some(1));
        assert_eq!(inner.find(order[3]).await.unwrap().unwrap().popularity_rank, Some(1));

        sync.commit(&order).await.unwrap();
        assert_eq!(
            ranks(&inner).await,
            vec![
                ("P4".into(), Some(1)),
                ("P3".into(), Some(2)),
                ("P2".into(), Some(3)),
                ("P1".into(), Some(4)),
            ]
        );
    }

    #[tokio::test]
    async fn commit_stops_at_the_first_failed_write() {
        let listed: Vec<Content> = (1..=3).map(|r| popular(&format!("P{r}"), r)).collect();
        let ids: Vec<Uuid> = listed.iter().map(|c| c.id).collect();
        let mut store = MockContentStore::new();
        let mut seq = Sequence::new();

        store
            .expect_list()
            .times(1)
            .in_sequence(&mut seq)
            .returning(move |_| Ok(listed.clone()));

        let first = ids[0];
        store
            .expect_patch()
            .withf(move |id, patch| *id == first && *patch == ContentPatch::rank(1))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|id, _| {
                let mut c = Content::new(ContentKind::Movie, "ok");
                c.id = id;
                c.is_popular = true;
                c.popularity_rank = Some(1);
                Ok(Some(c))
            });
        let second = ids[1];
        store
            .expect_patch()
            .withf(move |id, _| *id == second)
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Err(StoreError::Unavailable("timeout".into())));

        let sync = RankSynchronizer::new(Arc::new(store), EventBus::new());
        let err = sync.commit(&ids).await.unwrap_err();

        assert!(matches!(err, RankError::Save { succeeded: 1, total: 3, .. }));
        assert_eq!(err.status_code(), StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn load_failure_is_a_fetch_error() {
        let mut store = MockContentStore::new();
        store
            .expect_list()
            .returning(|_| Err(StoreError::Unavailable("down".into())));

        let sync = RankSynchronizer::new(Arc::new(store), EventBus::new());
        let err = sync.load_popular().await.unwrap_err();

        assert!(matches!(err, RankError::Fetch(_)));
        assert_eq!(err.status_code(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn duplicate_ids_are_rejected_before_any_write() {
        let id = Uuid::new_v4();
        let store = MockContentStore::new();
        let sync = RankSynchronizer::new(Arc::new(store), EventBus::new());

        let err = sync.commit(&[id, id]).await.unwrap_err();
        assert!(matches!(err, RankError::InvalidOrder(_)));
    }

    #[tokio::test]
    async fn commit_rejects_an_order_that_is_not_the_popular_set() {
        let items: Vec<Content> = (1..=3).map(|r| popular(&format!("P{r}"), r)).collect();
        let ids: Vec<Uuid> = items.iter().map(|c| c.id).collect();
        let store = MemoryContentStore::with_items(items);
        let sync = RankSynchronizer::new(Arc::new(store.clone()), EventBus::new());

        let subset = sync.commit(&[ids[2]]).await.unwrap_err();
        assert!(matches!(subset, RankError::InvalidOrder(_)));
        assert_eq!(subset.status_code(), StatusCode::BAD_REQUEST);

        let outsider = Content::new(ContentKind::Movie, "Outsider");
        let outsider_id = outsider.id;
        store.create(outsider).await.unwrap();
        let extra = sync.commit(&[ids[0], ids[1], ids[2], outsider_id]).await.unwrap_err();
        assert!(matches!(extra, RankError::InvalidOrder(_)));

        assert_eq!(
            ranks(&store).await,
            vec![("P1".into(), Some(1)), ("P2".into(), Some(2)), ("P3".into(), Some(3))]
        );
    }

    #[tokio::test]
    async fn close_gaps_renumbers_after_a_popular_record_is_removed() {
        let items: Vec<Content> = (1..=3).map(|r| popular(&format!("P{r}"), r)).collect();
        let first = items[0].id;
        let store = MemoryContentStore::with_items(items);
        let sync = RankSynchronizer::new(Arc::new(store.clone()), EventBus::new());

        store.delete(first).await.unwrap();
        assert_eq!(sync.close_gaps().await.unwrap(), 2);
        assert_eq!(
            ranks(&store).await,
            vec![("P2".into(), Some(1)), ("P3".into(), Some(2))]
        );
        assert_eq!(sync.close_gaps().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn marking_an_unranked_popular_record_takes_the_next_slot() {
        let mut unranked = Content::new(ContentKind::Movie, "X");
        unranked.is_popular = true;
        let id = unranked.id;
        let store = MemoryContentStore::with_items(vec![popular("A", 1), unranked]);
        let sync = RankSynchronizer::new(Arc::new(store.clone()), EventBus::new());

        let updated = sync.set_popular(id, true).await.unwrap();
        assert_eq!(updated.popularity_rank, Some(2));
    }

    #[tokio::test]
    async fn concurrent_commit_is_rejected() {
        let store = MemoryContentStore::new();
        let sync = RankSynchronizer::new(Arc::new(store), EventBus::new());

        let _held = sync.commit_guard.lock().await;
        let err = sync.commit(&[]).await.unwrap_err();
        assert!(matches!(err, RankError::CommitInProgress));
    }

    #[tokio::test]
    async fn marking_popular_appends_at_last_place() {
        let (a, b) = (popular("A", 1), popular("B", 2));
        let fresh = Content::new(ContentKind::Series, "New");
        let fresh_id = fresh.id;
        let store = MemoryContentStore::with_items(vec![a, b, fresh]);
        let sync = RankSynchronizer::new(Arc::new(store.clone()), EventBus::new());

        let updated = sync.set_popular(fresh_id, true).await.unwrap();

        assert!(updated.is_popular);
        assert_eq!(updated.popularity_rank, Some(3));
        assert_eq!(
            ranks(&store).await,
            vec![("A".into(), Some(1)), ("B".into(), Some(2)), ("New".into(), Some(3))]
        );
    }

    #[tokio::test]
    async fn marking_an_already_ranked_item_changes_nothing() {
        let a = popular("A", 1);
        let id = a.id;
        let store = MemoryContentStore::with_items(vec![a, popular("B", 2)]);
        let sync = RankSynchronizer::new(Arc::new(store.clone()), EventBus::new());

        let same = sync.set_popular(id, true).await.unwrap();
        assert_eq!(same.popularity_rank, Some(1));
    }

    #[tokio::test]
    async fn unmarking_closes_the_gap() {
        let items: Vec<Content> = (1..=4).map(|r| popular(&format!("P{r}"), r)).collect();
        let second = items[1].id;
        let store = MemoryContentStore::with_items(items);
        let sync = RankSynchronizer::new(Arc::new(store.clone()), EventBus::new());

        let updated = sync.set_popular(second, false).await.unwrap();

        assert!(!updated.is_popular);
        assert_eq!(updated.popularity_rank, None);
        assert_eq!(
            ranks(&store).await,
            vec![("P1".into(), Some(1)), ("P3".into(), Some(2)), ("P4".into(), Some(3))]
        );
    }

    #[tokio::test]
    async fn toggling_a_missing_record_is_not_found() {
        let sync = RankSynchronizer::new(Arc::new(MemoryContentStore::new()), EventBus::new());
        let err = sync.set_popular(Uuid::new_v4(), true).await.unwrap_err();
        assert!(matches!(err, RankError::NotFound(_)));
    }
}
