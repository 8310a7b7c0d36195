//! Pure ranking helpers. Nothing here touches the store.

use std::collections::HashSet;

use uuid::Uuid;
use crate::modules::content::model::PopularItem;

/// Moves the element at `from` to `to`, shifting everything in between by one.
///
/// Returns the input unchanged when `from == to` or either index is out of
/// bounds. Rank fields are left alone: during a drag the rank is implied by
/// position and only `commit` writes it.
pub fn reorder<T: Clone>(current: &[T], from: usize, to: usize) -> Vec<T> {
    let len = current.len();
    if from == to || from >= len || to >= len {
        return current.to_vec();
    }

    let mut items = current.to_vec();
    let moved = items.remove(from);
    items.insert(to, moved);
    items
}

/// Rank for a zero-based position. `None` once the position no longer fits
/// an `i32` rank.
pub fn rank_at(index: usize) -> Option<i32> {
    i32::try_from(index).ok()?.checked_add(1)
}

/// `(id, rank)` pairs for an ordered sequence: positions 1..=N.
pub fn rank_plan(order: &[Uuid]) -> Option<Vec<(Uuid, i32)>> {
    order
        .iter()
        .enumerate()
        .map(|(idx, id)| rank_at(idx).map(|rank| (*id, rank)))
        .collect()
}

/// Rank given to `id` as it joins the popular set: last place among the
/// others. `id` itself is ignored if it is already listed without a rank.
pub fn next_rank(popular: &[PopularItem], id: Uuid) -> Option<i32> {
    let others: Vec<&PopularItem> = popular.iter().filter(|p| p.id != id).collect();
    let highest = others.iter().filter_map(|p| p.rank).max().unwrap_or(0);
    let count = i32::try_from(others.len()).ok()?;
    highest.max(count).checked_add(1)
}

/// Writes needed to renumber `keep` as 1..=N, skipping records whose stored
/// rank already matches.
pub fn stale_ranks(current: &[PopularItem], keep: &[Uuid]) -> Option<Vec<(Uuid, i32)>> {
    let plan = rank_plan(keep)?;
    Some(
        plan.into_iter()
            .filter(|(id, rank)| {
                current
                    .iter()
                    .find(|p| p.id == *id)
                    .is_none_or(|p| p.rank != Some(*rank))
            })
            .collect(),
    )
}

/// Whether `order` names exactly the records in `current`, each once.
pub fn is_permutation_of(order: &[Uuid], current: &[PopularItem]) -> bool {
    let wanted: HashSet<Uuid> = order.iter().copied().collect();
    let have: HashSet<Uuid> = current.iter().map(|p| p.id).collect();
    order.len() == current.len() && wanted == have
}

/// First id that appears twice, if any.
pub fn first_duplicate(order: &[Uuid]) -> Option<Uuid> {
    let mut seen = HashSet::with_capacity(order.len());
    order.iter().copied().find(|id| !seen.insert(*id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::content::model::{ContentKind, ContentStatus};
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn popular(rank: Option<i32>) -> PopularItem {
        PopularItem {
            id: Uuid::new_v4(),
            title: "t".into(),
            rank,
            is_popular: true,
            kind: ContentKind::Movie,
            year: None,
            poster: None,
            status: ContentStatus::Published,
        }
    }

    #[test]
    fn moves_forward_and_backward() {
        let items = vec!['a', 'b', 'c', 'd', 'e'];
        assert_eq!(reorder(&items, 2, 0), vec!['c', 'a', 'b', 'd', 'e']);
        assert_eq!(reorder(&items, 0, 3), vec!['b', 'c', 'd', 'a', 'e']);
        assert_eq!(reorder(&items, 4, 1), vec!['a', 'e', 'b', 'c', 'd']);
    }

    #[test]
    fn same_or_out_of_bounds_indices_are_a_no_op() {
        let items = vec![1, 2, 3];
        assert_eq!(reorder(&items, 1, 1), items);
        assert_eq!(reorder(&items, 3, 0), items);
        assert_eq!(reorder(&items, 0, 7), items);
        assert_eq!(reorder::<i32>(&[], 0, 0), Vec::<i32>::new());
    }

    #[test]
    fn plan_numbers_from_one_without_gaps() {
        let ids: Vec<Uuid> = (0..4).map(|_| Uuid::new_v4()).collect();
        let plan = rank_plan(&ids).unwrap();
        let ranks: Vec<i32> = plan.iter().map(|(_, r)| *r).collect();

        assert_eq!(ranks, vec![1, 2, 3, 4]);
        assert_eq!(plan[2].0, ids[2]);
    }

    #[test]
    fn next_rank_appends_after_the_current_set() {
        let id = Uuid::new_v4();
        assert_eq!(next_rank(&[], id), Some(1));
        assert_eq!(next_rank(&[popular(Some(1)), popular(Some(2))], id), Some(3));
        // legacy sentinel ranks still land after them
        assert_eq!(next_rank(&[popular(Some(1)), popular(Some(9999))], id), Some(10000));
        assert_eq!(next_rank(&[popular(None), popular(None)], id), Some(3));
    }

    #[test]
    fn next_rank_does_not_count_the_unranked_record_itself() {
        let unranked = popular(None);
        let id = unranked.id;
        assert_eq!(next_rank(&[popular(Some(1)), unranked], id), Some(2));
    }

    #[test]
    fn ranks_past_i32_are_refused() {
        assert_eq!(rank_at(0), Some(1));
        assert_eq!(rank_at(i32::MAX as usize - 1), Some(i32::MAX));
        assert_eq!(rank_at(i32::MAX as usize), None);
        assert_eq!(next_rank(&[popular(Some(i32::MAX))], Uuid::new_v4()), None);
    }

    #[test]
    fn stale_ranks_skip_records_already_in_place() {
        let (a, b, c) = (popular(Some(1)), popular(Some(3)), popular(Some(4)));
        let keep = vec![a.id, b.id, c.id];
        let current = vec![a, b, c];

        assert_eq!(
            stale_ranks(&current, &keep).unwrap(),
            vec![(keep[1], 2), (keep[2], 3)]
        );
    }

    #[test]
    fn permutation_check_needs_the_same_members() {
        let current = vec![popular(Some(1)), popular(Some(2)), popular(Some(3))];
        let ids: Vec<Uuid> = current.iter().map(|p| p.id).collect();

        assert!(is_permutation_of(&[ids[2], ids[0], ids[1]], &current));
        assert!(!is_permutation_of(&[ids[2]], &current));
        assert!(!is_permutation_of(&[ids[0], ids[1], Uuid::new_v4()], &current));
        assert!(!is_permutation_of(&[ids[0], ids[1], ids[2], Uuid::new_v4()], &current));
    }

    #[test]
    fn finds_duplicate_ids() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        assert_eq!(first_duplicate(&[a, b]), None);
        assert_eq!(first_duplicate(&[a, b, a]), Some(a));
    }

    proptest! {
        #[test]
        fn reorder_preserves_items_and_lands_on_target(
            items in prop::collection::vec(any::<u16>(), 1..40),
            from_seed in any::<usize>(),
            to_seed in any::<usize>(),
        ) {
            let from = from_seed % items.len();
            let to = to_seed % items.len();
            let moved = reorder(&items, from, to);

            let mut before = items.clone();
            let mut after = moved.clone();
            before.sort_unstable();
            after.sort_unstable();
            prop_assert_eq!(before, after);
            prop_assert_eq!(moved[to], items[from]);
        }

        #[test]
        fn reorder_to_same_index_is_identity(
            items in prop::collection::vec(any::<u16>(), 1..40),
            seed in any::<usize>(),
        ) {
            let idx = seed % items.len();
            prop_assert_eq!(reorder(&items, idx, idx), items);
        }
    }
}
