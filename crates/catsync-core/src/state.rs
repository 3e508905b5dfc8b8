//! Incremental state diffing across sync runs.
//!
//! A [`StateSnapshot`] records which products finished image processing in
//! a previous run. It is an explicit value: the orchestrator loads it once,
//! hands it to [`SyncPlan::build`], and persists the plan's
//! `next_snapshot` once the run succeeds.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::products::ProductKey;

/// Set of product keys processed by an earlier run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StateSnapshot(BTreeSet<String>);

impl StateSnapshot {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot holding the keys of every item in `items`.
    pub fn of<'a, T>(items: impl IntoIterator<Item = &'a T>) -> Self
    where
        T: ProductKey + 'a,
    {
        items
            .into_iter()
            .map(|item| item.product_key().to_owned())
            .collect()
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.0.contains(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for StateSnapshot {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

/// Split of the current run's items against the previous snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct Partition<T> {
    pub needs_processing: Vec<T>,
    pub already_done: Vec<T>,
}

/// Splits `current` by membership in `previous`, keeping `current`'s order
/// in both halves.
pub fn partition<T: ProductKey>(current: Vec<T>, previous: &StateSnapshot) -> Partition<T> {
    let (already_done, needs_processing) = current
        .into_iter()
        .partition(|item| previous.contains(item.product_key()));
    Partition {
        needs_processing,
        already_done,
    }
}

/// Work plan for one run plus the snapshot to persist once it succeeds.
///
/// `next_snapshot` covers every current item, including the ones skipped as
/// already done, so items that vanished from the ERP drop out of the
/// baseline.
#[derive(Debug, Clone, PartialEq)]
pub struct SyncPlan<T> {
    pub needs_processing: Vec<T>,
    pub already_done: Vec<T>,
    pub next_snapshot: StateSnapshot,
}

impl<T: ProductKey> SyncPlan<T> {
    pub fn build(current: Vec<T>, previous: &StateSnapshot) -> Self {
        let next_snapshot = StateSnapshot::of(&current);
        let Partition {
            needs_processing,
            already_done,
        } = partition(current, previous);
        Self {
            needs_processing,
            already_done,
            next_snapshot,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::products::Product;

    fn product(id: &str) -> Product {
        Product {
            external_id: id.to_owned(),
            title: format!("Part {id}"),
            sku: format!("SKU-{id}"),
            brand: "FOTON".to_owned(),
            description: "На заказ".to_owned(),
            price: None,
            categories: vec!["Запчасти/Каталог".to_owned(), "Запчасти/FOTON".to_owned()],
        }
    }

    fn ids(items: &[Product]) -> Vec<&str> {
        items.iter().map(|p| p.external_id.as_str()).collect()
    }

    #[test]
    fn partition_splits_by_previous_keys() {
        let previous: StateSnapshot = ["A", "B"].into_iter().collect();
        let out = partition(vec![product("A"), product("B"), product("C")], &previous);

        assert_eq!(ids(&out.needs_processing), vec!["C"]);
        assert_eq!(ids(&out.already_done), vec!["A", "B"]);
    }

    #[test]
    fn partition_preserves_order_in_both_halves() {
        let previous: StateSnapshot = ["D", "A"].into_iter().collect();
        let out = partition(
            vec![product("D"), product("C"), product("A"), product("B")],
            &previous,
        );

        assert_eq!(ids(&out.needs_processing), vec!["C", "B"]);
        assert_eq!(ids(&out.already_done), vec!["D", "A"]);
    }

    #[test]
    fn empty_snapshot_sends_everything_to_processing() {
        let out = partition(vec![product("A")], &StateSnapshot::new());
        assert_eq!(ids(&out.needs_processing), vec!["A"]);
        assert!(out.already_done.is_empty());
    }

    #[test]
    fn next_snapshot_is_the_full_current_set() {
        let previous: StateSnapshot = ["A", "B"].into_iter().collect();
        let plan = SyncPlan::build(vec![product("A"), product("B"), product("C")], &previous);

        let expected: StateSnapshot = ["A", "B", "C"].into_iter().collect();
        assert_eq!(plan.next_snapshot, expected);
        assert_eq!(ids(&plan.needs_processing), vec!["C"]);
    }

    #[test]
    fn removed_products_leave_the_baseline() {
        let previous: StateSnapshot = ["A", "GONE"].into_iter().collect();
        let plan = SyncPlan::build(vec![product("A")], &previous);
        assert!(!plan.next_snapshot.contains("GONE"));
    }

    #[test]
    fn second_run_with_same_data_has_nothing_to_process() {
        let current = || vec![product("A"), product("B")];
        let first = SyncPlan::build(current(), &StateSnapshot::new());
        let second = SyncPlan::build(current(), &first.next_snapshot);

        assert_eq!(first.needs_processing.len(), 2);
        assert!(second.needs_processing.is_empty());
        assert_eq!(second.next_snapshot, first.next_snapshot);
    }

    #[test]
    fn snapshot_serializes_as_sorted_list() {
        let snapshot: StateSnapshot = ["b", "a"].into_iter().collect();
        let json = serde_json::to_string(&snapshot).unwrap();
        assert_eq!(json, r#"["a","b"]"#);
    }
}
