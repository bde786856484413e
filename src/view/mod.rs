//! Ranked/unranked partition of the item collection for display.
//!
//! Derived, never fetched: recomputing after a local delete needs no rank state
//! from the server.


use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::model::{Item, ItemId, SortedSequence};

/// Items split by whether the sorted sequence places them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RankingView {
    /// In sorted-sequence order.
    pub ranked: Vec<Item>,
    /// In collection order.
    pub unranked: Vec<Item>,
}

impl RankingView {
    pub fn is_empty(&self) -> bool {
        self.ranked.is_empty() && self.unranked.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ranked.len() + self.unranked.len()
    }

    /// Ranked items followed by unranked items.
    pub fn into_ordered(self) -> Vec<Item> {
        let mut items = self.ranked;
        items.extend(self.unranked);
        items
    }
}

/// Partitions `items` against `sorted`.
///
/// Ids in `sorted` that no longer exist are skipped; a repeated id counts once,
/// at its first position.
pub fn reconcile(items: &[Item], sorted: Option<&SortedSequence>) -> RankingView {
    let Some(sorted) = sorted else {
        return RankingView {
            ranked: Vec::new(),
            unranked: items.to_vec(),
        };
    };

    let by_id: HashMap<&ItemId, &Item> = items.iter().map(|item| (&item.id, item)).collect();
    let mut placed: HashSet<&ItemId> = HashSet::with_capacity(sorted.len());

    let ranked: Vec<Item> = sorted
        .ids()
        .iter()
        .filter_map(|id| by_id.get(id).copied())
        .filter(|item| placed.insert(&item.id))
        .cloned()
        .collect();

    let unranked = items
        .iter()
        .filter(|item| !placed.contains(&item.id))
        .cloned()
        .collect();

    RankingView { ranked, unranked }
}
