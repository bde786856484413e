//! Core data model shared by the client, the session machine and the views.
//!
//! Items are owned by the remote service; the client holds a read-mostly replica.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Server-assigned item identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    /// Wraps a raw identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the raw identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ItemId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// A rankable entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Position in the server-computed total order (1-based), `None` until placed.
    #[serde(default)]
    pub rank: Option<u32>,
}

impl Item {
    pub fn new(id: impl Into<ItemId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: String::new(),
            rank: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_rank(mut self, rank: u32) -> Self {
        self.rank = Some(rank);
        self
    }

    #[inline]
    pub fn is_ranked(&self) -> bool {
        self.rank.is_some()
    }
}

/// Payload for creating an item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewItem {
    pub title: String,
    pub description: String,
}

impl NewItem {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
        }
    }
}

/// Positional label of a pair member. Carries no preference of its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn other(self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Left => f.write_str("left"),
            Side::Right => f.write_str("right"),
        }
    }
}

/// The next pending judgment, exactly as the server returned it.
///
/// A pair is a snapshot: it is consumed by one choice and never reused.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComparisonPair {
    pub left: Item,
    pub right: Item,
}

impl ComparisonPair {
    pub fn new(left: Item, right: Item) -> Self {
        Self { left, right }
    }

    pub fn get(&self, side: Side) -> &Item {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }

    /// Returns `true` if either member has the given id.
    pub fn references(&self, id: &ItemId) -> bool {
        self.left.id == *id || self.right.id == *id
    }

    /// Builds the submission for choosing `side`, using the pair's own ids.
    pub fn judgment(&self, side: Side) -> Judgment {
        Judgment {
            winner_id: self.get(side).id.clone(),
            loser_id: self.get(side.other()).id.clone(),
        }
    }

    /// Ids in positional order.
    pub fn ids(&self) -> (&ItemId, &ItemId) {
        (&self.left.id, &self.right.id)
    }
}

/// A winner/loser submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Judgment {
    pub winner_id: ItemId,
    pub loser_id: ItemId,
}

/// Server-ordered ids of ranked items. Its order is authoritative for display.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SortedSequence(Vec<ItemId>);

impl SortedSequence {
    /// Derives the sequence from item ranks. `None` when nothing is ranked yet.
    ///
    /// Ties keep collection order.
    pub fn from_ranks(items: &[Item]) -> Option<Self> {
        let mut ranked: Vec<&Item> = items.iter().filter(|item| item.is_ranked()).collect();
        if ranked.is_empty() {
            return None;
        }
        ranked.sort_by_key(|item| item.rank);
        Some(Self(ranked.into_iter().map(|item| item.id.clone()).collect()))
    }

    pub fn ids(&self) -> &[ItemId] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<I: Into<ItemId>> FromIterator<I> for SortedSequence {
    fn from_iter<T: IntoIterator<Item = I>>(iter: T) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}
