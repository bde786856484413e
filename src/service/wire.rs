//! Response shapes and validation at the client boundary.
//!
//! Bodies are decoded into loose wire structs first, then validated into the
//! typed model. Anything that does not fit is a decode error; undefined fields
//! never leak past this module.

use std::collections::HashSet;

use serde::Deserialize;

use crate::model::{ComparisonPair, Item};

/// Answer to a next-pair request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PairResponse {
    /// A judgment is pending.
    Pair(ComparisonPair),
    /// No further comparisons are needed (or none can be produced yet).
    Complete,
    /// The server is not done but had no pair to offer (`pair` absent, null or empty).
    NoPair,
}

impl PairResponse {
    pub fn is_complete(&self) -> bool {
        matches!(self, PairResponse::Complete)
    }

    pub fn into_pair(self) -> Option<ComparisonPair> {
        match self {
            PairResponse::Pair(pair) => Some(pair),
            PairResponse::Complete | PairResponse::NoPair => None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RankingsBody {
    rankings: Vec<Item>,
}

#[derive(Debug, Deserialize)]
struct EntryBody {
    entry: Item,
}

#[derive(Debug, Deserialize)]
struct NextPairBody {
    complete: bool,
    #[serde(default)]
    pair: Option<Vec<Item>>,
}

pub(crate) fn decode_rankings(body: &str) -> Result<Vec<Item>, String> {
    let parsed: RankingsBody = serde_json::from_str(body).map_err(|e| e.to_string())?;

    let mut seen = HashSet::with_capacity(parsed.rankings.len());
    for item in &parsed.rankings {
        validate_item(item)?;
        if !seen.insert(&item.id) {
            return Err(format!("duplicate item id '{}'", item.id));
        }
    }

    Ok(parsed.rankings)
}

pub(crate) fn decode_entry(body: &str) -> Result<Item, String> {
    let parsed: EntryBody = serde_json::from_str(body).map_err(|e| e.to_string())?;
    validate_item(&parsed.entry)?;
    Ok(parsed.entry)
}

pub(crate) fn decode_pair(body: &str) -> Result<PairResponse, String> {
    let parsed: NextPairBody = serde_json::from_str(body).map_err(|e| e.to_string())?;

    if parsed.complete {
        return Ok(PairResponse::Complete);
    }

    let items = match parsed.pair {
        Some(items) if !items.is_empty() => items,
        _ => return Ok(PairResponse::NoPair),
    };

    let [left, right]: [Item; 2] = items
        .try_into()
        .map_err(|items: Vec<Item>| format!("expected 2 items in pair, got {}", items.len()))?;

    validate_item(&left)?;
    validate_item(&right)?;

    if left.id == right.id {
        return Err(format!("pair references item '{}' twice", left.id));
    }

    Ok(PairResponse::Pair(ComparisonPair::new(left, right)))
}

fn validate_item(item: &Item) -> Result<(), String> {
    if item.id.as_str().is_empty() {
        return Err("item with empty id".to_string());
    }
    if item.title.trim().is_empty() {
        return Err(format!("item '{}' has an empty title", item.id));
    }
    Ok(())
}
