use serde::Serialize;

use super::state::SessionState;
use crate::model::{ComparisonPair, Item, SortedSequence};
use crate::view::{RankingView, reconcile};

/// Read-only copy of the session published after every transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionSnapshot {
    pub state: SessionState,
    /// Collection order, as last fetched or locally mutated.
    pub items: Vec<Item>,
    pub sorted: Option<SortedSequence>,
    pub view: RankingView,
}

impl SessionSnapshot {
    pub fn new(state: SessionState, items: Vec<Item>) -> Self {
        let sorted = SortedSequence::from_ranks(&items);
        let view = reconcile(&items, sorted.as_ref());
        Self {
            state,
            items,
            sorted,
            view,
        }
    }

    pub fn current_pair(&self) -> Option<&ComparisonPair> {
        self.state.current_pair()
    }

    pub fn accepts_choice(&self) -> bool {
        self.current_pair().is_some()
    }

    pub fn is_complete(&self) -> bool {
        self.state.is_complete()
    }

    pub fn is_busy(&self) -> bool {
        self.state.is_in_flight()
    }
}

impl Default for SessionSnapshot {
    fn default() -> Self {
        Self::new(SessionState::Idle, Vec::new())
    }
}
