use crate::model::{ComparisonPair, Item};

/// What happened after the destructive reset succeeded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Continuation {
    /// A usable pair was acquired.
    Resumed(ComparisonPair),
    /// Every attempt came back without a usable pair.
    Exhausted { attempts: u32 },
}

/// Outcome of a reset whose server-side mutation went through.
#[derive(Debug, Clone)]
pub struct ResetReport {
    /// Items as reloaded right after the reset.
    pub items: Vec<Item>,
    pub continuation: Continuation,
    /// Pair fetches performed.
    pub attempts: u32,
}

impl ResetReport {
    pub fn resumed(&self) -> bool {
        matches!(self.continuation, Continuation::Resumed(_))
    }
}

/// Progress notifications emitted while a reset runs.
#[derive(Debug, Clone, Copy)]
pub enum ResetProgress<'a> {
    /// The server accepted the reset.
    Applied,
    /// Items were reloaded.
    ItemsLoaded(&'a [Item]),
    /// A pair fetch is about to be issued (1-based).
    Attempt(u32),
}
