use std::fmt::Write as _;

use crate::model::{ComparisonPair, Item};
use crate::session::{CompletionReason, SessionSnapshot, SessionState};
use crate::view::RankingView;

/// Formats the pair on screen with its answer keys.
pub fn render_pair(pair: &ComparisonPair) -> String {
    let mut out = String::from("Which do you prefer?\n");
    push_choice(&mut out, "a", &pair.left);
    push_choice(&mut out, "b", &pair.right);
    out
}

/// Ranked items with their 1-based position, then unranked items marked `-`.
pub fn render_view(view: &RankingView) -> String {
    if view.is_empty() {
        return "No items yet.\n".to_string();
    }

    let mut out = String::new();
    if !view.ranked.is_empty() {
        out.push_str("Rankings\n");
        for (position, item) in view.ranked.iter().enumerate() {
            push_row(&mut out, &(position + 1).to_string(), item);
        }
    }
    if !view.unranked.is_empty() {
        if !out.is_empty() {
            out.push('\n');
        }
        out.push_str("Still comparing\n");
        for item in &view.unranked {
            push_row(&mut out, "-", item);
        }
    }
    out
}

/// One status block per state variant.
pub fn render_status(snapshot: &SessionSnapshot) -> String {
    match &snapshot.state {
        SessionState::Idle => "Not started.\n".to_string(),
        SessionState::Loading => "Working...\n".to_string(),
        SessionState::AwaitingChoice { pair } => render_pair(pair),
        SessionState::Complete { reason, .. } => match reason {
            CompletionReason::NoItems => {
                "No items yet. Add one with 'add <title>'.\n".to_string()
            }
            CompletionReason::InsufficientItems => {
                "Add one more item to start comparing.\n".to_string()
            }
            CompletionReason::AllRanked => {
                "All items ranked. Type 'v' to see them or 'reset' to start over.\n".to_string()
            }
        },
        SessionState::Resetting { attempt: 0 } => "Resetting rankings...\n".to_string(),
        SessionState::Resetting { attempt } => {
            format!("Resetting rankings (attempt {attempt})...\n")
        }
        SessionState::Failed { error, retryable } => {
            let hint = if *retryable {
                "Type 'r' to retry or 'reset' to start over."
            } else {
                "The choice may not have been saved. Type 'r' to reload before choosing again."
            };
            format!("Error: {error}\n{hint}\n")
        }
    }
}

/// Status block, followed by the final ranking once a round completes.
pub fn render_outcome(snapshot: &SessionSnapshot) -> String {
    let mut out = render_status(snapshot);
    if let SessionState::Complete {
        reason: CompletionReason::AllRanked,
        ..
    } = snapshot.state
    {
        out.push('\n');
        out.push_str(&render_view(&snapshot.view));
    }
    out
}

/// The view as pretty-printed JSON.
pub fn render_json(view: &RankingView) -> serde_json::Result<String> {
    serde_json::to_string_pretty(view)
}

fn push_choice(out: &mut String, key: &str, item: &Item) {
    let _ = writeln!(out, "  [{key}] {}", item.title);
    if !item.description.is_empty() {
        let _ = writeln!(out, "      {}", item.description);
    }
}

fn push_row(out: &mut String, badge: &str, item: &Item) {
    let _ = writeln!(out, "{badge:>4}  {}  ({})", item.title, item.id);
    if !item.description.is_empty() {
        let _ = writeln!(out, "      {}", item.description);
    }
}
