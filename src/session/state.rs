use std::fmt;

use serde::Serialize;

use crate::model::{ComparisonPair, Item};
use crate::service::{PairResponse, ServiceError};
use crate::view::RankingView;

/// Why a round has nothing left to compare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionReason {
    /// The collection is empty: the user should add items.
    NoItems,
    /// A single item cannot be compared: the user should add another.
    InsufficientItems,
    /// The server needs no further judgments: the user may re-rank.
    AllRanked,
}

/// Failure detail carried by [`SessionState::Failed`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FailureKind {
    Network { message: String },
    Server { status: u16, body: String },
    Decode { message: String },
    /// The server is not done but offered no pair.
    NoPair,
    /// Ranks were cleared but no comparison could be resumed.
    ResetExhausted { attempts: u32 },
}

impl From<&ServiceError> for FailureKind {
    fn from(error: &ServiceError) -> Self {
        match error {
            ServiceError::Network { message, .. } => FailureKind::Network {
                message: message.clone(),
            },
            ServiceError::Server { status, body, .. } => FailureKind::Server {
                status: *status,
                body: body.clone(),
            },
            ServiceError::Decode { message, .. } => FailureKind::Decode {
                message: message.clone(),
            },
            ServiceError::ClientSetup(message) => FailureKind::Network {
                message: message.clone(),
            },
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::Network { message } => write!(f, "network error: {message}"),
            FailureKind::Server { status, body } => write!(f, "server error {status}: {body}"),
            FailureKind::Decode { message } => write!(f, "unexpected response: {message}"),
            FailureKind::NoPair => f.write_str("the server had no pair to compare yet"),
            FailureKind::ResetExhausted { attempts } => write!(
                f,
                "rankings were cleared but no comparison was available after {attempts} attempts"
            ),
        }
    }
}

/// The single active session state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SessionState {
    #[default]
    Idle,
    /// A request is in flight; choices are not accepted.
    Loading,
    AwaitingChoice {
        pair: ComparisonPair,
    },
    /// Terminal for the round; `items` are ranked first, then unranked.
    Complete {
        reason: CompletionReason,
        items: Vec<Item>,
    },
    Resetting {
        attempt: u32,
    },
    /// Terminal for the action that produced it; item data is left intact.
    Failed {
        error: FailureKind,
        retryable: bool,
    },
}

impl SessionState {
    /// Maps a pair-fetch answer onto the next state.
    ///
    /// A missing pair is not completion: it lands in a retryable failure.
    pub fn from_pair_response(response: PairResponse, view: RankingView) -> Self {
        match response {
            PairResponse::Pair(pair) => SessionState::AwaitingChoice { pair },
            PairResponse::Complete => SessionState::Complete {
                reason: CompletionReason::AllRanked,
                items: view.into_ordered(),
            },
            PairResponse::NoPair => SessionState::Failed {
                error: FailureKind::NoPair,
                retryable: true,
            },
        }
    }

    /// State for a collection too small to produce a pair.
    pub fn insufficient(view: RankingView) -> Self {
        let reason = if view.is_empty() {
            CompletionReason::NoItems
        } else {
            CompletionReason::InsufficientItems
        };
        SessionState::Complete {
            reason,
            items: view.into_ordered(),
        }
    }

    pub fn failed(error: &ServiceError, retryable: bool) -> Self {
        SessionState::Failed {
            error: error.into(),
            retryable,
        }
    }

    pub fn kind(&self) -> StateKind {
        match self {
            SessionState::Idle => StateKind::Idle,
            SessionState::Loading => StateKind::Loading,
            SessionState::AwaitingChoice { .. } => StateKind::AwaitingChoice,
            SessionState::Complete { .. } => StateKind::Complete,
            SessionState::Resetting { .. } => StateKind::Resetting,
            SessionState::Failed { .. } => StateKind::Failed,
        }
    }

    /// The pair being shown, if any. Never returned once complete.
    pub fn current_pair(&self) -> Option<&ComparisonPair> {
        match self {
            SessionState::AwaitingChoice { pair } => Some(pair),
            _ => None,
        }
    }

    /// Returns `true` while a request is outstanding.
    pub fn is_in_flight(&self) -> bool {
        matches!(
            self,
            SessionState::Loading | SessionState::Resetting { .. }
        )
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, SessionState::Complete { .. })
    }

    pub fn is_retryable_failure(&self) -> bool {
        matches!(self, SessionState::Failed { retryable: true, .. })
    }
}

/// Discriminant of [`SessionState`], used in errors and logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StateKind {
    Idle,
    Loading,
    AwaitingChoice,
    Complete,
    Resetting,
    Failed,
}

impl fmt::Display for StateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            StateKind::Idle => "idle",
            StateKind::Loading => "loading",
            StateKind::AwaitingChoice => "awaiting a choice",
            StateKind::Complete => "complete",
            StateKind::Resetting => "resetting",
            StateKind::Failed => "failed",
        };
        f.write_str(label)
    }
}
