use thiserror::Error;

use super::state::StateKind;
use crate::reset::ResetError;
use crate::service::ServiceError;

/// Errors returned by session operations.
///
/// Service failures are also reflected in the machine's `Failed` state; the
/// error returned here carries the full cause for the caller.
#[derive(Debug, Clone, Error)]
pub enum SessionError {
    /// The operation is not valid from the current state. State is unchanged.
    #[error("cannot {operation} while {state}")]
    InvalidTransition {
        operation: &'static str,
        state: StateKind,
    },

    /// Another operation is still running.
    #[error("another session operation is in progress")]
    Busy,

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("{source}")]
    Service {
        #[source]
        source: ServiceError,
        retryable: bool,
    },

    /// The server answered without a pair and without reporting completion.
    #[error("the ranking service offered no pair to compare")]
    NoPairAvailable,

    #[error(transparent)]
    Reset(#[from] ResetError),

    #[error("rankings were reset but no pair was available after {attempts} attempts")]
    ResetExhausted { attempts: u32 },
}

impl SessionError {
    /// Returns `true` if re-issuing the whole operation is safe.
    pub fn is_retryable(&self) -> bool {
        match self {
            SessionError::Busy | SessionError::NoPairAvailable => true,
            SessionError::Service { retryable, .. } => *retryable,
            SessionError::Reset(_) | SessionError::ResetExhausted { .. } => true,
            SessionError::InvalidTransition { .. } | SessionError::InvalidInput(_) => false,
        }
    }
}

pub type SessionResult<T> = Result<T, SessionError>;
