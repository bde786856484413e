use thiserror::Error;

use crate::service::ServiceError;

/// Transport or server failures during a reset.
///
/// Only [`ResetError::Rejected`] means the destructive reset did not happen.
#[derive(Debug, Clone, Error)]
pub enum ResetError {
    #[error("reset was rejected: {0}")]
    Rejected(#[source] ServiceError),

    #[error("reset applied but items could not be reloaded: {0}")]
    ItemsUnavailable(#[source] ServiceError),

    #[error("reset applied but the next pair could not be fetched: {0}")]
    PairUnavailable(#[source] ServiceError),
}

impl ResetError {
    /// Returns `true` if the server-side reset went through.
    pub fn reset_applied(&self) -> bool {
        !matches!(self, ResetError::Rejected(_))
    }

    pub fn service_error(&self) -> &ServiceError {
        match self {
            ResetError::Rejected(e)
            | ResetError::ItemsUnavailable(e)
            | ResetError::PairUnavailable(e) => e,
        }
    }
}

pub type ResetResult<T> = Result<T, ResetError>;
