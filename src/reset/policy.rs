use std::time::Duration;

use crate::constants::{DEFAULT_RESET_BACKOFF, DEFAULT_RESET_MAX_ATTEMPTS};

/// Bounded retry policy for re-acquiring a pair after a reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResetPolicy {
    /// Pair fetches to try before giving up. Always at least 1.
    pub max_attempts: u32,
    /// Wait between attempts (not after the last one).
    pub backoff: Duration,
}

impl Default for ResetPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_RESET_MAX_ATTEMPTS,
            backoff: DEFAULT_RESET_BACKOFF,
        }
    }
}

impl ResetPolicy {
    pub fn new(max_attempts: u32, backoff: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            backoff,
        }
    }

    /// Zero-delay policy.
    pub fn immediate(max_attempts: u32) -> Self {
        Self::new(max_attempts, Duration::ZERO)
    }

    pub fn with_backoff(mut self, backoff: Duration) -> Self {
        self.backoff = backoff;
        self
    }
}
