use super::error::{ResetError, ResetResult};
use super::policy::ResetPolicy;
use super::types::{Continuation, ResetProgress, ResetReport};
use crate::service::{PairResponse, RankingService};

/// Issues a reset once, then retries pair acquisition within a bounded policy.
///
/// The reset call itself is never retried. Transport failures on the follow-up
/// reads are surfaced, not retried. A completion signal or an answer without
/// a usable pair means the server has none ready, and triggers another attempt.
#[derive(Debug, Clone, Default)]
pub struct ResetCoordinator {
    policy: ResetPolicy,
}

impl ResetCoordinator {
    pub fn new(policy: ResetPolicy) -> Self {
        Self { policy }
    }

    pub async fn run<S, F>(&self, service: &S, mut on_progress: F) -> ResetResult<ResetReport>
    where
        S: RankingService + ?Sized,
        F: FnMut(ResetProgress<'_>) + Send,
    {
        service.reset().await.map_err(ResetError::Rejected)?;
        tracing::info!("reset applied");
        on_progress(ResetProgress::Applied);

        let items = service
            .list_items()
            .await
            .map_err(ResetError::ItemsUnavailable)?;
        on_progress(ResetProgress::ItemsLoaded(&items));

        let max_attempts = self.policy.max_attempts.max(1);
        for attempt in 1..=max_attempts {
            on_progress(ResetProgress::Attempt(attempt));

            match service
                .next_pair()
                .await
                .map_err(ResetError::PairUnavailable)?
            {
                PairResponse::Pair(pair) => {
                    tracing::debug!(attempt, "pair acquired after reset");
                    return Ok(ResetReport {
                        items,
                        continuation: Continuation::Resumed(pair),
                        attempts: attempt,
                    });
                }
                response @ (PairResponse::Complete | PairResponse::NoPair) => {
                    tracing::debug!(
                        attempt,
                        max_attempts,
                        complete = response.is_complete(),
                        "no pair ready after reset"
                    );
                    if attempt < max_attempts && !self.policy.backoff.is_zero() {
                        tokio::time::sleep(self.policy.backoff).await;
                    }
                }
            }
        }

        tracing::warn!(
            attempts = max_attempts,
            items = items.len(),
            "reset applied but no comparison could be resumed"
        );
        Ok(ResetReport {
            items,
            continuation: Continuation::Exhausted {
                attempts: max_attempts,
            },
            attempts: max_attempts,
        })
    }
}
