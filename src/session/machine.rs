use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::error::{SessionError, SessionResult};
use super::snapshot::SessionSnapshot;
use super::state::{FailureKind, SessionState};
use crate::constants::MIN_ITEMS_FOR_PAIR;
use crate::model::{ComparisonPair, Item, ItemId, NewItem, Side, SortedSequence};
use crate::reset::{Continuation, ResetCoordinator, ResetPolicy, ResetProgress};
use crate::service::{PairResponse, RankingService, ServiceError, ServiceResult};
use crate::view::{RankingView, reconcile};

/// Mutable session data, kept apart from the service handle so a reset can
/// update it from the coordinator's progress callback.
#[derive(Debug, Default)]
struct SessionData {
    state: SessionState,
    items: Vec<Item>,
}

impl SessionData {
    fn view(&self) -> RankingView {
        let sorted = SortedSequence::from_ranks(&self.items);
        reconcile(&self.items, sorted.as_ref())
    }

    fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot::new(self.state.clone(), self.items.clone())
    }

    fn publish(&self, publisher: &watch::Sender<SessionSnapshot>) {
        publisher.send_replace(self.snapshot());
    }
}

/// Drives one ranking session against a [`RankingService`].
///
/// Every transition is published to subscribers as a [`SessionSnapshot`].
/// Operations take `&mut self`; callers sharing a machine serialize access
/// (see `RankingSession`).
pub struct SessionMachine<S> {
    service: S,
    coordinator: ResetCoordinator,
    data: SessionData,
    publisher: watch::Sender<SessionSnapshot>,
}

impl<S: RankingService> SessionMachine<S> {
    pub fn new(service: S, policy: ResetPolicy) -> Self {
        let (publisher, _) = watch::channel(SessionSnapshot::default());
        Self {
            service,
            coordinator: ResetCoordinator::new(policy),
            data: SessionData::default(),
            publisher,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.data.state
    }

    pub fn items(&self) -> &[Item] {
        &self.data.items
    }

    pub fn view(&self) -> RankingView {
        self.data.view()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.data.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.publisher.subscribe()
    }

    /// Loads items and the first pair. Valid from `Idle` and `Failed`.
    pub async fn initialize(&mut self) -> SessionResult<()> {
        if !matches!(
            self.data.state,
            SessionState::Idle | SessionState::Failed { .. }
        ) {
            return Err(self.invalid("initialize"));
        }

        info!("initializing ranking session");
        self.transition(SessionState::Loading);

        if let Err(error) = self.refresh_items().await {
            return self.fail(error, true);
        }
        self.settle_pair().await
    }

    /// Records a judgment for the pair on screen, then fetches the next pair.
    pub async fn choose(&mut self, side: Side) -> SessionResult<()> {
        let Some(pair) = self.data.state.current_pair().cloned() else {
            return Err(self.invalid("choose"));
        };

        let judgment = pair.judgment(side);
        self.transition(SessionState::Loading);

        if let Err(error) = self.service.submit_choice(&judgment).await {
            // The server may or may not have recorded it.
            return self.fail(error, false);
        }
        info!(
            winner = %judgment.winner_id,
            loser = %judgment.loser_id,
            "judgment recorded"
        );

        if let Err(error) = self.refresh_items().await {
            return self.fail(error, true);
        }
        self.settle_pair().await?;

        if let Some(next) = self.data.state.current_pair()
            && same_items(next, &pair)
        {
            debug!("server requested the same pair again");
        }
        Ok(())
    }

    /// Creates an item, shows it as unranked, then refreshes items and pair.
    pub async fn add_item(&mut self, title: &str, description: &str) -> SessionResult<()> {
        self.ensure_settled("add an item")?;

        let title = title.trim();
        if title.is_empty() {
            return Err(SessionError::InvalidInput(
                "item title must not be empty".to_string(),
            ));
        }

        self.transition(SessionState::Loading);

        let request = NewItem::new(title, description.trim());
        let mut created = match self.service.add_item(&request).await {
            Ok(created) => created,
            Err(error) => return self.fail(error, true),
        };
        info!(item_id = %created.id, title = %created.title, "item added");

        created.rank = None;
        self.data.items.retain(|item| item.id != created.id);
        self.data.items.push(created);
        self.publish();

        if let Err(error) = self.refresh_items().await {
            return self.fail(error, true);
        }
        self.settle_pair().await
    }

    /// Deletes an item, drops it locally, then refreshes items and pair.
    pub async fn delete_item(&mut self, id: &ItemId) -> SessionResult<()> {
        self.ensure_settled("delete an item")?;

        let stale_pair = self
            .data
            .state
            .current_pair()
            .is_some_and(|pair| pair.references(id));

        self.transition(SessionState::Loading);

        if let Err(error) = self.service.delete_item(id).await {
            return self.fail(error, true);
        }
        info!(item_id = %id, "item deleted");
        if stale_pair {
            debug!(item_id = %id, "discarded pair referencing deleted item");
        }

        self.data.items.retain(|item| item.id != *id);
        self.publish();

        if let Err(error) = self.refresh_items().await {
            return self.fail(error, true);
        }
        self.settle_pair().await
    }

    /// Clears every rank on the server and resumes comparisons.
    ///
    /// Valid from any state. Local ranks are cleared as soon as the server
    /// accepts the reset, whatever happens afterwards.
    pub async fn reset(&mut self) -> SessionResult<()> {
        info!(from = %self.data.state.kind(), "reset requested");
        self.transition(SessionState::Resetting { attempt: 0 });

        let data = &mut self.data;
        let publisher = &self.publisher;
        let outcome = self
            .coordinator
            .run(&self.service, |progress| {
                match progress {
                    ResetProgress::Applied => {
                        for item in &mut data.items {
                            item.rank = None;
                        }
                    }
                    ResetProgress::ItemsLoaded(items) => data.items = items.to_vec(),
                    ResetProgress::Attempt(attempt) => {
                        data.state = SessionState::Resetting { attempt };
                    }
                }
                data.publish(publisher);
            })
            .await;

        match outcome {
            Ok(report) => {
                self.data.items = report.items;
                match report.continuation {
                    Continuation::Resumed(pair) => {
                        self.transition(SessionState::AwaitingChoice { pair });
                        Ok(())
                    }
                    Continuation::Exhausted { attempts } => {
                        self.transition(SessionState::Failed {
                            error: FailureKind::ResetExhausted { attempts },
                            retryable: true,
                        });
                        Err(SessionError::ResetExhausted { attempts })
                    }
                }
            }
            Err(error) => {
                warn!(%error, reset_applied = error.reset_applied(), "reset failed");
                self.transition(SessionState::failed(error.service_error(), true));
                Err(error.into())
            }
        }
    }

    /// Fetches a pair, or settles on `Complete` when fewer than two items exist.
    async fn settle_pair(&mut self) -> SessionResult<()> {
        if self.data.items.len() < MIN_ITEMS_FOR_PAIR {
            debug!(items = self.data.items.len(), "too few items to compare");
            let state = SessionState::insufficient(self.data.view());
            self.transition(state);
            return Ok(());
        }

        let response = match self.service.next_pair().await {
            Ok(response) => response,
            Err(error) => return self.fail(error, true),
        };

        // Ranks are assigned when the round closes; reload to show them.
        if response.is_complete()
            && let Err(error) = self.refresh_items().await
        {
            return self.fail(error, true);
        }

        let no_pair = matches!(response, PairResponse::NoPair);
        let state = SessionState::from_pair_response(response, self.data.view());
        self.transition(state);
        if no_pair {
            warn!("ranking service returned neither a pair nor completion");
            return Err(SessionError::NoPairAvailable);
        }
        Ok(())
    }

    async fn refresh_items(&mut self) -> ServiceResult<()> {
        let items = self.service.list_items().await?;
        debug!(count = items.len(), "items refreshed");
        self.data.items = items;
        self.publish();
        Ok(())
    }

    fn ensure_settled(&self, operation: &'static str) -> SessionResult<()> {
        if self.data.state.is_in_flight() {
            return Err(self.invalid(operation));
        }
        Ok(())
    }

    fn invalid(&self, operation: &'static str) -> SessionError {
        SessionError::InvalidTransition {
            operation,
            state: self.data.state.kind(),
        }
    }

    fn fail(&mut self, error: ServiceError, retryable: bool) -> SessionResult<()> {
        warn!(%error, retryable, "session operation failed");
        self.transition(SessionState::failed(&error, retryable));
        Err(SessionError::Service {
            source: error,
            retryable,
        })
    }

    fn transition(&mut self, next: SessionState) {
        debug!(from = %self.data.state.kind(), to = %next.kind(), "session transition");
        self.data.state = next;
        self.publish();
    }

    fn publish(&self) {
        self.data.publish(&self.publisher);
    }
}

fn same_items(a: &ComparisonPair, b: &ComparisonPair) -> bool {
    let (a_left, a_right) = a.ids();
    let (b_left, b_right) = b.ids();
    (a_left == b_left && a_right == b_right) || (a_left == b_right && a_right == b_left)
}
