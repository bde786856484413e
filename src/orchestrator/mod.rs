//! Orchestration surface: the handle a front end drives.
//!
//! [`RankingSession`] wraps a [`SessionMachine`] behind an async mutex. Commands
//! are not queued: a command issued while another is running fails fast with
//! [`SessionError::Busy`]. Observers read [`SessionSnapshot`]s without taking
//! the lock.


use tokio::sync::{Mutex, MutexGuard, watch};
use tracing::debug;

use crate::config::Config;
use crate::model::{ItemId, Side};
use crate::reset::ResetPolicy;
use crate::service::{HttpRankingService, RankingService, ServiceResult};
use crate::session::{SessionError, SessionMachine, SessionResult, SessionSnapshot};

pub struct RankingSession<S> {
    machine: Mutex<SessionMachine<S>>,
    updates: watch::Receiver<SessionSnapshot>,
}

impl RankingSession<HttpRankingService> {
    /// Builds a session talking HTTP to the configured service.
    pub fn connect(config: &Config) -> ServiceResult<Self> {
        let service = HttpRankingService::new(&config.api_url, config.request_timeout)?;
        debug!(api_url = %config.api_url, "ranking service client ready");
        Ok(Self::new(service, config.reset_policy()))
    }
}

impl<S: RankingService> RankingSession<S> {
    pub fn new(service: S, policy: ResetPolicy) -> Self {
        let machine = SessionMachine::new(service, policy);
        let updates = machine.subscribe();
        Self {
            machine: Mutex::new(machine),
            updates,
        }
    }

    /// Receives a snapshot after every state transition.
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.updates.clone()
    }

    /// Latest published snapshot. Never blocks on a running command.
    pub fn snapshot(&self) -> SessionSnapshot {
        self.updates.borrow().clone()
    }

    pub async fn initialize(&self) -> SessionResult<()> {
        self.acquire("initialize")?.initialize().await
    }

    pub async fn choose(&self, side: Side) -> SessionResult<()> {
        self.acquire("choose")?.choose(side).await
    }

    pub async fn add_item(&self, title: &str, description: &str) -> SessionResult<()> {
        self.acquire("add_item")?.add_item(title, description).await
    }

    pub async fn delete_item(&self, id: &ItemId) -> SessionResult<()> {
        self.acquire("delete_item")?.delete_item(id).await
    }

    pub async fn reset(&self) -> SessionResult<()> {
        self.acquire("reset")?.reset().await
    }

    fn acquire(&self, operation: &'static str) -> SessionResult<MutexGuard<'_, SessionMachine<S>>> {
        self.machine.try_lock().map_err(|_| {
            debug!(operation, "rejected while another command is running");
            SessionError::Busy
        })
    }
}
