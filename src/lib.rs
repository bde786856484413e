//! Suparank library crate (used by the CLI binary and integration tests).
//!
//! Drives a remote pairwise-comparison ranking service: the user is shown two
//! items at a time, picks one, and the service converges on an order.
//!
//! # Public API Surface
//!
//! ## Orchestration
//! - [`RankingSession`] - Command surface a front end drives (`Busy` on overlap)
//! - [`SessionSnapshot`] - Read-only state published after every transition
//!
//! ## Session State Machine
//! - [`SessionMachine`], [`SessionState`], [`SessionError`]
//!
//! ## Service Client
//! - [`RankingService`] - Async seam over the remote service
//! - [`HttpRankingService`] - JSON-over-HTTP implementation
//!
//! ## Reset Protocol
//! - [`ResetCoordinator`], [`ResetPolicy`] - Bounded pair re-acquisition after a reset
//!
//! ## Views
//! - [`reconcile`], [`RankingView`] - Ranked/unranked partition for display
//!
//! ## Test/Mock Support
//! [`MockRankingService`] is available behind `#[cfg(any(test, feature = "mock"))]`.

pub mod config;
pub mod console;
pub mod constants;
pub mod model;
pub mod orchestrator;
pub mod reset;
pub mod service;
pub mod session;
pub mod view;

pub use config::{Config, ConfigError};
pub use model::{ComparisonPair, Item, ItemId, Judgment, NewItem, Side, SortedSequence};
pub use orchestrator::RankingSession;
pub use reset::{Continuation, ResetCoordinator, ResetError, ResetPolicy, ResetReport};
#[cfg(any(test, feature = "mock"))]
pub use service::MockRankingService;
pub use service::{
    Endpoint, HttpRankingService, PairResponse, RankingService, ServiceError, ServiceResult,
};
pub use session::{
    CompletionReason, FailureKind, SessionError, SessionMachine, SessionResult, SessionSnapshot,
    SessionState, StateKind,
};
pub use view::{RankingView, reconcile};
