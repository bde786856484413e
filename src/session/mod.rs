//! Session state machine for one ranking session.
//!
//! The machine owns the item collection, the current pair, and the single
//! active [`SessionState`]. A choice is accepted only while a pair is on
//! screen, and the displayed pair is always one the server handed out
//! after the most recent mutation.

pub mod error;
pub mod machine;
pub mod snapshot;
pub mod state;


pub use error::{SessionError, SessionResult};
pub use machine::SessionMachine;
pub use snapshot::SessionSnapshot;
pub use state::{CompletionReason, FailureKind, SessionState, StateKind};
