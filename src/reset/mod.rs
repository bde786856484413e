//! Reset-and-retry protocol for resuming comparisons after a destructive reset.
//!
//! A reset may leave the server without a pair for a short while (it re-seeds
//! its working set), and a collection with fewer than two items never yields
//! one. The coordinator therefore retries pair acquisition a bounded number of
//! times and reports the reset and the continuation as separate outcomes.

pub mod coordinator;
pub mod error;
pub mod policy;
pub mod types;


pub use coordinator::ResetCoordinator;
pub use error::{ResetError, ResetResult};
pub use policy::ResetPolicy;
pub use types::{Continuation, ResetProgress, ResetReport};
