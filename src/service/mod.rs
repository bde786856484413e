//! Remote ranking service client: typed requests, typed responses, typed errors.

pub mod client;
pub mod error;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod wire;


pub use client::{HttpRankingService, RankingService};
pub use error::{Endpoint, ServiceError, ServiceResult};
#[cfg(any(test, feature = "mock"))]
pub use mock::MockRankingService;
pub use wire::PairResponse;
