//! Cross-cutting, shared constants.
//!
//! Endpoint paths are relative to the configured API base URL.

use std::time::Duration;

pub const DEFAULT_API_URL: &str = "http://localhost:8000/api";

pub const RANKINGS_PATH: &str = "rankings";
pub const NEXT_PAIR_PATH: &str = "next-pair";
pub const ENTRIES_PATH: &str = "entries";
pub const ITEMS_PATH: &str = "items";
pub const CHOOSE_PATH: &str = "choose";
pub const RESET_PATH: &str = "reset";

/// Sent on every request; ranking state changes between calls.
pub const NO_CACHE_DIRECTIVE: &str = "no-store, no-cache";
pub const PRAGMA_NO_CACHE: &str = "no-cache";

pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS);

/// Pair-acquisition attempts after a reset.
pub const DEFAULT_RESET_MAX_ATTEMPTS: u32 = 3;
pub const DEFAULT_RESET_BACKOFF_MS: u64 = 500;
pub const DEFAULT_RESET_BACKOFF: Duration = Duration::from_millis(DEFAULT_RESET_BACKOFF_MS);

/// Minimum number of items for a comparison to exist.
pub const MIN_ITEMS_FOR_PAIR: usize = 2;

/// Longest server body kept in error messages.
pub const MAX_ERROR_BODY_CHARS: usize = 512;
