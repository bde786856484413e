//! Environment-backed configuration.
//!
//! Every setting has a default. Override with `SUPARANK_*` environment variables.

pub mod error;

#[cfg(test)]
mod tests;

pub use error::ConfigError;

use std::env;
use std::time::Duration;

use crate::constants::{
    DEFAULT_API_URL, DEFAULT_REQUEST_TIMEOUT, DEFAULT_RESET_BACKOFF, DEFAULT_RESET_MAX_ATTEMPTS,
};
use crate::reset::ResetPolicy;

/// Client configuration loaded from environment variables.
///
/// Use [`Config::from_env`] to read `SUPARANK_*` overrides on top of defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Base URL of the ranking service, without a trailing `/`.
    /// Default: `http://localhost:8000/api`.
    pub api_url: String,

    /// Per-request timeout. Default: 10 s.
    pub request_timeout: Duration,

    /// Pair fetches attempted after a reset. Default: `3`.
    pub reset_max_attempts: u32,

    /// Wait between post-reset pair fetches. Default: 500 ms.
    pub reset_backoff: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            reset_max_attempts: DEFAULT_RESET_MAX_ATTEMPTS,
            reset_backoff: DEFAULT_RESET_BACKOFF,
        }
    }
}

impl Config {
    pub const ENV_API_URL: &'static str = "SUPARANK_API_URL";
    pub const ENV_REQUEST_TIMEOUT_SECS: &'static str = "SUPARANK_REQUEST_TIMEOUT_SECS";
    pub const ENV_RESET_MAX_ATTEMPTS: &'static str = "SUPARANK_RESET_MAX_ATTEMPTS";
    pub const ENV_RESET_BACKOFF_MS: &'static str = "SUPARANK_RESET_BACKOFF_MS";

    /// Loads configuration from environment variables (falling back to defaults).
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let api_url = match Self::read_trimmed(Self::ENV_API_URL) {
            Some(value) => normalize_api_url(&value)?,
            None => defaults.api_url,
        };

        let request_timeout = Self::parse_u64_from_env(Self::ENV_REQUEST_TIMEOUT_SECS)?
            .map(Duration::from_secs)
            .unwrap_or(defaults.request_timeout);
        if request_timeout.is_zero() {
            return Err(ConfigError::InvalidTimeout);
        }

        let reset_max_attempts = match Self::parse_u64_from_env(Self::ENV_RESET_MAX_ATTEMPTS)? {
            Some(0) => return Err(ConfigError::InvalidAttempts),
            Some(value) => u32::try_from(value).map_err(|_| ConfigError::InvalidNumber {
                name: Self::ENV_RESET_MAX_ATTEMPTS,
                value: value.to_string(),
            })?,
            None => defaults.reset_max_attempts,
        };

        let reset_backoff = Self::parse_u64_from_env(Self::ENV_RESET_BACKOFF_MS)?
            .map(Duration::from_millis)
            .unwrap_or(defaults.reset_backoff);

        Ok(Self {
            api_url,
            request_timeout,
            reset_max_attempts,
            reset_backoff,
        })
    }

    /// Replaces the API URL (e.g. from a command-line flag), validating it.
    pub fn with_api_url(mut self, api_url: &str) -> Result<Self, ConfigError> {
        self.api_url = normalize_api_url(api_url)?;
        Ok(self)
    }

    pub fn reset_policy(&self) -> ResetPolicy {
        ResetPolicy::new(self.reset_max_attempts, self.reset_backoff)
    }

    fn read_trimmed(var_name: &str) -> Option<String> {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn parse_u64_from_env(var_name: &'static str) -> Result<Option<u64>, ConfigError> {
        match Self::read_trimmed(var_name) {
            Some(value) => value
                .parse()
                .map(Some)
                .map_err(|_| ConfigError::InvalidNumber {
                    name: var_name,
                    value,
                }),
            None => Ok(None),
        }
    }
}

fn normalize_api_url(value: &str) -> Result<String, ConfigError> {
    let trimmed = value.trim().trim_end_matches('/');
    let has_scheme = trimmed.starts_with("http://") || trimmed.starts_with("https://");
    let has_host = trimmed
        .split_once("://")
        .is_some_and(|(_, rest)| !rest.is_empty());

    if !has_scheme || !has_host {
        return Err(ConfigError::InvalidUrl {
            value: value.to_string(),
        });
    }
    Ok(trimmed.to_string())
}
