//! Configuration error types.

use thiserror::Error;

/// Errors that can occur while loading configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A numeric variable could not be parsed.
    #[error("invalid value '{value}' for {name}: expected a non-negative integer")]
    InvalidNumber { name: &'static str, value: String },

    /// Zero post-reset attempts would never resume a session.
    #[error("reset attempts must be at least 1")]
    InvalidAttempts,

    #[error("request timeout must be greater than zero")]
    InvalidTimeout,

    /// API URL is missing an `http://` or `https://` scheme, or a host.
    #[error("invalid API URL '{value}': expected http:// or https://")]
    InvalidUrl { value: String },
}
