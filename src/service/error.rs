use std::fmt;

use thiserror::Error;

/// Remote operations, used to label errors, logs and mock faults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    ListItems,
    NextPair,
    AddItem,
    DeleteItem,
    SubmitChoice,
    Reset,
}

impl Endpoint {
    pub fn as_str(&self) -> &'static str {
        match self {
            Endpoint::ListItems => "GET /rankings",
            Endpoint::NextPair => "GET /next-pair",
            Endpoint::AddItem => "POST /entries",
            Endpoint::DeleteItem => "DELETE /items/{id}",
            Endpoint::SubmitChoice => "POST /choose",
            Endpoint::Reset => "POST /reset",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors surfaced by [`RankingService`](super::RankingService) implementations.
///
/// None of these are retried by the transport.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ServiceError {
    /// The request never produced a response (unreachable host, timeout, reset connection).
    #[error("network error on {endpoint}: {message}")]
    Network {
        endpoint: Endpoint,
        message: String,
    },

    /// The server answered with a non-success status.
    #[error("{endpoint} returned HTTP {status}: {body}")]
    Server {
        endpoint: Endpoint,
        status: u16,
        body: String,
    },

    /// The response body did not match the expected shape.
    #[error("failed to decode {endpoint} response: {message}")]
    Decode {
        endpoint: Endpoint,
        message: String,
    },

    /// The HTTP client itself could not be constructed.
    #[error("failed to set up HTTP client: {0}")]
    ClientSetup(String),
}

impl ServiceError {
    pub fn network(endpoint: Endpoint, message: impl Into<String>) -> Self {
        Self::Network {
            endpoint,
            message: message.into(),
        }
    }

    pub fn server(endpoint: Endpoint, status: u16, body: impl Into<String>) -> Self {
        Self::Server {
            endpoint,
            status,
            body: body.into(),
        }
    }

    pub fn decode(endpoint: Endpoint, message: impl Into<String>) -> Self {
        Self::Decode {
            endpoint,
            message: message.into(),
        }
    }

    /// The endpoint that failed, if the error came from a request.
    pub fn endpoint(&self) -> Option<Endpoint> {
        match self {
            Self::Network { endpoint, .. }
            | Self::Server { endpoint, .. }
            | Self::Decode { endpoint, .. } => Some(*endpoint),
            Self::ClientSetup(_) => None,
        }
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;
