//! Error types for calls against the search service.
//!
//! The service is an external collaborator, so there is one error kind for
//! "the service said no": [`EsError::Service`]. It keeps the raw response text
//! untouched so tests can parse it and assert on the exact payload the service
//! produced (a missing-index body, a `found: false` body). The remaining
//! variants cover failures that never reached the service or could not be
//! read back.

use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

/// Result alias used across the crate.
pub type EsResult<T> = Result<T, EsError>;

/// The error type for every operation in this crate.
#[derive(Error, Debug)]
pub enum EsError {
    /// The service answered with a non-2xx status.
    #[error("{message}")]
    Service {
        /// The HTTP status returned by the service.
        status: StatusCode,
        /// The raw response body.
        message: String,
    },

    /// The request did not produce a response.
    #[error("request to the search service failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// A successful response carried a body that is not JSON.
    #[error("could not decode response body: {0}")]
    Decode(#[from] serde_json::Error),

    /// Invalid host, proxy or data file.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl EsError {
    /// Creates a service error from a status and raw body.
    pub fn service(status: StatusCode, message: impl Into<String>) -> Self {
        EsError::Service {
            status,
            message: message.into(),
        }
    }

    /// Returns the raw payload for service errors, or the display text otherwise.
    pub fn message(&self) -> String {
        match self {
            EsError::Service { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }

    /// Parses a service error payload as JSON.
    ///
    /// Returns `None` for non-service errors and for payloads that are not JSON.
    pub fn json(&self) -> Option<Value> {
        match self {
            EsError::Service { message, .. } => serde_json::from_str(message).ok(),
            _ => None,
        }
    }

    /// Returns the HTTP status when the service produced one.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            EsError::Service { status, .. } => Some(*status),
            EsError::Transport(e) => e.status(),
            _ => None,
        }
    }

    /// Returns true when the service answered 404.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(StatusCode::NOT_FOUND)
    }
}
