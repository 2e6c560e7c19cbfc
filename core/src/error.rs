//! Error types for the Webfry client.
//!
//! # Design
//! Every failing call returns exactly one `ApiError`. The four kinds a caller
//! branches on are `Configuration` (nothing was sent), `Timeout`,
//! `Transport` (the request never produced a response) and `Api` (the server
//! answered with a non-2xx status). `Serialization` and `UnexpectedShape`
//! cover request bodies that fail to serialize and success payloads that do
//! not fit the operation's response type.

use std::time::Duration;

use serde_json::Value;
use thiserror::Error;

/// Failure raised by a `Transport` before any response was produced.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The underlying HTTP stack failed (DNS, connect, TLS, body read).
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The transport observed the cancel signal and gave up.
    #[error("request was cancelled")]
    Cancelled,

    /// Failure reported by a custom transport.
    #[error("{0}")]
    Other(String),
}

/// Whatever the error response carried, for inspection beyond the message.
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorPayload {
    /// The body parsed as JSON.
    Json(Value),
    /// The body was not JSON; kept verbatim (raw-text operations only).
    Text(String),
    /// Empty body, or unparseable body on a JSON operation.
    Empty,
}

impl ErrorPayload {
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            ErrorPayload::Json(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            ErrorPayload::Text(text) => Some(text),
            _ => None,
        }
    }
}

/// Errors returned by `WebfryClient` operations.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The call cannot be made as configured, e.g. a required API key is not
    /// set. No network activity took place.
    #[error("{message}")]
    Configuration { message: String },

    /// No response arrived within the configured timeout.
    #[error("Request timeout after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    /// The request failed below HTTP; no status was received.
    #[error(transparent)]
    Transport(TransportError),

    /// The server answered with a non-2xx status.
    #[error("{message}")]
    Api {
        message: String,
        status: u16,
        payload: ErrorPayload,
    },

    /// The request body could not be serialized to JSON.
    #[error("failed to serialize request body: {0}")]
    Serialization(#[source] serde_json::Error),

    /// A successful response did not fit the operation's response type.
    #[error("unexpected response shape: {source}")]
    UnexpectedShape {
        #[source]
        source: serde_json::Error,
        payload: Option<Value>,
    },
}

impl ApiError {
    pub(crate) fn missing_api_key() -> Self {
        ApiError::Configuration {
            message: "API key is required for this endpoint. Use set_api_key() first.".to_string(),
        }
    }

    pub(crate) fn timeout(timeout: Duration) -> Self {
        ApiError::Timeout {
            timeout_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
        }
    }

    /// HTTP status of an `Api` error; 0 for failures that never reached the
    /// server.
    pub fn status(&self) -> u16 {
        match self {
            ApiError::Api { status, .. } => *status,
            _ => 0,
        }
    }

    /// Error payload of an `Api` error.
    pub fn payload(&self) -> Option<&ErrorPayload> {
        match self {
            ApiError::Api { payload, .. } => Some(payload),
            _ => None,
        }
    }

    pub fn is_configuration(&self) -> bool {
        matches!(self, ApiError::Configuration { .. })
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, ApiError::Timeout { .. })
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, ApiError::Transport(_))
    }

    /// Whether repeating the same call could reasonably succeed.
    ///
    /// Timeouts and transport failures qualify, as do 429 and 5xx responses.
    /// Nothing in this crate retries on its own.
    pub fn is_retryable(&self) -> bool {
        match self {
            ApiError::Timeout { .. } | ApiError::Transport(_) => true,
            ApiError::Api { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

impl From<TransportError> for ApiError {
    fn from(e: TransportError) -> Self {
        ApiError::Transport(e)
    }
}

pub type Result<T, E = ApiError> = std::result::Result<T, E>;
