//! Error types for the Nativ API client.
//!
//! # Design
//! The service reports failures through a handful of HTTP status codes. Each
//! recognized condition gets its own `NativError` variant so callers can
//! branch with a plain `match`; all six carry the same `ApiError` payload
//! (message, optional status, optional raw body). A failure raised locally
//! before any request is sent has no status code, which is how callers tell
//! "caller error" apart from "server-reported error".
//!
//! Failures that never produced a response (connection refused, timeout)
//! stay as `Transport` and are not folded into the taxonomy.

use serde_json::Value;
use thiserror::Error;

/// The six failure kinds the service can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Authentication,
    InsufficientBalance,
    Validation,
    NotFound,
    RateLimit,
    Server,
}

/// Explicit status to kind mapping. Codes missing here fall back by class,
/// see [`ErrorKind::from_status`].
const STATUS_KINDS: &[(u16, ErrorKind)] = &[
    (400, ErrorKind::Validation),
    (401, ErrorKind::Authentication),
    (402, ErrorKind::InsufficientBalance),
    (404, ErrorKind::NotFound),
    (422, ErrorKind::Validation),
    (429, ErrorKind::RateLimit),
];

impl ErrorKind {
    /// Map a non-2xx status code to its failure kind.
    pub fn from_status(status: u16) -> Self {
        STATUS_KINDS
            .iter()
            .find(|(code, _)| *code == status)
            .map(|(_, kind)| *kind)
            .unwrap_or(if status >= 500 {
                ErrorKind::Server
            } else {
                ErrorKind::Validation
            })
    }
}

/// Payload shared by every taxonomy variant of [`NativError`].
#[derive(Debug, Clone, PartialEq)]
pub struct ApiError {
    pub message: String,
    /// `None` when the failure was raised locally.
    pub status: Option<u16>,
    /// Parsed response body exactly as the transport received it.
    pub body: Option<Value>,
}

impl ApiError {
    /// A failure detected before any request was sent.
    pub fn local(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status: None,
            body: None,
        }
    }

    /// A failure reported by the service.
    pub fn from_response(status: u16, body: Value) -> Self {
        Self {
            message: message_from_body(status, &body),
            status: Some(status),
            body: Some(body),
        }
    }
}

/// Prefer `detail`, then `message`, then a synthesized `HTTP {status}`.
fn message_from_body(status: u16, body: &Value) -> String {
    ["detail", "message"]
        .iter()
        .filter_map(|key| body.get(*key))
        .find_map(|value| match value {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        })
        .unwrap_or_else(|| format!("HTTP {status}"))
}

/// Errors returned by `NativClient` operations.
#[derive(Debug, Error)]
pub enum NativError {
    /// Missing or rejected API key (401, or no key at construction time).
    #[error("authentication failed: {}", .0.message)]
    Authentication(ApiError),

    /// The account cannot pay for the request (402).
    #[error("insufficient balance: {}", .0.message)]
    InsufficientBalance(ApiError),

    /// Malformed arguments, caught locally or reported as 400/422/other 4xx.
    #[error("validation failed: {}", .0.message)]
    Validation(ApiError),

    /// The addressed resource does not exist (404).
    #[error("not found: {}", .0.message)]
    NotFound(ApiError),

    /// Too many requests (429).
    #[error("rate limited: {}", .0.message)]
    RateLimit(ApiError),

    /// The service failed (5xx).
    #[error("server error: {}", .0.message)]
    Server(ApiError),

    /// No response was received: connection failure or timeout.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// A file input could not be read.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// A request payload could not be encoded as JSON.
    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl NativError {
    pub fn new(kind: ErrorKind, error: ApiError) -> Self {
        match kind {
            ErrorKind::Authentication => NativError::Authentication(error),
            ErrorKind::InsufficientBalance => NativError::InsufficientBalance(error),
            ErrorKind::Validation => NativError::Validation(error),
            ErrorKind::NotFound => NativError::NotFound(error),
            ErrorKind::RateLimit => NativError::RateLimit(error),
            ErrorKind::Server => NativError::Server(error),
        }
    }

    /// Build the taxonomy error for a non-2xx response.
    pub fn from_status(status: u16, body: Value) -> Self {
        Self::new(
            ErrorKind::from_status(status),
            ApiError::from_response(status, body),
        )
    }

    pub(crate) fn validation(message: impl Into<String>) -> Self {
        NativError::Validation(ApiError::local(message))
    }

    pub(crate) fn authentication(message: impl Into<String>) -> Self {
        NativError::Authentication(ApiError::local(message))
    }

    /// The taxonomy payload, if this is one of the six typed kinds.
    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            NativError::Authentication(e)
            | NativError::InsufficientBalance(e)
            | NativError::Validation(e)
            | NativError::NotFound(e)
            | NativError::RateLimit(e)
            | NativError::Server(e) => Some(e),
            NativError::Transport(_) | NativError::Io(_) | NativError::Serialization(_) => None,
        }
    }

    pub fn kind(&self) -> Option<ErrorKind> {
        Some(match self {
            NativError::Authentication(_) => ErrorKind::Authentication,
            NativError::InsufficientBalance(_) => ErrorKind::InsufficientBalance,
            NativError::Validation(_) => ErrorKind::Validation,
            NativError::NotFound(_) => ErrorKind::NotFound,
            NativError::RateLimit(_) => ErrorKind::RateLimit,
            NativError::Server(_) => ErrorKind::Server,
            NativError::Transport(_) | NativError::Io(_) | NativError::Serialization(_) => {
                return None
            }
        })
    }

    pub fn status(&self) -> Option<u16> {
        self.api_error().and_then(|e| e.status)
    }

    pub fn body(&self) -> Option<&Value> {
        self.api_error().and_then(|e| e.body.as_ref())
    }

    /// True when the request was abandoned because its deadline elapsed.
    pub fn is_timeout(&self) -> bool {
        matches!(self, NativError::Transport(e) if e.is_timeout())
    }
}

pub type Result<T> = std::result::Result<T, NativError>;
