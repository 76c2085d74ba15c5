//! Error types for the resource client.
//!
//! # Design
//! `NotFound` gets a dedicated variant because callers frequently distinguish
//! "the resource does not exist" from "the server returned an unexpected
//! status." All other non-2xx responses land in `Http` with the raw status
//! code and body for debugging. Transport failures never carry a status code
//! and stay in their own variant.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ApiError>;

/// Errors returned by `ResourceClient` operations.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The caller passed a malformed identifier or entity. No request was sent.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The request never produced a readable response.
    #[error("network error: {0}")]
    Network(#[from] TransportError),

    /// The server returned 404.
    #[error("resource not found")]
    NotFound { body: String },

    /// The server returned a non-2xx status other than 404.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// A 2xx response whose body was not the expected JSON shape.
    #[error("decode failed: {0}")]
    Decode(String),
}

/// Informal subdivision of HTTP error statuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpErrorKind {
    BadRequest,
    Unauthorized,
    Forbidden,
    NotFound,
    ServerError,
    Other,
}

impl HttpErrorKind {
    pub fn from_status(status: u16) -> Self {
        match status {
            400 => HttpErrorKind::BadRequest,
            401 => HttpErrorKind::Unauthorized,
            403 => HttpErrorKind::Forbidden,
            404 => HttpErrorKind::NotFound,
            500..=599 => HttpErrorKind::ServerError,
            _ => HttpErrorKind::Other,
        }
    }
}

impl ApiError {
    /// Status code of the response that produced this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::NotFound { .. } => Some(404),
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn http_kind(&self) -> Option<HttpErrorKind> {
        self.status().map(HttpErrorKind::from_status)
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound { .. })
    }

    /// Raw response body retained for HTTP errors.
    pub fn body(&self) -> Option<&str> {
        match self {
            ApiError::NotFound { body } | ApiError::Http { body, .. } => Some(body),
            _ => None,
        }
    }

    /// Extract a human-readable message from a JSON error body.
    ///
    /// Understands `{"message": ..}`, `{"error": {"message": ..}}`,
    /// `{"error": ".."}` and `{"errors": [{"message": ..}]}`.
    pub fn server_message(&self) -> Option<String> {
        let json: serde_json::Value = serde_json::from_str(self.body()?).ok()?;

        if let Some(message) = json.get("message").and_then(|m| m.as_str()) {
            return Some(message.to_string());
        }

        match json.get("error") {
            Some(serde_json::Value::String(message)) => return Some(message.clone()),
            Some(error) => {
                if let Some(message) = error.get("message").and_then(|m| m.as_str()) {
                    return Some(message.to_string());
                }
            }
            None => {}
        }

        json.get("errors")
            .and_then(|e| e.as_array())
            .and_then(|arr| arr.first())
            .and_then(|e| e.get("message"))
            .and_then(|m| m.as_str())
            .map(str::to_string)
    }
}

/// Failures below the HTTP layer: nothing came back that has a status code.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("connection failed: {0}")]
    Connect(String),

    #[error("request timed out")]
    Timeout,

    #[error("failed to read response body: {0}")]
    Body(String),

    #[error("request failed: {0}")]
    Request(String),

    #[error("invalid request path {path:?}: {reason}")]
    InvalidPath { path: String, reason: String },
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TransportError::Timeout
        } else if err.is_connect() {
            TransportError::Connect(err.to_string())
        } else if err.is_body() || err.is_decode() {
            TransportError::Body(err.to_string())
        } else {
            TransportError::Request(err.to_string())
        }
    }
}
