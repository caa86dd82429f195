//! Error types for the health metrics API client.
//!
//! # Design
//! Four kinds, one per place a call can go wrong: local input (`Validation`),
//! the server saying no (`RequestFailed`), no server at all
//! (`NetworkUnavailable`), and a reply we cannot read (`MalformedResponse`).
//! `Validation` and `RequestFailed` display their message verbatim so the
//! presentation layer can show it to the user unchanged.

/// Errors returned by `HealthClient` and `Session` operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ApiError {
    /// Local input was missing or did not parse. No request was sent.
    #[error("{0}")]
    Validation(String),

    /// The server answered with a non-2xx status.
    #[error("{message}")]
    RequestFailed { status: u16, message: String },

    /// No response was obtained (connection refused, timeout, dropped socket).
    #[error("network unavailable: {0}")]
    NetworkUnavailable(String),

    /// A 2xx response body did not match the expected shape.
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::Validation(message.into())
    }

    /// HTTP status for `RequestFailed`, `None` for every other kind.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::RequestFailed { status, .. } => Some(*status),
            _ => None,
        }
    }
}
