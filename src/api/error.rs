//! Client Error Types
//!
//! Every gateway call resolves to a [`ClientError`] on failure. The variant
//! records which kind of call failed; the payload carries the message the
//! server put in its error body, when there was one.

use thiserror::Error;

/// Errors surfaced by the API gateway and the client-side checks in front of it
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClientError {
    /// Login rejected (bad credentials)
    #[error("Authentication failed: {}", detail_or(.0, "invalid credentials"))]
    Auth(Option<String>),

    /// Registration fields rejected by the server
    #[error("Validation error: {}", detail_or(.0, "registration rejected"))]
    Validation(Option<String>),

    /// File rejected, either client-side (extension) or by the server parser
    #[error("Upload error: {}", detail_or(.0, "file could not be processed"))]
    Upload(Option<String>),

    /// History or report retrieval failed
    #[error("Fetch error: {}", detail_or(.0, "request failed"))]
    Fetch(Option<String>),

    /// Transport-level failure (backend unreachable, connection reset, ...)
    #[error("Network error: {0}")]
    Network(String),
}

fn detail_or<'a>(detail: &'a Option<String>, fallback: &'a str) -> &'a str {
    detail.as_deref().unwrap_or(fallback)
}

impl ClientError {
    /// Message taken from the response body (or the client-side check), if any
    pub fn detail(&self) -> Option<&str> {
        match self {
            ClientError::Auth(detail)
            | ClientError::Validation(detail)
            | ClientError::Upload(detail)
            | ClientError::Fetch(detail) => detail.as_deref(),
            ClientError::Network(_) => None,
        }
    }

    /// Text to show the user: the server's message, else the view's fallback
    pub fn user_message(&self, fallback: &str) -> String {
        self.detail().unwrap_or(fallback).to_string()
    }

    pub fn is_network(&self) -> bool {
        matches!(self, ClientError::Network(_))
    }
}

/// Result type for gateway operations
pub type ClientResult<T> = Result<T, ClientError>;
