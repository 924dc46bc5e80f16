//! Error types for the Spotify Web API client.

use std::convert::Infallible;

use thiserror::Error;

/// Errors that can occur when interacting with the Spotify Web API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// A caller-supplied value is outside its allowed set or range.
    ///
    /// Raised before any request is built, so nothing reaches the service:
    /// - repeat state other than `track`, `context`, `off`
    /// - shuffle state other than `true`, `false`
    /// - search or library item type outside the fixed sets
    /// - volume percent above 100, empty device or user id
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// HTTP transport error (connection refused, timeout, TLS failure, or a
    /// non-success status). Passed through exactly as reqwest reports it.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The response body was not valid JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// File I/O error (token store read/write).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Catch-all for other errors (e.g. missing config directory).
    #[error("{0}")]
    Other(String),
}

impl ApiError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Reject an empty identifier (device id, user id, item id).
    pub(crate) fn require_present(field: &str, value: &str) -> Result<()> {
        if value.trim().is_empty() {
            return Err(Self::invalid(format!("{field} must not be empty")));
        }
        Ok(())
    }

    /// Whether this error was raised by local validation rather than by the
    /// transport.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument(_))
    }
}

// Lets already-typed arguments flow through the same `TryInto` bounds as
// unvalidated strings.
impl From<Infallible> for ApiError {
    fn from(never: Infallible) -> Self {
        match never {}
    }
}

/// Convenience alias for `Result<T, ApiError>`.
pub type Result<T> = std::result::Result<T, ApiError>;
