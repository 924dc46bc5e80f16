//! Error types for the playback session.

use crate::event::WidgetErrorKind;
use thiserror::Error;

/// Errors raised by [`PlaybackSession`](crate::PlaybackSession).
#[derive(Debug, Error)]
pub enum SessionError {
    /// The widget reported one of its four error categories. The session is
    /// now [`Errored`](crate::SessionState::Errored).
    #[error("{kind} error: {message}")]
    Widget {
        kind: WidgetErrorKind,
        message: String,
    },

    /// `connect()` completed with `false`.
    #[error("playback widget failed to connect")]
    ConnectFailed,

    /// The requested operation is not allowed in the current state.
    #[error("cannot {action} while {state}")]
    InvalidTransition {
        action: &'static str,
        state: String,
    },

    /// Initial volume outside `0.0..=1.0`.
    #[error("volume must be within 0.0..=1.0, got {0}")]
    InvalidVolume(f32),

    /// An event name outside the seven the widget emits.
    #[error("unknown widget event `{0}`")]
    UnknownEvent(String),

    /// A known event carried a payload that does not match its shape.
    #[error("malformed `{event}` payload: {source}")]
    Payload {
        event: String,
        #[source]
        source: serde_json::Error,
    },

    /// The widget dropped its event sender.
    #[error("widget event channel closed")]
    Closed,
}

/// Result type for session operations.
pub type Result<T> = std::result::Result<T, SessionError>;
