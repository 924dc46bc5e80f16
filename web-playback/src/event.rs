//! Events emitted by the playback widget.
//!
//! The widget reports its lifecycle through seven named events. Each one is a
//! [`WidgetEvent`] variant; widgets push them into the session's channel
//! instead of invoking registered callbacks.
//!
//! | Event name              | Variant                                | Payload                 |
//! |-------------------------|----------------------------------------|-------------------------|
//! | `initialization_error`  | [`WidgetEvent::InitializationError`]   | `{ "message": "..." }`  |
//! | `authentication_error`  | [`WidgetEvent::AuthenticationError`]   | `{ "message": "..." }`  |
//! | `account_error`         | [`WidgetEvent::AccountError`]          | `{ "message": "..." }`  |
//! | `playback_error`        | [`WidgetEvent::PlaybackError`]         | `{ "message": "..." }`  |
//! | `player_state_changed`  | [`WidgetEvent::PlayerStateChanged`]    | state object or `null`  |
//! | `ready`                 | [`WidgetEvent::Ready`]                 | `{ "device_id": "..." }`|
//! | `not_ready`             | [`WidgetEvent::NotReady`]              | `{ "device_id": "..." }`|

use crate::error::{Result, SessionError};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Identifier of a playback-capable device. Opaque.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceId(String);

impl DeviceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DeviceId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<String> for DeviceId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// The four error categories the widget reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidgetErrorKind {
    /// The environment cannot run the widget (e.g. no EME support).
    Initialization,
    /// The access token was rejected.
    Authentication,
    /// The account cannot play (not Premium).
    Account,
    /// An item failed to load or play.
    Playback,
}

impl WidgetErrorKind {
    pub fn event_name(self) -> &'static str {
        match self {
            Self::Initialization => "initialization_error",
            Self::Authentication => "authentication_error",
            Self::Account => "account_error",
            Self::Playback => "playback_error",
        }
    }
}

impl fmt::Display for WidgetErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Initialization => "initialization",
            Self::Authentication => "authentication",
            Self::Account => "account",
            Self::Playback => "playback",
        })
    }
}

/// Repeat mode as the widget encodes it (`0`, `1`, `2`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepeatMode {
    Off,
    Context,
    Track,
}

/// Artist or album reference inside a [`WebTrack`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Named {
    pub name: String,
    pub uri: String,
}

/// Track as described by the widget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebTrack {
    pub uri: String,
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub duration_ms: u64,
    #[serde(default)]
    pub artists: Vec<Named>,
    pub album: Option<Named>,
}

/// Current, previous and upcoming tracks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackWindow {
    pub current_track: Option<WebTrack>,
    #[serde(default)]
    pub previous_tracks: Vec<WebTrack>,
    #[serde(default)]
    pub next_tracks: Vec<WebTrack>,
}

/// Snapshot of local playback, carried by `player_state_changed`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaybackState {
    pub paused: bool,
    /// Position in milliseconds.
    pub position: u64,
    /// Duration of the current item in milliseconds.
    pub duration: u64,
    pub shuffle: bool,
    pub repeat_mode: u8,
    #[serde(default)]
    pub track_window: TrackWindow,
}

impl PlaybackState {
    pub fn repeat(&self) -> RepeatMode {
        match self.repeat_mode {
            1 => RepeatMode::Context,
            2 => RepeatMode::Track,
            _ => RepeatMode::Off,
        }
    }

    pub fn current_track(&self) -> Option<&WebTrack> {
        self.track_window.current_track.as_ref()
    }
}

/// One event from the playback widget.
#[derive(Debug, Clone, PartialEq)]
pub enum WidgetEvent {
    InitializationError { message: String },
    AuthenticationError { message: String },
    AccountError { message: String },
    PlaybackError { message: String },
    /// `None` when playback moved to another device.
    PlayerStateChanged(Option<PlaybackState>),
    Ready { device_id: DeviceId },
    NotReady { device_id: DeviceId },
}

#[derive(Deserialize)]
struct MessagePayload {
    message: String,
}

#[derive(Deserialize)]
struct DevicePayload {
    device_id: DeviceId,
}

impl WidgetEvent {
    /// Build the error variant for `kind`.
    pub fn error(kind: WidgetErrorKind, message: impl Into<String>) -> Self {
        let message = message.into();
        match kind {
            WidgetErrorKind::Initialization => Self::InitializationError { message },
            WidgetErrorKind::Authentication => Self::AuthenticationError { message },
            WidgetErrorKind::Account => Self::AccountError { message },
            WidgetErrorKind::Playback => Self::PlaybackError { message },
        }
    }

    /// Vendor event name of this variant.
    pub fn name(&self) -> &'static str {
        match self {
            Self::InitializationError { .. } => "initialization_error",
            Self::AuthenticationError { .. } => "authentication_error",
            Self::AccountError { .. } => "account_error",
            Self::PlaybackError { .. } => "playback_error",
            Self::PlayerStateChanged(_) => "player_state_changed",
            Self::Ready { .. } => "ready",
            Self::NotReady { .. } => "not_ready",
        }
    }

    /// Error category and message, for the four error variants.
    pub fn as_error(&self) -> Option<(WidgetErrorKind, &str)> {
        match self {
            Self::InitializationError { message } => Some((WidgetErrorKind::Initialization, message)),
            Self::AuthenticationError { message } => Some((WidgetErrorKind::Authentication, message)),
            Self::AccountError { message } => Some((WidgetErrorKind::Account, message)),
            Self::PlaybackError { message } => Some((WidgetErrorKind::Playback, message)),
            _ => None,
        }
    }

    /// Decode a raw `(name, payload)` pair as delivered by the vendor
    /// listener interface.
    pub fn from_vendor(name: &str, payload: Value) -> Result<Self> {
        let bad = |source| SessionError::Payload {
            event: name.to_owned(),
            source,
        };
        let message = |payload| {
            serde_json::from_value::<MessagePayload>(payload)
                .map(|p| p.message)
                .map_err(bad)
        };
        let device = |payload| {
            serde_json::from_value::<DevicePayload>(payload)
                .map(|p| p.device_id)
                .map_err(bad)
        };

        Ok(match name {
            "initialization_error" => Self::error(WidgetErrorKind::Initialization, message(payload)?),
            "authentication_error" => Self::error(WidgetErrorKind::Authentication, message(payload)?),
            "account_error" => Self::error(WidgetErrorKind::Account, message(payload)?),
            "playback_error" => Self::error(WidgetErrorKind::Playback, message(payload)?),
            "player_state_changed" => {
                Self::PlayerStateChanged(serde_json::from_value(payload).map_err(bad)?)
            }
            "ready" => Self::Ready {
                device_id: device(payload)?,
            },
            "not_ready" => Self::NotReady {
                device_id: device(payload)?,
            },
            other => return Err(SessionError::UnknownEvent(other.to_owned())),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_ready_and_not_ready() {
        let ev = WidgetEvent::from_vendor("ready", json!({ "device_id": "abc" })).unwrap();
        assert_eq!(ev, WidgetEvent::Ready { device_id: "abc".into() });
        assert_eq!(ev.name(), "ready");

        let ev = WidgetEvent::from_vendor("not_ready", json!({ "device_id": "abc" })).unwrap();
        assert_eq!(ev.name(), "not_ready");
    }

    #[test]
    fn decodes_each_error_category() {
        for kind in [
            WidgetErrorKind::Initialization,
            WidgetErrorKind::Authentication,
            WidgetErrorKind::Account,
            WidgetErrorKind::Playback,
        ] {
            let ev = WidgetEvent::from_vendor(kind.event_name(), json!({ "message": "boom" })).unwrap();
            assert_eq!(ev.as_error(), Some((kind, "boom")));
            assert_eq!(ev.name(), kind.event_name());
        }
    }

    #[test]
    fn decodes_state_changed_snapshot() {
        let payload = json!({
            "paused": false,
            "position": 12_000,
            "duration": 240_000,
            "shuffle": true,
            "repeat_mode": 2,
            "track_window": {
                "current_track": {
                    "uri": "spotify:track:xxxx",
                    "id": "xxxx",
                    "name": "One More Time",
                    "duration_ms": 240_000,
                    "artists": [{ "name": "Daft Punk", "uri": "spotify:artist:4tZwfgrHOc3mvqYlEYSvVi" }],
                    "album": { "name": "Discovery", "uri": "spotify:album:2noRn2Aes5aoNVsU6iWThc" }
                },
                "previous_tracks": [],
                "next_tracks": []
            }
        });
        let ev = WidgetEvent::from_vendor("player_state_changed", payload).unwrap();
        let WidgetEvent::PlayerStateChanged(Some(state)) = ev else {
            panic!("expected a state snapshot");
        };
        assert_eq!(state.repeat(), RepeatMode::Track);
        assert_eq!(state.current_track().unwrap().name, "One More Time");
    }

    #[test]
    fn null_state_means_playback_moved_away() {
        let ev = WidgetEvent::from_vendor("player_state_changed", Value::Null).unwrap();
        assert_eq!(ev, WidgetEvent::PlayerStateChanged(None));
    }

    #[test]
    fn rejects_unknown_names_and_bad_payloads() {
        assert!(matches!(
            WidgetEvent::from_vendor("autoplay_failed", json!({})),
            Err(SessionError::UnknownEvent(name)) if name == "autoplay_failed"
        ));
        assert!(matches!(
            WidgetEvent::from_vendor("ready", json!({ "id": 1 })),
            Err(SessionError::Payload { .. })
        ));
    }
}
