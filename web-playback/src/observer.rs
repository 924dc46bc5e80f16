//! Observability sink for session events.

use crate::event::{DeviceId, PlaybackState, WidgetErrorKind};

/// Receives every lifecycle event the session processes.
///
/// All methods default to doing nothing. The session calls them after
/// applying the transition, on the task that drives
/// [`next_event`](crate::PlaybackSession::next_event).
pub trait SessionObserver: Send + Sync {
    fn on_connected(&self, _success: bool) {}
    fn on_ready(&self, _device_id: &DeviceId) {}
    fn on_not_ready(&self, _device_id: &DeviceId) {}
    fn on_state_changed(&self, _state: Option<&PlaybackState>) {}
    fn on_error(&self, _kind: WidgetErrorKind, _message: &str) {}
}

/// Default observer: structured `tracing` output.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl SessionObserver for TracingObserver {
    fn on_connected(&self, success: bool) {
        if success {
            tracing::info!("Web Playback widget connected to Spotify");
        } else {
            tracing::warn!("Web Playback widget failed to connect");
        }
    }

    fn on_ready(&self, device_id: &DeviceId) {
        tracing::info!(device_id = %device_id, "Ready with device id");
    }

    fn on_not_ready(&self, device_id: &DeviceId) {
        tracing::info!(device_id = %device_id, "Device id has gone offline");
    }

    fn on_state_changed(&self, state: Option<&PlaybackState>) {
        match state {
            Some(s) => tracing::debug!(
                paused = s.paused,
                position_ms = s.position,
                duration_ms = s.duration,
                track = s.current_track().map(|t| t.name.as_str()),
                "Player state changed"
            ),
            None => tracing::debug!("Player state cleared, playback moved to another device"),
        }
    }

    fn on_error(&self, kind: WidgetErrorKind, message: &str) {
        tracing::error!(kind = %kind, error = message, "Web Playback widget error");
    }
}
