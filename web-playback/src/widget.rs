//! Seam to the vendor playback widget.
//!
//! The widget itself (audio decoding, device registration, event emission)
//! lives outside this crate. A [`WidgetFactory`] constructs it from
//! [`PlayerOptions`], a [`TokenAccessor`] and the [`EventSender`] it must
//! push [`WidgetEvent`](crate::WidgetEvent)s into.

use crate::error::{Result, SessionError};
use crate::event::WidgetEvent;
use async_trait::async_trait;
use futures::future::BoxFuture;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Channel end handed to the widget for emitting events.
pub type EventSender = mpsc::UnboundedSender<WidgetEvent>;

const DEFAULT_NAME: &str = "Rust Web Player";
const DEFAULT_VOLUME: f32 = 0.5;

/// Construction options for the widget.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerOptions {
    /// Device name shown in Spotify Connect pickers.
    pub name: String,
    /// Initial volume, `0.0..=1.0`.
    pub volume: f32,
}

impl Default for PlayerOptions {
    fn default() -> Self {
        Self {
            name: DEFAULT_NAME.to_owned(),
            volume: DEFAULT_VOLUME,
        }
    }
}

impl PlayerOptions {
    pub fn with_volume(volume: f32) -> Self {
        Self {
            volume,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.volume) {
            return Err(SessionError::InvalidVolume(self.volume));
        }
        Ok(())
    }
}

/// Async access token source for the widget.
///
/// The widget may call it any number of times (including zero), whenever it
/// needs a token; callers must not assume it runs synchronously.
#[derive(Clone)]
pub struct TokenAccessor(Arc<dyn Fn() -> BoxFuture<'static, String> + Send + Sync>);

impl TokenAccessor {
    pub fn new<F, Fut>(f: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = String> + Send + 'static,
    {
        Self(Arc::new(move || -> BoxFuture<'static, String> { Box::pin(f()) }))
    }

    /// Always hand out the same token.
    pub fn fixed(token: impl Into<String>) -> Self {
        let token: Arc<str> = token.into().into();
        Self::new(move || {
            let token = Arc::clone(&token);
            async move { token.to_string() }
        })
    }

    pub async fn token(&self) -> String {
        (self.0)().await
    }
}

impl fmt::Debug for TokenAccessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("TokenAccessor")
    }
}

/// A constructed playback widget.
#[async_trait]
pub trait PlaybackWidget: Send {
    /// Connect to Spotify. Resolves to `true` once the connection attempt
    /// succeeded; `ready` follows as an event.
    async fn connect(&mut self) -> bool;

    /// Disconnect and release the device.
    async fn disconnect(&mut self);
}

/// Builds a [`PlaybackWidget`].
pub trait WidgetFactory: Send {
    type Widget: PlaybackWidget;

    fn construct(
        &self,
        options: &PlayerOptions,
        token: TokenAccessor,
        events: EventSender,
    ) -> Self::Widget;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn default_options() {
        let opts = PlayerOptions::default();
        assert_eq!(opts.name, "Rust Web Player");
        assert!((opts.volume - 0.5).abs() < f32::EPSILON);
        assert!(opts.validate().is_ok());
    }

    #[test]
    fn volume_outside_unit_range_is_rejected() {
        for v in [-0.1, 1.01, f32::NAN] {
            assert!(matches!(
                PlayerOptions::with_volume(v).validate(),
                Err(SessionError::InvalidVolume(_))
            ));
        }
        assert!(PlayerOptions::with_volume(0.0).validate().is_ok());
        assert!(PlayerOptions::with_volume(1.0).validate().is_ok());
    }

    #[tokio::test]
    async fn fixed_accessor_can_be_called_repeatedly() {
        let accessor = TokenAccessor::fixed("BQDtoken");
        assert_eq!(accessor.token().await, "BQDtoken");
        assert_eq!(accessor.clone().token().await, "BQDtoken");
    }

    #[tokio::test]
    async fn custom_accessor_runs_per_call() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let accessor = TokenAccessor::new(move || {
            let n = counter.fetch_add(1, Ordering::SeqCst);
            async move { format!("token-{n}") }
        });
        assert_eq!(accessor.token().await, "token-0");
        assert_eq!(accessor.token().await, "token-1");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
