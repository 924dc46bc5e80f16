//! Spotify Web Playback session.
//!
//! Wraps the vendor playback widget (the in-browser player that turns the
//! host into a Spotify Connect device) in a typed lifecycle:
//!
//! 1. [`PlaybackSession::initialize`] constructs the widget through a
//!    [`WidgetFactory`] with a name, a [`TokenAccessor`] and an initial volume
//! 2. [`PlaybackSession::connect`] asks the widget to connect
//! 3. [`PlaybackSession::next_event`] receives [`WidgetEvent`]s over a channel
//!    and applies them to the [`SessionState`] machine
//!
//! Once a `ready` event arrives, [`PlaybackSession::device_id`] yields the id
//! to address with the Web API player endpoints (transfer, play, pause, ...).
//!
//! Every processed event is also reported to an injected
//! [`SessionObserver`]; the default [`TracingObserver`] logs through
//! `tracing`. Widget errors are additionally returned to the caller. The
//! session never reconnects on its own.

pub mod error;
pub mod event;
pub mod observer;
pub mod session;
pub mod widget;

pub use error::{Result, SessionError};
pub use event::{DeviceId, PlaybackState, RepeatMode, WidgetErrorKind, WidgetEvent};
pub use observer::{SessionObserver, TracingObserver};
pub use session::{PlaybackSession, SessionState, SessionUpdate};
pub use widget::{EventSender, PlaybackWidget, PlayerOptions, TokenAccessor, WidgetFactory};
