//! Connection lifecycle of the playback widget.
//!
//! ```text
//! Uninitialized ──initialize()──▶ Constructed ──connect()──▶ Connecting
//!                                                               │ ready
//!                                                               ▼
//!                                      NotReady ◀──not_ready── Ready
//!                                          └──────── ready ───────▲
//!
//! any state ── *_error / failed connect ──▶ Errored (terminal)
//! ```
//!
//! `player_state_changed` never changes the state; it is passed to the
//! observer and returned to the caller as a [`SessionUpdate`].

use crate::error::{Result, SessionError};
use crate::event::{DeviceId, PlaybackState, WidgetErrorKind, WidgetEvent};
use crate::observer::{SessionObserver, TracingObserver};
use crate::widget::{PlaybackWidget, PlayerOptions, TokenAccessor, WidgetFactory};
use std::fmt;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Where the session is in the widget lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Uninitialized,
    Constructed,
    Connecting,
    /// The device is addressable through the Web API.
    Ready(DeviceId),
    /// The device went offline; it may come back with `ready`.
    NotReady(DeviceId),
    Errored {
        kind: WidgetErrorKind,
        message: String,
    },
}

impl SessionState {
    fn accepts_device_events(&self) -> bool {
        matches!(self, Self::Connecting | Self::Ready(_) | Self::NotReady(_))
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uninitialized => f.write_str("uninitialized"),
            Self::Constructed => f.write_str("constructed"),
            Self::Connecting => f.write_str("connecting"),
            Self::Ready(id) => write!(f, "ready ({id})"),
            Self::NotReady(id) => write!(f, "not ready ({id})"),
            Self::Errored { kind, .. } => write!(f, "errored ({kind})"),
        }
    }
}

/// Outcome of one processed widget event.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionUpdate {
    Ready(DeviceId),
    NotReady(DeviceId),
    StateChanged(Option<PlaybackState>),
    /// The event arrived in a state that does not accept it; nothing changed.
    Ignored(WidgetEvent),
}

/// Owns one playback widget and drives its lifecycle.
///
/// ```no_run
/// # use web_playback::{PlaybackSession, PlayerOptions, TokenAccessor, SessionUpdate, WidgetFactory};
/// # async fn demo<F: WidgetFactory>(factory: F) -> web_playback::Result<()> {
/// let mut session = PlaybackSession::new(factory, PlayerOptions::default(), TokenAccessor::fixed("BQD..."));
/// session.initialize()?;
/// session.connect().await?;
///
/// loop {
///     if let SessionUpdate::Ready(device_id) = session.next_event().await? {
///         println!("transfer playback to {device_id}");
///     }
/// }
/// # }
/// ```
pub struct PlaybackSession<F: WidgetFactory> {
    factory: F,
    options: PlayerOptions,
    token: TokenAccessor,
    observer: Arc<dyn SessionObserver>,
    state: SessionState,
    widget: Option<F::Widget>,
    events: Option<mpsc::UnboundedReceiver<WidgetEvent>>,
}

impl<F: WidgetFactory> PlaybackSession<F> {
    pub fn new(factory: F, options: PlayerOptions, token: TokenAccessor) -> Self {
        Self {
            factory,
            options,
            token,
            observer: Arc::new(TracingObserver),
            state: SessionState::Uninitialized,
            widget: None,
            events: None,
        }
    }

    /// Replace the default [`TracingObserver`].
    #[must_use]
    pub fn with_observer(mut self, observer: Arc<dyn SessionObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// The device id, only while the device is ready.
    pub fn device_id(&self) -> Option<&DeviceId> {
        match &self.state {
            SessionState::Ready(id) => Some(id),
            _ => None,
        }
    }

    pub fn options(&self) -> &PlayerOptions {
        &self.options
    }

    pub fn widget(&self) -> Option<&F::Widget> {
        self.widget.as_ref()
    }

    /// Construct the widget and open its event channel.
    pub fn initialize(&mut self) -> Result<()> {
        if self.state != SessionState::Uninitialized {
            return Err(self.invalid("initialize"));
        }
        self.options.validate()?;

        let (tx, rx) = mpsc::unbounded_channel();
        let widget = self.factory.construct(&self.options, self.token.clone(), tx);
        self.widget = Some(widget);
        self.events = Some(rx);
        self.state = SessionState::Constructed;
        tracing::debug!(name = %self.options.name, volume = self.options.volume, "Playback widget constructed");
        Ok(())
    }

    /// Ask the widget to connect.
    ///
    /// On `false` the session becomes [`SessionState::Errored`] with an
    /// initialization error and [`SessionError::ConnectFailed`] is returned.
    pub async fn connect(&mut self) -> Result<()> {
        if self.state != SessionState::Constructed {
            return Err(self.invalid("connect"));
        }
        let Some(widget) = self.widget.as_mut() else {
            return Err(self.invalid("connect"));
        };

        self.state = SessionState::Connecting;
        let success = widget.connect().await;
        self.observer.on_connected(success);

        if !success {
            self.state = SessionState::Errored {
                kind: WidgetErrorKind::Initialization,
                message: "connect() resolved to false".to_owned(),
            };
            return Err(SessionError::ConnectFailed);
        }
        Ok(())
    }

    /// Wait for the next widget event and apply it.
    ///
    /// Widget errors are returned as [`SessionError::Widget`] after the
    /// observer has seen them.
    pub async fn next_event(&mut self) -> Result<SessionUpdate> {
        let Some(rx) = self.events.as_mut() else {
            return Err(self.invalid("receive events"));
        };
        let event = rx.recv().await.ok_or(SessionError::Closed)?;
        self.apply(event)
    }

    /// Disconnect the widget and return to `Uninitialized`.
    pub async fn disconnect(&mut self) {
        if let Some(mut widget) = self.widget.take() {
            widget.disconnect().await;
        }
        self.events = None;
        self.state = SessionState::Uninitialized;
        tracing::debug!("Playback widget disconnected");
    }

    fn apply(&mut self, event: WidgetEvent) -> Result<SessionUpdate> {
        tracing::trace!(event = event.name(), state = %self.state, "Widget event received");

        if let Some((kind, message)) = event.as_error() {
            self.observer.on_error(kind, message);
            let err = SessionError::Widget {
                kind,
                message: message.to_owned(),
            };
            if !matches!(self.state, SessionState::Errored { .. }) {
                self.state = SessionState::Errored {
                    kind,
                    message: message.to_owned(),
                };
            }
            return Err(err);
        }

        match event {
            WidgetEvent::Ready { device_id } => {
                self.observer.on_ready(&device_id);
                if !self.state.accepts_device_events() {
                    return Ok(self.ignored(WidgetEvent::Ready { device_id }));
                }
                self.state = SessionState::Ready(device_id.clone());
                Ok(SessionUpdate::Ready(device_id))
            }
            WidgetEvent::NotReady { device_id } => {
                self.observer.on_not_ready(&device_id);
                if !self.state.accepts_device_events() {
                    return Ok(self.ignored(WidgetEvent::NotReady { device_id }));
                }
                self.state = SessionState::NotReady(device_id.clone());
                Ok(SessionUpdate::NotReady(device_id))
            }
            WidgetEvent::PlayerStateChanged(state) => {
                self.observer.on_state_changed(state.as_ref());
                Ok(SessionUpdate::StateChanged(state))
            }
            other => Ok(self.ignored(other)),
        }
    }

    fn ignored(&self, event: WidgetEvent) -> SessionUpdate {
        tracing::debug!(event = event.name(), state = %self.state, "Widget event ignored");
        SessionUpdate::Ignored(event)
    }

    fn invalid(&self, action: &'static str) -> SessionError {
        SessionError::InvalidTransition {
            action,
            state: self.state.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widget::EventSender;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Hands the event sender back to the test so it can play the widget.
    #[derive(Clone, Default)]
    struct Handle {
        sender: Arc<Mutex<Option<EventSender>>>,
        token: Arc<Mutex<Option<TokenAccessor>>>,
        disconnected: Arc<Mutex<bool>>,
    }

    impl Handle {
        fn emit(&self, event: WidgetEvent) {
            self.sender
                .lock()
                .unwrap()
                .as_ref()
                .expect("widget not constructed")
                .send(event)
                .unwrap();
        }

        fn close(&self) {
            self.sender.lock().unwrap().take();
        }
    }

    struct FakeFactory {
        handle: Handle,
        connects: bool,
    }

    struct FakeWidget {
        handle: Handle,
        connects: bool,
    }

    #[async_trait]
    impl PlaybackWidget for FakeWidget {
        async fn connect(&mut self) -> bool {
            self.connects
        }

        async fn disconnect(&mut self) {
            *self.handle.disconnected.lock().unwrap() = true;
        }
    }

    impl WidgetFactory for FakeFactory {
        type Widget = FakeWidget;

        fn construct(&self, _options: &PlayerOptions, token: TokenAccessor, events: EventSender) -> FakeWidget {
            *self.handle.sender.lock().unwrap() = Some(events);
            *self.handle.token.lock().unwrap() = Some(token);
            FakeWidget {
                handle: self.handle.clone(),
                connects: self.connects,
            }
        }
    }

    #[derive(Default)]
    struct Recorder {
        seen: Mutex<Vec<String>>,
    }

    impl Recorder {
        fn seen(&self) -> Vec<String> {
            self.seen.lock().unwrap().clone()
        }
    }

    impl SessionObserver for Recorder {
        fn on_connected(&self, success: bool) {
            self.seen.lock().unwrap().push(format!("connected:{success}"));
        }
        fn on_ready(&self, device_id: &DeviceId) {
            self.seen.lock().unwrap().push(format!("ready:{device_id}"));
        }
        fn on_not_ready(&self, device_id: &DeviceId) {
            self.seen.lock().unwrap().push(format!("not_ready:{device_id}"));
        }
        fn on_state_changed(&self, state: Option<&PlaybackState>) {
            self.seen.lock().unwrap().push(format!("state:{}", state.is_some()));
        }
        fn on_error(&self, kind: WidgetErrorKind, message: &str) {
            self.seen.lock().unwrap().push(format!("error:{kind}:{message}"));
        }
    }

    fn session(connects: bool) -> (PlaybackSession<FakeFactory>, Handle, Arc<Recorder>) {
        let handle = Handle::default();
        let recorder = Arc::new(Recorder::default());
        let factory = FakeFactory {
            handle: handle.clone(),
            connects,
        };
        let session = PlaybackSession::new(factory, PlayerOptions::default(), TokenAccessor::fixed("tok"))
            .with_observer(recorder.clone());
        (session, handle, recorder)
    }

    async fn connected() -> (PlaybackSession<FakeFactory>, Handle, Arc<Recorder>) {
        let (mut s, h, r) = session(true);
        s.initialize().unwrap();
        s.connect().await.unwrap();
        (s, h, r)
    }

    fn snapshot() -> PlaybackState {
        PlaybackState {
            paused: true,
            position: 0,
            duration: 1000,
            shuffle: false,
            repeat_mode: 0,
            track_window: Default::default(),
        }
    }

    #[tokio::test]
    async fn walks_the_happy_path() {
        let (mut s, h, r) = session(true);
        assert_eq!(s.state(), &SessionState::Uninitialized);

        s.initialize().unwrap();
        assert_eq!(s.state(), &SessionState::Constructed);

        s.connect().await.unwrap();
        assert_eq!(s.state(), &SessionState::Connecting);
        assert!(s.device_id().is_none());

        h.emit(WidgetEvent::Ready { device_id: "abc".into() });
        assert_eq!(s.next_event().await.unwrap(), SessionUpdate::Ready("abc".into()));
        assert_eq!(s.device_id().map(DeviceId::as_str), Some("abc"));
        assert_eq!(r.seen(), ["connected:true", "ready:abc"]);
    }

    #[tokio::test]
    async fn ready_is_observed_without_other_side_effects() {
        let (mut s, h, r) = connected().await;
        let options_before = s.options().clone();

        h.emit(WidgetEvent::Ready { device_id: "abc".into() });
        s.next_event().await.unwrap();

        assert_eq!(r.seen().last().map(String::as_str), Some("ready:abc"));
        assert_eq!(s.options(), &options_before);
        assert_eq!(s.state(), &SessionState::Ready("abc".into()));
    }

    #[tokio::test]
    async fn toggles_between_ready_and_not_ready() {
        let (mut s, h, _) = connected().await;
        h.emit(WidgetEvent::Ready { device_id: "abc".into() });
        h.emit(WidgetEvent::NotReady { device_id: "abc".into() });
        h.emit(WidgetEvent::Ready { device_id: "abc".into() });

        s.next_event().await.unwrap();
        assert_eq!(s.next_event().await.unwrap(), SessionUpdate::NotReady("abc".into()));
        assert_eq!(s.state(), &SessionState::NotReady("abc".into()));
        assert!(s.device_id().is_none());

        s.next_event().await.unwrap();
        assert_eq!(s.device_id().map(DeviceId::as_str), Some("abc"));
    }

    #[tokio::test]
    async fn state_changes_do_not_move_the_state_machine() {
        let (mut s, h, r) = connected().await;
        h.emit(WidgetEvent::PlayerStateChanged(Some(snapshot())));
        h.emit(WidgetEvent::PlayerStateChanged(None));

        assert_eq!(
            s.next_event().await.unwrap(),
            SessionUpdate::StateChanged(Some(snapshot()))
        );
        assert_eq!(s.next_event().await.unwrap(), SessionUpdate::StateChanged(None));
        assert_eq!(s.state(), &SessionState::Connecting);
        assert_eq!(&r.seen()[1..], ["state:true", "state:false"]);
    }

    #[tokio::test]
    async fn widget_errors_are_surfaced_and_terminal() {
        let (mut s, h, r) = connected().await;
        h.emit(WidgetEvent::error(WidgetErrorKind::Account, "premium required"));
        h.emit(WidgetEvent::error(WidgetErrorKind::Playback, "later"));
        h.emit(WidgetEvent::Ready { device_id: "abc".into() });

        let err = s.next_event().await.unwrap_err();
        assert!(matches!(
            err,
            SessionError::Widget { kind: WidgetErrorKind::Account, ref message } if message == "premium required"
        ));
        assert!(s.next_event().await.is_err());
        assert!(matches!(s.next_event().await.unwrap(), SessionUpdate::Ignored(_)));

        assert_eq!(
            s.state(),
            &SessionState::Errored {
                kind: WidgetErrorKind::Account,
                message: "premium required".into()
            }
        );
        assert!(r.seen().contains(&"error:account:premium required".to_owned()));
        assert!(r.seen().contains(&"error:playback:later".to_owned()));
    }

    #[tokio::test]
    async fn errors_are_accepted_before_connect() {
        let (mut s, h, _) = session(true);
        s.initialize().unwrap();
        h.emit(WidgetEvent::error(WidgetErrorKind::Initialization, "no EME"));
        assert!(s.next_event().await.is_err());
        assert!(matches!(s.state(), SessionState::Errored { kind: WidgetErrorKind::Initialization, .. }));
        assert!(s.connect().await.is_err());
    }

    #[tokio::test]
    async fn failed_connect_errors_the_session() {
        let (mut s, _, r) = session(false);
        s.initialize().unwrap();
        assert!(matches!(s.connect().await, Err(SessionError::ConnectFailed)));
        assert!(matches!(s.state(), SessionState::Errored { kind: WidgetErrorKind::Initialization, .. }));
        assert_eq!(r.seen(), ["connected:false"]);
    }

    #[tokio::test]
    async fn ready_before_connect_is_ignored() {
        let (mut s, h, _) = session(true);
        s.initialize().unwrap();
        h.emit(WidgetEvent::Ready { device_id: "early".into() });
        assert!(matches!(s.next_event().await.unwrap(), SessionUpdate::Ignored(_)));
        assert_eq!(s.state(), &SessionState::Constructed);
    }

    #[tokio::test]
    async fn lifecycle_calls_out_of_order_are_rejected() {
        let (mut s, _, _) = session(true);
        assert!(matches!(s.connect().await, Err(SessionError::InvalidTransition { .. })));
        assert!(matches!(s.next_event().await, Err(SessionError::InvalidTransition { .. })));
        s.initialize().unwrap();
        assert!(matches!(s.initialize(), Err(SessionError::InvalidTransition { .. })));
    }

    #[tokio::test]
    async fn invalid_volume_blocks_construction() {
        let factory = FakeFactory {
            handle: Handle::default(),
            connects: true,
        };
        let mut s = PlaybackSession::new(factory, PlayerOptions::with_volume(2.0), TokenAccessor::fixed("t"));
        assert!(matches!(s.initialize(), Err(SessionError::InvalidVolume(_))));
        assert_eq!(s.state(), &SessionState::Uninitialized);
    }

    #[tokio::test]
    async fn widget_receives_a_working_token_accessor() {
        let (_s, h, _) = connected().await;
        let accessor = h.token.lock().unwrap().clone().unwrap();
        assert_eq!(accessor.token().await, "tok");
        assert_eq!(accessor.token().await, "tok");
    }

    #[tokio::test]
    async fn closed_channel_and_disconnect() {
        let (mut s, h, _) = connected().await;
        h.close();
        assert!(matches!(s.next_event().await, Err(SessionError::Closed)));

        s.disconnect().await;
        assert!(*h.disconnected.lock().unwrap());
        assert_eq!(s.state(), &SessionState::Uninitialized);
        assert!(s.widget().is_none());
        s.initialize().unwrap();
    }
}
