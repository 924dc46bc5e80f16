//! Player API: playback state and device-targeted commands.
//!
//! All endpoints live under `/me/player`.
//!
//! | Method                                  | HTTP | Path                          | Params / body                       |
//! |-----------------------------------------|------|-------------------------------|-------------------------------------|
//! | [`devices`](Player::devices)            | GET  | `/me/player/devices`          |                                     |
//! | [`current_playback`](Player::current_playback) | GET | `/me/player`           |                                     |
//! | [`currently_playing`](Player::currently_playing) | GET | `/me/player/currently-playing` |                          |
//! | [`recently_played`](Player::recently_played) | GET | `/me/player/recently-played` | `limit`, `after`, `before`      |
//! | [`add_to_queue`](Player::add_to_queue)  | POST | `/me/player/queue`            | `device_id`, `uri`                  |
//! | [`transfer_playback`](Player::transfer_playback) | PUT | `/me/player`          | `{ "device_ids": [..], "play": b }` |
//! | [`start_playback`](Player::start_playback) | PUT | `/me/player/play`           | `device_id`, `{ "context_uri": .. }`|
//! | [`pause_playback`](Player::pause_playback) | PUT | `/me/player/pause`          | `device_id`                         |
//! | [`seek_position`](Player::seek_position) | PUT | `/me/player/seek`             | `position_ms`, `device_id`          |
//! | [`next_track`](Player::next_track)      | POST | `/me/player/next`             | `device_id`                         |
//! | [`previous_track`](Player::previous_track) | POST | `/me/player/previous`      | `device_id`                         |
//! | [`set_volume`](Player::set_volume)      | PUT  | `/me/player/volume`           | `volume_percent`, `device_id`       |
//! | [`set_repeat`](Player::set_repeat)      | PUT  | `/me/player/repeat`           | `state`, `device_id`                |
//! | [`set_shuffle`](Player::set_shuffle)    | PUT  | `/me/player/shuffle`          | `state`, `device_id`                |
//!
//! Device commands validate their arguments before a request exists. Nothing
//! is cached between calls, so a failed command can be retried as-is; the
//! client itself never retries. Commands sent concurrently to the same device
//! are not ordered by this crate.

use crate::client::{ApiClient, Method, RequestConfig, Transport};
use crate::error::{ApiError, Result};
use crate::types::{RecentlyPlayedOptions, RepeatState, ShuffleState};
use serde_json::{Value, json};

const URL: &str = "/me/player";

/// Playback endpoints, borrowed from an [`ApiClient`].
pub struct Player<'a, T> {
    api: &'a ApiClient<T>,
}

impl<'a, T: Transport> Player<'a, T> {
    pub(crate) fn new(api: &'a ApiClient<T>) -> Self {
        Self { api }
    }

    /// List the user's available devices.
    pub async fn devices(&self) -> Result<Value> {
        self.api.get(RequestConfig::new(format!("{URL}/devices"))).await
    }

    /// Information about the current playback context (device, item,
    /// progress, shuffle/repeat state). `null` when nothing is playing.
    pub async fn current_playback(&self) -> Result<Value> {
        self.api.get(RequestConfig::new(URL)).await
    }

    /// The item currently playing on the user's account.
    pub async fn currently_playing(&self) -> Result<Value> {
        self.api
            .get(RequestConfig::new(format!("{URL}/currently-playing")))
            .await
    }

    /// Recently played tracks.
    ///
    /// # Errors
    ///
    /// [`ApiError::InvalidArgument`] if both `after` and `before` are set.
    pub async fn recently_played(&self, options: RecentlyPlayedOptions) -> Result<Value> {
        if options.after.is_some() && options.before.is_some() {
            return Err(ApiError::invalid("`after` and `before` are mutually exclusive"));
        }
        let config = RequestConfig::new(format!("{URL}/recently-played"))
            .param_opt("limit", options.limit)
            .param_opt("after", options.after)
            .param_opt("before", options.before);
        self.api.get(config).await
    }

    /// Append a track or episode URI to the device's queue.
    pub async fn add_to_queue(&self, device_id: &str, uri: &str) -> Result<Value> {
        ApiError::require_present("device id", device_id)?;
        ApiError::require_present("uri", uri)?;
        let config = RequestConfig::new(format!("{URL}/queue"))
            .param("device_id", device_id)
            .param("uri", uri);
        self.api.post(config).await
    }

    /// Move playback to `device_id`. With `autoplay`, playback starts on the
    /// new device; otherwise the current play/pause state is kept.
    pub async fn transfer_playback(&self, device_id: &str, autoplay: bool) -> Result<Value> {
        ApiError::require_present("device id", device_id)?;
        let config = RequestConfig::new(URL).body(json!({
            "device_ids": [device_id],
            "play": autoplay,
        }));
        self.api.put(config).await
    }

    /// Start playback on `device_id`, optionally switching to a new context
    /// (album, artist or playlist URI). Without a context, or with a blank
    /// one, the current context is resumed.
    pub async fn start_playback(&self, device_id: &str, context_uri: Option<&str>) -> Result<Value> {
        ApiError::require_present("device id", device_id)?;
        let mut config = RequestConfig::new(format!("{URL}/play")).param("device_id", device_id);
        if let Some(uri) = context_uri.filter(|u| !u.trim().is_empty()) {
            config = config.body(json!({ "context_uri": uri }));
        }
        self.api.put(config).await
    }

    /// Resume playback. Identical to `start_playback(device_id, None)`.
    pub async fn resume_playback(&self, device_id: &str) -> Result<Value> {
        self.start_playback(device_id, None).await
    }

    pub async fn pause_playback(&self, device_id: &str) -> Result<Value> {
        self.device_command(Method::Put, "pause", device_id).await
    }

    /// Seek to `position_ms` in the current item.
    ///
    /// There is no upper bound check: a position past the end of the item
    /// makes the service skip to the next one.
    pub async fn seek_position(&self, device_id: &str, position_ms: u64) -> Result<Value> {
        ApiError::require_present("device id", device_id)?;
        let config = RequestConfig::new(format!("{URL}/seek"))
            .param("position_ms", position_ms)
            .param("device_id", device_id);
        self.api.put(config).await
    }

    pub async fn next_track(&self, device_id: &str) -> Result<Value> {
        self.device_command(Method::Post, "next", device_id).await
    }

    pub async fn previous_track(&self, device_id: &str) -> Result<Value> {
        self.device_command(Method::Post, "previous", device_id).await
    }

    /// Set the device volume.
    ///
    /// # Errors
    ///
    /// [`ApiError::InvalidArgument`] if `percent` is above 100.
    pub async fn set_volume(&self, device_id: &str, percent: u8) -> Result<Value> {
        ApiError::require_present("device id", device_id)?;
        if percent > 100 {
            return Err(ApiError::invalid(format!(
                "volume percent must be within 0..=100, got {percent}"
            )));
        }
        let config = RequestConfig::new(format!("{URL}/volume"))
            .param("volume_percent", percent)
            .param("device_id", device_id);
        self.api.put(config).await
    }

    /// Set the repeat mode.
    ///
    /// Accepts a [`RepeatState`] or its wire string (`track`, `context`,
    /// `off`).
    ///
    /// ```no_run
    /// # async fn demo(api: spotify_web_api::ApiClient) -> spotify_web_api::Result<()> {
    /// use spotify_web_api::types::RepeatState;
    ///
    /// api.player().set_repeat("device123", RepeatState::Track).await?;
    /// api.player().set_repeat("device123", "context").await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn set_repeat<S>(&self, device_id: &str, state: S) -> Result<Value>
    where
        S: TryInto<RepeatState>,
        ApiError: From<S::Error>,
    {
        ApiError::require_present("device id", device_id)?;
        let state: RepeatState = state.try_into()?;
        let config = RequestConfig::new(format!("{URL}/repeat"))
            .param("state", state)
            .param("device_id", device_id);
        self.api.put(config).await
    }

    /// Toggle shuffle.
    ///
    /// Takes a `bool` or a [`ShuffleState`]. Strings are not accepted; parse
    /// user input into a [`ShuffleState`] first.
    ///
    /// ```compile_fail
    /// # async fn demo(api: spotify_web_api::ApiClient) {
    /// api.player().set_shuffle("device123", "true").await;
    /// # }
    /// ```
    pub async fn set_shuffle(
        &self,
        device_id: &str,
        state: impl Into<ShuffleState>,
    ) -> Result<Value> {
        ApiError::require_present("device id", device_id)?;
        let state: ShuffleState = state.into();
        let config = RequestConfig::new(format!("{URL}/shuffle"))
            .param("state", state)
            .param("device_id", device_id);
        self.api.put(config).await
    }

    async fn device_command(&self, method: Method, action: &str, device_id: &str) -> Result<Value> {
        ApiError::require_present("device id", device_id)?;
        let config = RequestConfig::new(format!("{URL}/{action}")).param("device_id", device_id);
        self.api.request(method, config).await
    }
}
