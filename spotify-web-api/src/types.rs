//! Argument and response types for the Spotify Web API.
//!
//! Enumerated arguments (`RepeatState`, `ShuffleState`, `SearchType`,
//! `LibraryItem`) parse from their wire strings and reject anything else with
//! [`ApiError::InvalidArgument`](crate::ApiError::InvalidArgument). Their
//! `Display` output is exactly the value sent to the API.
//!
//! Response models cover only the payloads the CLI renders; endpoint methods
//! return the raw JSON.

use crate::error::{ApiError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Repeat mode, sent as the `state` query parameter of `/me/player/repeat`.
///
/// | Variant   | API value | Effect                     |
/// |-----------|-----------|----------------------------|
/// | `Track`   | `track`   | Repeat the current track   |
/// | `Context` | `context` | Repeat the current context |
/// | `Off`     | `off`     | Repeat off                 |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepeatState {
    Track,
    Context,
    Off,
}

impl RepeatState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Track => "track",
            Self::Context => "context",
            Self::Off => "off",
        }
    }
}

impl FromStr for RepeatState {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "track" => Ok(Self::Track),
            "context" => Ok(Self::Context),
            "off" => Ok(Self::Off),
            other => Err(ApiError::invalid(format!(
                "invalid repeat state `{other}` (expected track, context or off)"
            ))),
        }
    }
}

/// Shuffle mode, sent as `state=true|false` to `/me/player/shuffle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShuffleState {
    On,
    Off,
}

impl ShuffleState {
    pub fn as_bool(self) -> bool {
        matches!(self, Self::On)
    }

    pub fn as_str(self) -> &'static str {
        if self.as_bool() { "true" } else { "false" }
    }
}

impl From<bool> for ShuffleState {
    fn from(on: bool) -> Self {
        if on { Self::On } else { Self::Off }
    }
}

impl FromStr for ShuffleState {
    type Err = ApiError;

    /// Only the literal strings `true` and `false` are accepted.
    fn from_str(s: &str) -> Result<Self> {
        match s {
            "true" => Ok(Self::On),
            "false" => Ok(Self::Off),
            other => Err(ApiError::invalid(format!(
                "invalid shuffle state `{other}` (expected true or false)"
            ))),
        }
    }
}

/// Catalog item type for `/search`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchType {
    Album,
    Artist,
    Playlist,
    Track,
    Show,
    Episode,
}

impl SearchType {
    pub const ALL: [Self; 6] = [
        Self::Album,
        Self::Artist,
        Self::Playlist,
        Self::Track,
        Self::Show,
        Self::Episode,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Album => "album",
            Self::Artist => "artist",
            Self::Playlist => "playlist",
            Self::Track => "track",
            Self::Show => "show",
            Self::Episode => "episode",
        }
    }
}

impl FromStr for SearchType {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| ApiError::invalid(format!("{s} is not a valid search type")))
    }
}

/// Saved-item collection under `/me`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LibraryItem {
    Albums,
    Shows,
    Tracks,
}

impl LibraryItem {
    pub const ALL: [Self; 3] = [Self::Albums, Self::Shows, Self::Tracks];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Albums => "albums",
            Self::Shows => "shows",
            Self::Tracks => "tracks",
        }
    }
}

impl FromStr for LibraryItem {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| ApiError::invalid(format!("{s} is not a valid item type")))
    }
}

macro_rules! wire_string_conversions {
    ($($ty:ty),*) => {$(
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl TryFrom<&str> for $ty {
            type Error = ApiError;

            fn try_from(s: &str) -> Result<Self> {
                s.parse()
            }
        }

        impl TryFrom<String> for $ty {
            type Error = ApiError;

            fn try_from(s: String) -> Result<Self> {
                s.parse()
            }
        }
    )*};
}

wire_string_conversions!(RepeatState, ShuffleState, SearchType, LibraryItem);

/// Query options for `/me/player/recently-played`.
///
/// `after` and `before` are Unix timestamps in milliseconds and are mutually
/// exclusive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecentlyPlayedOptions {
    /// 1..=50, server default 20.
    pub limit: Option<u32>,
    pub after: Option<u64>,
    pub before: Option<u64>,
}

/// Query options for `/search`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchOptions {
    /// 0..=50, server default 20.
    pub limit: Option<u32>,
    pub offset: Option<u32>,
    /// ISO 3166-1 alpha-2 country code or `from_token`.
    pub market: Option<String>,
    /// `audio` to include externally hosted audio content.
    pub include_external: Option<String>,
}

impl SearchOptions {
    pub fn limit(limit: u32) -> Self {
        Self {
            limit: Some(limit),
            ..Self::default()
        }
    }
}

/// Query options for `/me/{albums,shows,tracks}`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LibraryOptions {
    /// 1..=50, server default 20.
    pub limit: Option<u32>,
    pub offset: Option<u32>,
    /// Applies track relinking. Ignored by the shows endpoint.
    pub market: Option<String>,
}

/// A playback-capable device.
///
/// API JSON path: `response.devices[]` of `GET /me/player/devices`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Device {
    /// `null` for restricted devices that cannot be addressed.
    pub id: Option<String>,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub is_active: bool,
    #[serde(default)]
    pub is_restricted: bool,
    pub volume_percent: Option<u8>,
}

/// Envelope of `GET /me/player/devices`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceList {
    pub devices: Vec<Device>,
}

/// Profile image.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Image {
    pub url: String,
    pub height: Option<u32>,
    pub width: Option<u32>,
}

/// A user profile, public (`/users/{id}`) or private (`/me`).
///
/// Private-only fields (`country`, `email`, `product`) are `None` for public
/// lookups or when the token lacks the matching scope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub display_name: Option<String>,
    pub uri: String,
    #[serde(default)]
    pub images: Vec<Image>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product: Option<String>,
}
