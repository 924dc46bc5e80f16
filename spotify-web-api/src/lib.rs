//! Spotify Web API client library.
//!
//! A thin async facade over the Web API endpoints a remote-control front end
//! needs: playback control on a chosen device, catalog search, the saved-item
//! library, and user profiles.
//!
//! ```no_run
//! use spotify_web_api::ApiClient;
//! use spotify_web_api::types::SearchOptions;
//!
//! # async fn demo() -> spotify_web_api::Result<()> {
//! let api = ApiClient::new("BQD...")?;
//!
//! api.player().transfer_playback("device123", true).await?;
//! api.player().set_repeat("device123", "track").await?;
//! let hits = api
//!     .search()
//!     .query("daft punk", ["album", "artist"], SearchOptions::limit(10))
//!     .await?;
//! # Ok(())
//! # }
//! ```
//!
//! # API endpoint mapping
//!
//! | Namespace                      | Path prefix                      | Description                 |
//! |--------------------------------|----------------------------------|-----------------------------|
//! | [`ApiClient::player`]          | `/me/player`                     | Devices and playback control|
//! | [`ApiClient::search`]          | `/search`                        | Catalog search              |
//! | [`ApiClient::library`]         | `/me/{albums,shows,tracks}`      | Saved items                 |
//! | [`ApiClient::users`]           | `/me`, `/users/{id}`             | User profiles               |
//!
//! # Validation
//!
//! Enumerated arguments (repeat state, shuffle state, search and library item
//! types), the volume range and required ids are checked before a request is
//! built. A bad value yields [`ApiError::InvalidArgument`] and nothing is sent.
//! Transport failures come back unchanged as [`ApiError::Http`]; there are no
//! retries.

pub mod auth;
pub mod client;
pub mod error;
mod library;
mod player;
mod search;
#[cfg(test)]
mod testing;
pub mod types;
mod users;

pub use client::{AccessToken, ApiClient, Command, Method, RequestConfig, ReqwestTransport, Transport};
pub use error::{ApiError, Result};
pub use library::Library;
pub use player::Player;
pub use search::Search;
pub use users::Users;
