//! Library API: items saved in the current user's library.
//!
//! # Endpoints
//!
//! | Operation  | HTTP | Path                    | Params                         |
//! |------------|------|-------------------------|--------------------------------|
//! | get saved  | GET  | `/me/{item}`            | `limit`, `offset`, `market`    |
//! | contains   | GET  | `/me/{item}/contains`   | `ids` (comma-separated)        |
//! | save       | PUT  | `/me/{item}`            | `ids` (comma-separated)        |
//!
//! `{item}` is one of `albums`, `shows`, `tracks`. The service accepts at
//! most 50 ids per call; staying under that is up to the caller.
//!
//! `contains` answers with one boolean per id, in request order:
//! ```json
//! [true, false]
//! ```

use crate::client::{ApiClient, RequestConfig, Transport};
use crate::error::{ApiError, Result};
use crate::types::{LibraryItem, LibraryOptions};
use serde_json::Value;

const URL: &str = "/me";

/// Saved-item endpoints, borrowed from an [`ApiClient`].
pub struct Library<'a, T> {
    api: &'a ApiClient<T>,
}

impl<'a, T: Transport> Library<'a, T> {
    pub(crate) fn new(api: &'a ApiClient<T>) -> Self {
        Self { api }
    }

    /// Page through saved items of one type.
    ///
    /// # Errors
    ///
    /// [`ApiError::InvalidArgument`] if `item` is not `albums`, `shows` or
    /// `tracks`.
    pub async fn get_saved<S>(&self, item: S, options: LibraryOptions) -> Result<Value>
    where
        S: TryInto<LibraryItem>,
        ApiError: From<S::Error>,
    {
        let item: LibraryItem = item.try_into()?;
        let config = RequestConfig::new(format!("{URL}/{item}"))
            .param_opt("limit", options.limit)
            .param_opt("offset", options.offset)
            .param_opt("market", options.market);
        self.api.get(config).await
    }

    /// Check whether each of `ids` is saved.
    pub async fn contains<S>(&self, item: S, ids: &[&str]) -> Result<Value>
    where
        S: TryInto<LibraryItem>,
        ApiError: From<S::Error>,
    {
        let item: LibraryItem = item.try_into()?;
        let config = RequestConfig::new(format!("{URL}/{item}/contains")).param("ids", join_ids(ids)?);
        self.api.get(config).await
    }

    /// Save `ids` to the library.
    pub async fn save<S>(&self, item: S, ids: &[&str]) -> Result<Value>
    where
        S: TryInto<LibraryItem>,
        ApiError: From<S::Error>,
    {
        let item: LibraryItem = item.try_into()?;
        let config = RequestConfig::new(format!("{URL}/{item}")).param("ids", join_ids(ids)?);
        self.api.put(config).await
    }

    pub async fn saved_albums(&self, options: LibraryOptions) -> Result<Value> {
        self.get_saved(LibraryItem::Albums, options).await
    }

    pub async fn saved_shows(&self, options: LibraryOptions) -> Result<Value> {
        self.get_saved(LibraryItem::Shows, options).await
    }

    pub async fn saved_tracks(&self, options: LibraryOptions) -> Result<Value> {
        self.get_saved(LibraryItem::Tracks, options).await
    }

    pub async fn contains_albums(&self, ids: &[&str]) -> Result<Value> {
        self.contains(LibraryItem::Albums, ids).await
    }

    pub async fn contains_shows(&self, ids: &[&str]) -> Result<Value> {
        self.contains(LibraryItem::Shows, ids).await
    }

    pub async fn contains_tracks(&self, ids: &[&str]) -> Result<Value> {
        self.contains(LibraryItem::Tracks, ids).await
    }

    pub async fn save_albums(&self, ids: &[&str]) -> Result<Value> {
        self.save(LibraryItem::Albums, ids).await
    }

    pub async fn save_shows(&self, ids: &[&str]) -> Result<Value> {
        self.save(LibraryItem::Shows, ids).await
    }

    pub async fn save_tracks(&self, ids: &[&str]) -> Result<Value> {
        self.save(LibraryItem::Tracks, ids).await
    }
}

fn join_ids(ids: &[&str]) -> Result<String> {
    if ids.is_empty() {
        return Err(ApiError::invalid("at least one id is required"));
    }
    for id in ids {
        ApiError::require_present("item id", id)?;
    }
    Ok(ids.join(","))
}
