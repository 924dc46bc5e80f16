//! Search API.
//!
//! Endpoint: `GET /search`
//!
//! Query parameters:
//! - `q` — search keywords (field filters such as `artist:` are passed through)
//! - `type` — comma-separated item types: `album`, `artist`, `playlist`,
//!   `track`, `show`, `episode`
//! - `limit` — page size per item type (default 20, max 50)
//! - `offset` — pagination offset (0-based)
//! - `market` — ISO 3166-1 alpha-2 country code or `from_token`
//! - `include_external` — `audio` to include externally hosted episodes
//!
//! Response JSON holds one paging object per requested type:
//! ```json
//! {
//!   "albums":  { "href": "...", "items": [ ... ], "limit": 10, "offset": 0, "total": 268 },
//!   "artists": { "href": "...", "items": [ ... ], "limit": 10, "offset": 0, "total": 12 }
//! }
//! ```

use crate::client::{ApiClient, RequestConfig, Transport};
use crate::error::{ApiError, Result};
use crate::types::{SearchOptions, SearchType};
use serde_json::Value;

const URL: &str = "/search";

/// Catalog search, borrowed from an [`ApiClient`].
pub struct Search<'a, T> {
    api: &'a ApiClient<T>,
}

impl<'a, T: Transport> Search<'a, T> {
    pub(crate) fn new(api: &'a ApiClient<T>) -> Self {
        Self { api }
    }

    /// Query the search endpoint for one or more item types.
    ///
    /// `item_types` may be [`SearchType`] values or their wire strings; every
    /// entry is checked before anything is sent.
    ///
    /// # Errors
    ///
    /// [`ApiError::InvalidArgument`] if `keywords` is empty, `item_types` is
    /// empty, or any entry is not a valid search type.
    pub async fn query<I>(&self, keywords: &str, item_types: I, options: SearchOptions) -> Result<Value>
    where
        I: IntoIterator,
        I::Item: TryInto<SearchType>,
        ApiError: From<<I::Item as TryInto<SearchType>>::Error>,
    {
        ApiError::require_present("search keywords", keywords)?;
        let types = confirm_search_types(item_types)?;

        let config = RequestConfig::new(URL)
            .param("q", keywords)
            .param("type", types.join(","))
            .param_opt("limit", options.limit)
            .param_opt("offset", options.offset)
            .param_opt("market", options.market)
            .param_opt("include_external", options.include_external);
        self.api.get(config).await
    }

    pub async fn albums(&self, keywords: &str, options: SearchOptions) -> Result<Value> {
        self.query(keywords, [SearchType::Album], options).await
    }

    pub async fn artists(&self, keywords: &str, options: SearchOptions) -> Result<Value> {
        self.query(keywords, [SearchType::Artist], options).await
    }

    pub async fn playlists(&self, keywords: &str, options: SearchOptions) -> Result<Value> {
        self.query(keywords, [SearchType::Playlist], options).await
    }

    pub async fn tracks(&self, keywords: &str, options: SearchOptions) -> Result<Value> {
        self.query(keywords, [SearchType::Track], options).await
    }

    pub async fn shows(&self, keywords: &str, options: SearchOptions) -> Result<Value> {
        self.query(keywords, [SearchType::Show], options).await
    }

    pub async fn episodes(&self, keywords: &str, options: SearchOptions) -> Result<Value> {
        self.query(keywords, [SearchType::Episode], options).await
    }
}

fn confirm_search_types<I>(item_types: I) -> Result<Vec<&'static str>>
where
    I: IntoIterator,
    I::Item: TryInto<SearchType>,
    ApiError: From<<I::Item as TryInto<SearchType>>::Error>,
{
    let types = item_types
        .into_iter()
        .map(|t| TryInto::<SearchType>::try_into(t).map(SearchType::as_str).map_err(ApiError::from))
        .collect::<Result<Vec<_>>>()?;
    if types.is_empty() {
        return Err(ApiError::invalid("at least one search type is required"));
    }
    Ok(types)
}
