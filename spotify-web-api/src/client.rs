//! HTTP client for the Spotify Web API.
//!
//! Every call goes through the same path:
//!
//! 1. An endpoint namespace validates its arguments and builds a
//!    [`RequestConfig`] (path, query params, optional JSON body)
//! 2. [`ApiClient`] turns the config into exactly one [`Command`] for the
//!    requested [`Method`]
//! 3. The [`Transport`] sends the command to `https://api.spotify.com/v1{path}`
//!    with the client's fixed headers
//!
//! # Headers
//!
//! Derived once from the [`AccessToken`] at construction and never changed:
//!
//! ```text
//! Authorization: Bearer <token>
//! Content-Type: application/json
//! ```
//!
//! Rotating the token means building a new client.
//!
//! # Responses
//!
//! The client does not interpret status codes and does not retry. Whatever
//! the transport returns (parsed JSON, `null` for `204 No Content`, or an
//! error) is handed back to the caller as-is.

use crate::error::{ApiError, Result};
use crate::library::Library;
use crate::player::Player;
use crate::search::Search;
use crate::users::Users;
use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Base URL of the Spotify Web API.
pub const BASE_URL: &str = "https://api.spotify.com/v1";
const USER_AGENT: &str = concat!("spotify-web-api/", env!("CARGO_PKG_VERSION"));

/// Opaque OAuth bearer token.
///
/// Issued and refreshed elsewhere; the client only reads it once to build its
/// `Authorization` header.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(***)")
    }
}

impl From<String> for AccessToken {
    fn from(token: String) -> Self {
        Self(token)
    }
}

impl From<&str> for AccessToken {
    fn from(token: &str) -> Self {
        Self(token.to_owned())
    }
}

/// HTTP verbs used by the Web API endpoints covered here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
        }
    }
}

impl From<Method> for reqwest::Method {
    fn from(m: Method) -> Self {
        match m {
            Method::Get => Self::GET,
            Method::Post => Self::POST,
            Method::Put => Self::PUT,
        }
    }
}

/// One fully-constructed request, issued at most once.
#[derive(Debug, Clone, PartialEq)]
pub struct Command {
    pub method: Method,
    /// Path relative to the base URL, e.g. `/me/player/repeat`.
    pub path: String,
    /// Query parameters in insertion order.
    pub params: Vec<(String, String)>,
    /// JSON request body, if any.
    pub body: Option<Value>,
}

impl Command {
    /// Absolute URL of this command against `base_url`.
    pub fn url(&self, base_url: &str) -> String {
        format!("{}{}", base_url.trim_end_matches('/'), self.path)
    }

    /// Look up a query parameter by name.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Per-call request configuration.
///
/// These are the only fields a caller controls. Base URL and headers always
/// come from the [`ApiClient`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestConfig {
    pub path: String,
    pub params: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl RequestConfig {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    /// Append a query parameter.
    #[must_use]
    pub fn param(mut self, key: &str, value: impl ToString) -> Self {
        self.params.push((key.to_owned(), value.to_string()));
        self
    }

    /// Append a query parameter only when `value` is `Some`.
    #[must_use]
    pub fn param_opt<V: ToString>(self, key: &str, value: Option<V>) -> Self {
        match value {
            Some(v) => self.param(key, v),
            None => self,
        }
    }

    /// Set the JSON body.
    #[must_use]
    pub fn body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    fn into_command(self, method: Method) -> Command {
        Command {
            method,
            path: self.path,
            params: self.params,
            body: self.body,
        }
    }
}

/// Sends a [`Command`] over the network.
///
/// Timeouts and cancellation belong to the implementation; the client
/// propagates whatever error it returns.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, base_url: &str, headers: &HeaderMap, command: &Command)
    -> Result<Value>;
}

/// Production [`Transport`] backed by [`reqwest::Client`].
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    http: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self { http })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn execute(
        &self,
        base_url: &str,
        headers: &HeaderMap,
        command: &Command,
    ) -> Result<Value> {
        let mut req = self
            .http
            .request(command.method.into(), command.url(base_url))
            .headers(headers.clone());

        if !command.params.is_empty() {
            req = req.query(&command.params);
        }
        req = match &command.body {
            Some(body) => req.json(body),
            // PUT/POST without a body still need `Content-Length: 0`.
            None if command.method != Method::Get => req.body(Vec::new()),
            None => req,
        };

        let resp = req.send().await?.error_for_status()?;
        let bytes = resp.bytes().await?;
        if bytes.is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_slice(&bytes)?)
    }
}

struct Inner<T> {
    base_url: String,
    headers: HeaderMap,
    transport: T,
}

/// Async client for the Spotify Web API.
///
/// Holds the base URL, the headers derived from the access token, and a
/// [`Transport`]. Endpoint groups are reached through borrowing views:
/// [`player`](Self::player), [`search`](Self::search),
/// [`library`](Self::library) and [`users`](Self::users).
///
/// Cloning is cheap and clones share the same immutable configuration.
pub struct ApiClient<T = ReqwestTransport> {
    inner: Arc<Inner<T>>,
}

impl<T> Clone for ApiClient<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> fmt::Debug for ApiClient<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.base_url)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Create a client that talks to the real Web API over reqwest.
    pub fn new(token: impl Into<AccessToken>) -> Result<Self> {
        Self::with_transport(token, ReqwestTransport::new()?)
    }
}

impl<T: Transport> ApiClient<T> {
    /// Create a client with an explicit [`Transport`].
    pub fn with_transport(token: impl Into<AccessToken>, transport: T) -> Result<Self> {
        Self::with_base_url(token, transport, BASE_URL)
    }

    /// Create a client against a different base URL (e.g. a local mock
    /// server).
    pub fn with_base_url(
        token: impl Into<AccessToken>,
        transport: T,
        base_url: impl Into<String>,
    ) -> Result<Self> {
        let headers = default_headers(&token.into())?;
        Ok(Self {
            inner: Arc::new(Inner {
                base_url: base_url.into(),
                headers,
                transport,
            }),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    /// Headers attached to every request.
    pub fn headers(&self) -> &HeaderMap {
        &self.inner.headers
    }

    pub fn transport(&self) -> &T {
        &self.inner.transport
    }

    /// Build one [`Command`] from `config` and send it.
    pub async fn request(&self, method: Method, config: RequestConfig) -> Result<Value> {
        let command = config.into_command(method);
        tracing::debug!(
            method = command.method.as_str(),
            path = %command.path,
            "API request started"
        );
        let result = self
            .inner
            .transport
            .execute(&self.inner.base_url, &self.inner.headers, &command)
            .await;
        if let Err(e) = &result {
            tracing::warn!(
                method = command.method.as_str(),
                path = %command.path,
                error = %e,
                "API request failed"
            );
        }
        result
    }

    /// Shortcut for a `GET` request.
    pub async fn get(&self, config: RequestConfig) -> Result<Value> {
        self.request(Method::Get, config).await
    }

    /// Shortcut for a `POST` request.
    pub async fn post(&self, config: RequestConfig) -> Result<Value> {
        self.request(Method::Post, config).await
    }

    /// Shortcut for a `PUT` request.
    pub async fn put(&self, config: RequestConfig) -> Result<Value> {
        self.request(Method::Put, config).await
    }

    /// Playback control endpoints (`/me/player`).
    pub fn player(&self) -> Player<'_, T> {
        Player::new(self)
    }

    /// Catalog search endpoint (`/search`).
    pub fn search(&self) -> Search<'_, T> {
        Search::new(self)
    }

    /// Saved-item endpoints (`/me/{albums,shows,tracks}`).
    pub fn library(&self) -> Library<'_, T> {
        Library::new(self)
    }

    /// Profile endpoints (`/me`, `/users/{id}`).
    pub fn users(&self) -> Users<'_, T> {
        Users::new(self)
    }
}

fn default_headers(token: &AccessToken) -> Result<HeaderMap> {
    let mut auth = HeaderValue::from_str(&format!("Bearer {}", token.as_str()))
        .map_err(|_| ApiError::invalid("access token contains characters not allowed in a header"))?;
    auth.set_sensitive(true);

    let mut headers = HeaderMap::new();
    headers.insert(AUTHORIZATION, auth);
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    Ok(headers)
}
