//! User profile API.
//!
//! | Operation                                      | Endpoint          | Scope needed                          |
//! |------------------------------------------------|-------------------|---------------------------------------|
//! | [`current_user_profile`](Users::current_user_profile) | `GET /me`  | `user-read-private`, `user-read-email` for private fields |
//! | [`user_profile`](Users::user_profile)          | `GET /users/{id}` | none                                  |
//!
//! Response (`/me`):
//! ```json
//! {
//!   "id": "wizzler",
//!   "display_name": "Wizzler",
//!   "uri": "spotify:user:wizzler",
//!   "country": "SE",
//!   "product": "premium",
//!   "images": [{ "url": "https://i.scdn.co/image/...", "height": 300, "width": 300 }]
//! }
//! ```
//! Deserializes into [`UserProfile`](crate::types::UserProfile).

use crate::client::{ApiClient, RequestConfig, Transport};
use crate::error::{ApiError, Result};
use serde_json::Value;

/// Profile lookups, borrowed from an [`ApiClient`].
pub struct Users<'a, T> {
    api: &'a ApiClient<T>,
}

impl<'a, T: Transport> Users<'a, T> {
    pub(crate) fn new(api: &'a ApiClient<T>) -> Self {
        Self { api }
    }

    /// Detailed profile of the token's owner.
    pub async fn current_user_profile(&self) -> Result<Value> {
        self.api.get(RequestConfig::new("/me")).await
    }

    /// Public profile of any user.
    pub async fn user_profile(&self, user_id: &str) -> Result<Value> {
        ApiError::require_present("user id", user_id)?;
        let path = format!("/users/{}", urlencoding::encode(user_id));
        self.api.get(RequestConfig::new(path)).await
    }
}

#[cfg(test)]
mod tests {
    use crate::client::Method;
    use crate::testing::client;

    #[tokio::test]
    async fn profile_lookups() {
        let api = client();
        api.users().current_user_profile().await.unwrap();
        api.users().user_profile("wizzler").await.unwrap();

        let cmds = api.transport().commands();
        assert!(cmds.iter().all(|c| c.method == Method::Get && c.params.is_empty()));
        assert_eq!(cmds[0].path, "/me");
        assert_eq!(cmds[1].path, "/users/wizzler");
    }

    #[tokio::test]
    async fn user_id_is_path_encoded() {
        let api = client();
        api.users().user_profile("a b/c").await.unwrap();
        assert_eq!(api.transport().single().path, "/users/a%20b%2Fc");
    }

    #[tokio::test]
    async fn empty_user_id_is_rejected() {
        let api = client();
        assert!(api.users().user_profile("").await.unwrap_err().is_invalid_argument());
        assert!(api.transport().commands().is_empty());
    }
}
