//! Token store — persists an access token to disk.
//!
//! The token file is stored at `~/.config/spotify-web/token.json` and
//! contains:
//!
//! ```json
//! { "access_token": "BQD..." }
//! ```
//!
//! Tokens are issued elsewhere (the Spotify accounts service, or the
//! developer console for quick testing) and expire after one hour. Nothing
//! here refreshes them.

use crate::client::AccessToken;
use crate::error::{ApiError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Persistent access token backed by a JSON file on disk.
#[derive(Debug, Serialize, Deserialize, Default)]
pub struct TokenStore {
    pub access_token: Option<String>,
}

impl TokenStore {
    /// Load from `~/.config/spotify-web/token.json`.
    ///
    /// Returns an empty store if the file does not exist.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&data)?)
    }

    /// Save to disk, creating parent directories if needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_string_pretty(self)?;
        fs::write(path, data)?;
        Ok(())
    }

    /// Delete the token file from disk.
    pub fn clear() -> Result<()> {
        let path = Self::path()?;
        if path.exists() {
            fs::remove_file(&path)?;
        }
        Ok(())
    }

    /// The stored token, if one is present and non-empty.
    pub fn token(&self) -> Option<AccessToken> {
        self.access_token
            .as_deref()
            .filter(|t| !t.is_empty())
            .map(AccessToken::from)
    }

    pub fn path() -> Result<PathBuf> {
        let config = dirs::config_dir()
            .ok_or_else(|| ApiError::Other("cannot determine config directory".into()))?;
        Ok(config.join("spotify-web").join("token.json"))
    }
}
