use serde::{Deserialize, Serialize};

/// Default address of the remote bookmark store.
pub const DEFAULT_API_URL: &str = "http://localhost:3000";

/// Storage keys used by the local persistence layer.
pub mod keys {
    pub const BOOKMARKS: &str = "bookmarks";
    pub const API_URL: &str = "apiUrl";
    pub const BOOKMARK_STORE: &str = "bookmarkStore";
    pub const ID_MAP: &str = "idMap";
}

/// Connection settings for the remote store.
///
/// `store_id` is `None` until the first sync creates a store, after which it
/// never changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncConfig {
    pub api_url: String,
    pub store_id: Option<String>,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            store_id: None,
        }
    }
}

impl SyncConfig {
    /// Returns a copy pointing at another api url, keeping the store id.
    pub fn with_api_url(&self, api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            store_id: self.store_id.clone(),
        }
    }
}
