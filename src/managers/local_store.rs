//! Local Store for marksync.
//!
//! Implements `LocalStoreTrait`, a JSON key-value store over SQLite holding
//! the bookmark collection and the sync configuration.

use std::sync::Arc;

use rusqlite::{params, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::database::Database;
use crate::types::bookmark::{now_millis, BookmarkRecord};
use crate::types::errors::StorageError;
use crate::types::id_map::IdMap;
use crate::types::settings::{keys, SyncConfig, DEFAULT_API_URL};

/// Trait defining local persistence operations.
pub trait LocalStoreTrait {
    fn get_bookmarks(&self) -> Result<Vec<BookmarkRecord>, StorageError>;
    fn save_bookmarks(&self, bookmarks: &[BookmarkRecord]) -> Result<(), StorageError>;
    fn get_config(&self) -> Result<SyncConfig, StorageError>;
    fn set_api_url(&self, api_url: &str) -> Result<(), StorageError>;
    fn set_store_id(&self, store_id: &str) -> Result<(), StorageError>;
    fn clear_store_id(&self) -> Result<(), StorageError>;
    fn get_id_map(&self) -> Result<IdMap, StorageError>;
    fn save_id_map(&self, ids: &IdMap) -> Result<(), StorageError>;
}

/// Key-value store backed by a shared SQLite database.
#[derive(Clone)]
pub struct LocalStore {
    db: Arc<Database>,
}

impl LocalStore {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Reads and decodes the value stored under `key`.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StorageError> {
        let raw: Option<String> = self
            .db
            .connection()
            .query_row(
                "SELECT value FROM kv_store WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;

        match raw {
            Some(json) => serde_json::from_str(&json).map(Some).map_err(|e| {
                StorageError::SerializationError(format!("Failed to decode '{}': {}", key, e))
            }),
            None => Ok(None),
        }
    }

    /// Encodes `value` and stores it under `key`, replacing any previous value.
    pub fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        let json = serde_json::to_string(value).map_err(|e| {
            StorageError::SerializationError(format!("Failed to encode '{}': {}", key, e))
        })?;
        self.db.connection().execute(
            "INSERT INTO kv_store (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![key, json, now_millis()],
        )?;
        Ok(())
    }
}

impl LocalStoreTrait for LocalStore {
    /// Returns the stored collection, or an empty one if nothing was imported yet.
    fn get_bookmarks(&self) -> Result<Vec<BookmarkRecord>, StorageError> {
        Ok(self.get(keys::BOOKMARKS)?.unwrap_or_default())
    }

    fn save_bookmarks(&self, bookmarks: &[BookmarkRecord]) -> Result<(), StorageError> {
        self.set(keys::BOOKMARKS, bookmarks)
    }

    fn get_config(&self) -> Result<SyncConfig, StorageError> {
        let api_url: Option<String> = self.get(keys::API_URL)?;
        let store_id: Option<String> = self.get::<Option<String>>(keys::BOOKMARK_STORE)?.flatten();
        Ok(SyncConfig {
            api_url: api_url.unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            store_id,
        })
    }

    fn set_api_url(&self, api_url: &str) -> Result<(), StorageError> {
        self.set(keys::API_URL, api_url)
    }

    fn set_store_id(&self, store_id: &str) -> Result<(), StorageError> {
        self.set(keys::BOOKMARK_STORE, store_id)
    }

    /// Forgets the store id so the next sync creates a fresh store.
    fn clear_store_id(&self) -> Result<(), StorageError> {
        self.set(keys::BOOKMARK_STORE, &None::<String>)
    }

    fn get_id_map(&self) -> Result<IdMap, StorageError> {
        Ok(self.get(keys::ID_MAP)?.unwrap_or_default())
    }

    fn save_id_map(&self, ids: &IdMap) -> Result<(), StorageError> {
        self.set(keys::ID_MAP, ids)
    }
}
