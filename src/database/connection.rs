//! SQLite database connection management for marksync.
//!
//! Provides the [`Database`] struct that wraps a `rusqlite::Connection`
//! and runs schema migrations on open.

use rusqlite::Connection;
use std::path::{Path, PathBuf};

use super::migrations;

/// File name of the store inside a data directory.
pub const DB_FILE_NAME: &str = "marksync.db";

/// Owns the SQLite connection backing the local bookmark store.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Opens (or creates) a SQLite database at the given file path and runs migrations.
    ///
    /// # Errors
    /// Returns `rusqlite::Error` if the connection cannot be established or migrations fail.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, rusqlite::Error> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        migrations::run_all(&db.conn)?;
        Ok(db)
    }

    /// Opens `marksync.db` inside `dir`, creating the directory first.
    pub fn open_in_dir<P: AsRef<Path>>(dir: P) -> Result<Self, rusqlite::Error> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir).map_err(|e| {
            rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_CANTOPEN),
                Some(format!("Failed to create {}: {}", dir.display(), e)),
            )
        })?;
        Self::open(Self::path_in(dir))
    }

    /// Location of the store file for a data directory.
    pub fn path_in<P: AsRef<Path>>(dir: P) -> PathBuf {
        dir.as_ref().join(DB_FILE_NAME)
    }

    /// Opens an in-memory SQLite database and runs migrations.
    ///
    /// The database is discarded when the `Database` is dropped.
    pub fn open_in_memory() -> Result<Self, rusqlite::Error> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        migrations::run_all(&db.conn)?;
        Ok(db)
    }

    /// Returns a reference to the underlying `rusqlite::Connection`.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}
