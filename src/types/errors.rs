use std::fmt;

// === StoreError ===

/// Errors returned by the remote bookmark store.
#[derive(Debug)]
pub enum StoreError {
    /// Non-2xx status or network failure. The message names the operation.
    Transport(String),
    /// The store answered, but not in the expected shape.
    UnexpectedState(String),
}

impl StoreError {
    /// Builds a transport error for a failed `operation` ("create", "fetch", "update").
    pub fn transport(operation: &str, detail: impl fmt::Display) -> Self {
        StoreError::Transport(format!("Failed to {} store: {}", operation, detail))
    }

    /// Builds an unexpected-state error for `operation`.
    pub fn unexpected(operation: &str, detail: impl fmt::Display) -> Self {
        StoreError::UnexpectedState(format!("Failed to {} store: {}", operation, detail))
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Transport(msg) => write!(f, "Store transport error: {}", msg),
            StoreError::UnexpectedState(msg) => write!(f, "Unexpected store state: {}", msg),
        }
    }
}

impl std::error::Error for StoreError {}

// === StorageError ===

/// Errors from the local key-value persistence layer.
#[derive(Debug)]
pub enum StorageError {
    /// Database operation failed.
    DatabaseError(String),
    /// A stored value could not be encoded or decoded.
    SerializationError(String),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::DatabaseError(msg) => write!(f, "Storage database error: {}", msg),
            StorageError::SerializationError(msg) => {
                write!(f, "Storage serialization error: {}", msg)
            }
        }
    }
}

impl std::error::Error for StorageError {}

impl From<rusqlite::Error> for StorageError {
    fn from(e: rusqlite::Error) -> Self {
        StorageError::DatabaseError(e.to_string())
    }
}

// === TreeError ===

/// Errors from the native bookmark tree.
#[derive(Debug)]
pub enum TreeError {
    /// Node with the given ID was not found.
    NotFound(String),
    /// The requested parent does not exist or is not a folder.
    ParentNotFound(String),
    /// The node is managed and cannot be changed.
    Unmodifiable(String),
    /// Only empty folders can be removed.
    FolderNotEmpty(String),
    /// Reading or writing the tree file failed.
    IoError(String),
    /// The tree file is not valid JSON.
    SerializationError(String),
    /// Internal tree state is unusable (poisoned lock).
    StateError(String),
}

impl fmt::Display for TreeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TreeError::NotFound(id) => write!(f, "Bookmark node not found: {}", id),
            TreeError::ParentNotFound(id) => write!(f, "Parent folder not found: {}", id),
            TreeError::Unmodifiable(id) => write!(f, "Bookmark node is unmodifiable: {}", id),
            TreeError::FolderNotEmpty(id) => write!(f, "Bookmark folder not empty: {}", id),
            TreeError::IoError(msg) => write!(f, "Bookmark tree I/O error: {}", msg),
            TreeError::SerializationError(msg) => {
                write!(f, "Bookmark tree serialization error: {}", msg)
            }
            TreeError::StateError(msg) => write!(f, "Bookmark tree state error: {}", msg),
        }
    }
}

impl std::error::Error for TreeError {}

// === SyncError ===

/// Top-level error of an import or sync run.
#[derive(Debug)]
pub enum SyncError {
    Store(StoreError),
    Storage(StorageError),
    Tree(TreeError),
    /// Another import or sync holds the in-flight slot.
    AlreadyRunning,
}

impl fmt::Display for SyncError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncError::Store(e) => write!(f, "Sync failed: {}", e),
            SyncError::Storage(e) => write!(f, "Sync failed: {}", e),
            SyncError::Tree(e) => write!(f, "Sync failed: {}", e),
            SyncError::AlreadyRunning => write!(f, "Another import or sync is already running"),
        }
    }
}

impl std::error::Error for SyncError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SyncError::Store(e) => Some(e),
            SyncError::Storage(e) => Some(e),
            SyncError::Tree(e) => Some(e),
            SyncError::AlreadyRunning => None,
        }
    }
}

impl From<StoreError> for SyncError {
    fn from(e: StoreError) -> Self {
        SyncError::Store(e)
    }
}

impl From<StorageError> for SyncError {
    fn from(e: StorageError) -> Self {
        SyncError::Storage(e)
    }
}

impl From<TreeError> for SyncError {
    fn from(e: TreeError) -> Self {
        SyncError::Tree(e)
    }
}
