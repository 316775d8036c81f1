//! Contract of the native hierarchical bookmark store.

use async_trait::async_trait;

use crate::types::errors::TreeError;
use crate::types::tree::{BookmarkNode, CreateDetails, UpdateChanges};

/// The browser's own bookmark tree, addressed by node id.
#[async_trait]
pub trait NativeTree: Send + Sync {
    /// Returns the root node with all descendants.
    async fn get_tree(&self) -> Result<BookmarkNode, TreeError>;
    /// Creates a bookmark and returns the id the tree assigned to it.
    async fn create(&self, details: CreateDetails) -> Result<String, TreeError>;
    async fn update(&self, id: &str, changes: UpdateChanges) -> Result<(), TreeError>;
    async fn remove(&self, id: &str) -> Result<(), TreeError>;
}
