use serde::{Deserialize, Serialize};

use super::bookmark::BookmarkRecord;

/// Counters produced by one import merge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MergeStats {
    pub new: usize,
    pub updated: usize,
    pub unchanged: usize,
    /// Stored records that no longer exist in the native tree.
    pub removed: usize,
}

impl MergeStats {
    /// True when the merged collection differs from the stored one.
    pub fn has_changes(&self) -> bool {
        self.new > 0 || self.updated > 0 || self.removed > 0
    }
}

/// Output of a three-way reconciliation between local and remote collections.
///
/// `bookmarks` is the unified collection written to both sides. The four
/// change sets are pairwise disjoint subsets of it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncResult {
    pub bookmarks: Vec<BookmarkRecord>,
    pub local_updates: Vec<BookmarkRecord>,
    pub remote_updates: Vec<BookmarkRecord>,
    pub local_new: Vec<BookmarkRecord>,
    pub remote_new: Vec<BookmarkRecord>,
}

impl SyncResult {
    pub fn has_changes(&self) -> bool {
        !(self.local_updates.is_empty()
            && self.remote_updates.is_empty()
            && self.local_new.is_empty()
            && self.remote_new.is_empty())
    }
}

/// Body of the remote store document.
///
/// A store that was created but never written has no `bookmarks` field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bookmarks: Option<Vec<BookmarkRecord>>,
}

impl StoreDocument {
    pub fn new(bookmarks: Vec<BookmarkRecord>) -> Self {
        Self {
            bookmarks: Some(bookmarks),
        }
    }

    /// The stored collection, empty for a never-written store.
    pub fn into_bookmarks(self) -> Vec<BookmarkRecord> {
        self.bookmarks.unwrap_or_default()
    }
}

/// What the applier did to the native tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ApplyReport {
    /// (remote record id, id assigned by the native tree)
    pub created: Vec<(String, String)>,
    pub updated: usize,
    pub removed: usize,
    pub skipped: usize,
}

impl ApplyReport {
    /// Sibling indexes in the native tree may be stale after a removal.
    pub fn needs_reimport(&self) -> bool {
        self.removed > 0
    }
}

/// Result of an import run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImportOutcome {
    pub bookmarks: Vec<BookmarkRecord>,
    pub stats: MergeStats,
    pub persisted: bool,
}

/// Result of a completed sync run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncOutcome {
    pub store_id: String,
    pub result: SyncResult,
    pub applied: ApplyReport,
    pub reimport: Option<MergeStats>,
}
