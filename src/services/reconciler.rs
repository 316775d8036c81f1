//! Three-way reconciliation between the local and remote collections.
//!
//! Conflict policy is "most recently modified wins" on `updated`; an equal
//! stamp keeps the local copy and reports nothing. Tombstones are ordinary
//! records here: a winning tombstone stays in the unified collection and
//! lands in the matching update set.

use std::collections::{HashMap, HashSet};

use tracing::warn;

use crate::types::bookmark::BookmarkRecord;
use crate::types::sync::SyncResult;

/// Reconciles `local` against `remote`.
///
/// Every id present on either side appears exactly once in
/// `result.bookmarks`: local order first, then remote-only records in remote
/// order. Repeated ids within one side keep their first occurrence.
pub fn reconcile(local: &[BookmarkRecord], remote: &[BookmarkRecord]) -> SyncResult {
    let mut remote_by_id: HashMap<&str, &BookmarkRecord> = HashMap::with_capacity(remote.len());
    for record in remote {
        remote_by_id.entry(record.id.as_str()).or_insert(record);
    }

    let mut result = SyncResult::default();
    let mut seen: HashSet<&str> = HashSet::with_capacity(local.len() + remote.len());

    for item in local {
        if !seen.insert(item.id.as_str()) {
            warn!(id = %item.id, "Duplicate id in local collection, keeping first");
            continue;
        }
        match remote_by_id.get(item.id.as_str()) {
            None => {
                result.bookmarks.push(item.clone());
                result.local_new.push(item.clone());
            }
            Some(existing) if item.updated > existing.updated => {
                result.bookmarks.push(item.clone());
                result.local_updates.push(item.clone());
            }
            Some(existing) if existing.updated > item.updated => {
                result.bookmarks.push((*existing).clone());
                result.remote_updates.push((*existing).clone());
            }
            Some(_) => result.bookmarks.push(item.clone()),
        }
    }

    for item in remote {
        if seen.insert(item.id.as_str()) {
            result.bookmarks.push(item.clone());
            result.remote_new.push(item.clone());
        }
    }

    result
}
