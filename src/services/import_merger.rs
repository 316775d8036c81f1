//! Import merge: folds a fresh tree snapshot into the stored collection.
//!
//! The native tree is authoritative for existence here. Live records that
//! left the tree are dropped, not tombstoned. Stored tombstones are kept: they
//! stand for an absence already, and dropping one before it reached the
//! remote store would let the next sync bring the bookmark back.

use std::collections::{HashMap, HashSet};

use crate::types::bookmark::{bump_timestamp, BookmarkRecord};
use crate::types::sync::MergeStats;

/// Merges `imported` (tree snapshot) into `current` (stored collection).
///
/// Output follows `imported` order, followed by stored tombstones the tree
/// does not have. A content-equal record keeps the stored
/// copy untouched so repeated imports do not churn timestamps; a changed or
/// unknown record takes the imported copy stamped with `now`.
pub fn merge_bookmarks(
    current: &[BookmarkRecord],
    imported: &[BookmarkRecord],
    now: i64,
) -> (Vec<BookmarkRecord>, MergeStats) {
    let mut by_id: HashMap<&str, &BookmarkRecord> = HashMap::with_capacity(current.len());
    for record in current {
        by_id.entry(record.id.as_str()).or_insert(record);
    }

    let mut stats = MergeStats::default();
    let mut merged = Vec::with_capacity(imported.len());

    for bookmark in imported {
        match by_id.get(bookmark.id.as_str()) {
            Some(existing) if existing.content_eq(bookmark) => {
                merged.push((*existing).clone());
                stats.unchanged += 1;
            }
            Some(existing) => {
                merged.push(BookmarkRecord {
                    created: existing.created.or(bookmark.created),
                    updated: bump_timestamp(existing.updated, now),
                    ..bookmark.clone()
                });
                stats.updated += 1;
            }
            None => {
                merged.push(bookmark.stamped(now));
                stats.new += 1;
            }
        }
    }

    let imported_ids: HashSet<&str> = imported.iter().map(|b| b.id.as_str()).collect();
    for (id, record) in first_occurrences(current) {
        if imported_ids.contains(id) {
            continue;
        }
        if record.deleted {
            merged.push(record.clone());
        } else {
            stats.removed += 1;
        }
    }

    (merged, stats)
}

/// `current` in stored order, repeated ids keeping their first occurrence.
fn first_occurrences<'a>(
    current: &'a [BookmarkRecord],
) -> impl Iterator<Item = (&'a str, &'a BookmarkRecord)> + 'a {
    let mut seen: HashSet<&str> = HashSet::with_capacity(current.len());
    current
        .iter()
        .filter(move |record| seen.insert(record.id.as_str()))
        .map(|record| (record.id.as_str(), record))
}
