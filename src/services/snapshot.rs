//! Snapshot extraction: flattens the native tree into records.

use crate::types::bookmark::BookmarkRecord;
use crate::types::tree::{BookmarkNode, NodeType};

/// Collects every modifiable bookmark under `root`, depth first, in child order.
///
/// Folders contribute only their children. Separators and unmodifiable
/// leaves are skipped. Each record is stamped with `updated = now` and is
/// never a tombstone.
pub fn collect_bookmarks(root: &BookmarkNode, now: i64) -> Vec<BookmarkRecord> {
    let mut records = Vec::new();
    collect_into(root, now, &mut records);
    records
}

fn collect_into(node: &BookmarkNode, now: i64, records: &mut Vec<BookmarkRecord>) {
    match node.node_type {
        NodeType::Bookmark if !node.unmodifiable => records.push(BookmarkRecord {
            id: node.id.clone(),
            title: node.title.clone(),
            url: node.url.clone().unwrap_or_default(),
            created: node.date_added,
            updated: now,
            deleted: false,
            parent_id: node.parent_id.clone(),
            index: node.index,
        }),
        NodeType::Folder => {
            for child in &node.children {
                collect_into(child, now, records);
            }
        }
        _ => {}
    }
}
