//! Unit tests for applying remote changes to the native tree.

use marksync::managers::memory_tree::MemoryTree;
use marksync::services::applier::apply_remote_changes;
use marksync::types::bookmark::BookmarkRecord;
use marksync::types::id_map::IdMap;
use marksync::types::sync::{ApplyReport, SyncResult};
use marksync::types::tree::BookmarkNode;

fn tree() -> MemoryTree {
    MemoryTree::new(
        BookmarkNode::folder("root", "").unmodifiable().with_children(vec![
            BookmarkNode::folder("toolbar", "Toolbar").with_children(vec![
                BookmarkNode::bookmark("a", "A", "https://a.example"),
                BookmarkNode::bookmark("b", "B", "https://b.example"),
            ]),
            BookmarkNode::folder("other", "Other"),
        ]),
    )
}

fn record(id: &str, title: &str, updated: i64) -> BookmarkRecord {
    BookmarkRecord::new(id, title, format!("https://{}.example", id)).stamped(updated)
}

fn placed(id: &str, title: &str, parent: &str, index: u32) -> BookmarkRecord {
    let mut r = record(id, title, 100);
    r.parent_id = Some(parent.to_string());
    r.index = Some(index);
    r
}

/// Scenario D: a newer remote tombstone removes the native bookmark.
#[tokio::test]
async fn test_remote_tombstone_removes_native_bookmark() {
    let tree = tree();
    let mut tombstone = record("a", "A", 300);
    tombstone.deleted = true;
    let result = SyncResult {
        remote_updates: vec![tombstone],
        ..Default::default()
    };

    let report = apply_remote_changes(&tree, &result, &mut IdMap::default()).await.unwrap();

    assert_eq!(report.removed, 1);
    assert!(report.needs_reimport());
    assert!(tree.find("a").unwrap().is_none());
}

#[tokio::test]
async fn test_remote_update_changes_title_and_url() {
    let tree = tree();
    let mut changed = record("b", "B renamed", 300);
    changed.url = "https://b2.example".to_string();
    let result = SyncResult {
        remote_updates: vec![changed],
        ..Default::default()
    };

    let report = apply_remote_changes(&tree, &result, &mut IdMap::default()).await.unwrap();

    assert_eq!(report.updated, 1);
    assert!(!report.needs_reimport());
    let b = tree.find("b").unwrap().unwrap();
    assert_eq!(b.title, "B renamed");
    assert_eq!(b.url.as_deref(), Some("https://b2.example"));
}

#[tokio::test]
async fn test_remove_of_missing_bookmark_is_skipped() {
    let tree = tree();
    let mut tombstone = record("gone", "Gone", 300);
    tombstone.deleted = true;
    let result = SyncResult {
        remote_updates: vec![tombstone],
        ..Default::default()
    };

    let report = apply_remote_changes(&tree, &result, &mut IdMap::default()).await.unwrap();
    assert_eq!(report.skipped, 1);
    assert_eq!(report.removed, 0);
}

#[tokio::test]
async fn test_update_of_missing_bookmark_recreates_it() {
    let tree = tree();
    let mut ids = IdMap::default();
    let result = SyncResult {
        remote_updates: vec![record("gone", "Gone v2", 300)],
        ..Default::default()
    };

    let report = apply_remote_changes(&tree, &result, &mut ids).await.unwrap();

    assert_eq!(report.updated, 0);
    assert_eq!(report.created.len(), 1);
    let native_id = ids.native_id("gone").to_string();
    assert_eq!(native_id, report.created[0].1);
    assert_eq!(tree.find(&native_id).unwrap().unwrap().title, "Gone v2");
}

#[tokio::test]
async fn test_unmodifiable_targets_are_skipped() {
    let tree = MemoryTree::new(BookmarkNode::folder("root", "").unmodifiable().with_children(vec![
        BookmarkNode::folder("managed", "Managed").with_children(vec![
            BookmarkNode::bookmark("m1", "M1", "https://m1.example").unmodifiable(),
            BookmarkNode::bookmark("m2", "M2", "https://m2.example").unmodifiable(),
        ]),
    ]));
    let mut tombstone = record("m2", "M2", 300);
    tombstone.deleted = true;
    let result = SyncResult {
        remote_updates: vec![record("m1", "Renamed", 300), tombstone],
        ..Default::default()
    };

    let report = apply_remote_changes(&tree, &result, &mut IdMap::default()).await.unwrap();

    assert_eq!(report.skipped, 2);
    assert_eq!(tree.find("m1").unwrap().unwrap().title, "M1");
    assert!(tree.find("m2").unwrap().is_some());
}

#[tokio::test]
async fn test_linked_ids_address_native_nodes() {
    let tree = tree();
    let mut ids = IdMap::default();
    ids.link("remote-a", "a");
    ids.link("remote-b", "b");
    let mut tombstone = record("remote-b", "B", 300);
    tombstone.deleted = true;
    let result = SyncResult {
        remote_updates: vec![record("remote-a", "A renamed", 300), tombstone],
        ..Default::default()
    };

    let report = apply_remote_changes(&tree, &result, &mut ids).await.unwrap();

    assert_eq!(report.updated, 1);
    assert_eq!(report.removed, 1);
    assert_eq!(tree.find("a").unwrap().unwrap().title, "A renamed");
    assert!(tree.find("b").unwrap().is_none());
    assert_eq!(ids.native_id("remote-b"), "remote-b");
}

#[tokio::test]
async fn test_created_bookmarks_are_linked() {
    let tree = tree();
    let mut ids = IdMap::default();
    let result = SyncResult {
        remote_new: vec![placed("r1", "Remote", "other", 0)],
        ..Default::default()
    };

    let report = apply_remote_changes(&tree, &result, &mut ids).await.unwrap();

    assert_eq!(ids.native_id("r1"), report.created[0].1);
    assert_eq!(ids.record_id(&report.created[0].1), "r1");
}

#[tokio::test]
async fn test_remote_new_is_created_in_its_folder() {
    let tree = tree();
    let result = SyncResult {
        remote_new: vec![placed("r1", "Remote", "other", 0)],
        ..Default::default()
    };

    let report = apply_remote_changes(&tree, &result, &mut IdMap::default()).await.unwrap();

    assert_eq!(report.created.len(), 1);
    let (remote_id, native_id) = &report.created[0];
    assert_eq!(remote_id, "r1");
    let node = tree.find(native_id).unwrap().unwrap();
    assert_eq!(node.title, "Remote");
    assert_eq!(node.parent_id.as_deref(), Some("other"));
}

#[tokio::test]
async fn test_unknown_parent_falls_back_to_default_folder() {
    let tree = tree();
    let result = SyncResult {
        remote_new: vec![placed("r1", "Orphan", "folder-from-another-device", 3)],
        ..Default::default()
    };

    let report = apply_remote_changes(&tree, &result, &mut IdMap::default()).await.unwrap();

    let node = tree.find(&report.created[0].1).unwrap().unwrap();
    assert_eq!(node.parent_id.as_deref(), Some("toolbar"));
}

#[tokio::test]
async fn test_creates_run_in_index_order() {
    let tree = tree();
    let result = SyncResult {
        remote_new: vec![
            placed("r2", "Second", "other", 1),
            placed("r1", "First", "other", 0),
        ],
        ..Default::default()
    };

    apply_remote_changes(&tree, &result, &mut IdMap::default()).await.unwrap();

    let other = tree.find("other").unwrap().unwrap();
    let titles: Vec<&str> = other.children.iter().map(|c| c.title.as_str()).collect();
    assert_eq!(titles, vec!["First", "Second"]);
}

#[tokio::test]
async fn test_tombstone_in_remote_new_is_not_created() {
    let tree = tree();
    let mut tombstone = placed("r1", "Dead", "other", 0);
    tombstone.deleted = true;
    let result = SyncResult {
        remote_new: vec![tombstone],
        ..Default::default()
    };

    let report = apply_remote_changes(&tree, &result, &mut IdMap::default()).await.unwrap();

    assert!(report.created.is_empty());
    assert_eq!(report.skipped, 1);
    assert!(tree.find("other").unwrap().unwrap().children.is_empty());
}

#[tokio::test]
async fn test_local_side_changes_do_not_touch_tree() {
    let tree = tree();
    let before = tree.snapshot().unwrap();
    let result = SyncResult {
        local_new: vec![record("x", "X", 1)],
        local_updates: vec![record("a", "A local", 500)],
        ..Default::default()
    };

    let report = apply_remote_changes(&tree, &result, &mut IdMap::default()).await.unwrap();

    assert_eq!(report, ApplyReport::default());
    assert_eq!(tree.snapshot().unwrap(), before);
}
