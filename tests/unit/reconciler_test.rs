//! Unit tests for the three-way reconciler.

use marksync::services::reconciler::reconcile;
use marksync::types::bookmark::BookmarkRecord;
use rstest::rstest;

fn record(id: &str, title: &str, updated: i64) -> BookmarkRecord {
    BookmarkRecord::new(id, title, format!("https://{}.example", id)).stamped(updated)
}

fn ids(records: &[BookmarkRecord]) -> Vec<&str> {
    records.iter().map(|r| r.id.as_str()).collect()
}

/// Scenario A: a record only on the remote side is remote-new.
#[test]
fn test_remote_only_record_is_remote_new() {
    let r1 = record("1", "A", 100);
    let result = reconcile(&[], &[r1.clone()]);

    assert_eq!(result.bookmarks, vec![r1.clone()]);
    assert_eq!(result.remote_new, vec![r1]);
    assert!(result.local_new.is_empty());
    assert!(result.local_updates.is_empty());
    assert!(result.remote_updates.is_empty());
}

#[test]
fn test_local_only_record_is_local_new() {
    let r1 = record("1", "A", 100);
    let result = reconcile(&[r1.clone()], &[]);

    assert_eq!(result.bookmarks, vec![r1.clone()]);
    assert_eq!(result.local_new, vec![r1]);
    assert!(result.remote_new.is_empty());
}

/// Scenario B: the newer local edit wins.
#[test]
fn test_newer_local_edit_wins() {
    let local = record("1", "A2", 200);
    let remote = record("1", "A1", 100);
    let result = reconcile(&[local.clone()], &[remote]);

    assert_eq!(result.bookmarks, vec![local.clone()]);
    assert_eq!(result.local_updates, vec![local]);
    assert!(result.remote_updates.is_empty());
}

#[test]
fn test_newer_remote_edit_wins() {
    let local = record("1", "A1", 100);
    let remote = record("1", "A2", 200);
    let result = reconcile(&[local], &[remote.clone()]);

    assert_eq!(result.bookmarks, vec![remote.clone()]);
    assert_eq!(result.remote_updates, vec![remote]);
    assert!(result.local_updates.is_empty());
}

/// Scenario C: equal stamps keep the local copy and report nothing,
/// even when the contents differ.
#[rstest]
#[case("A", "A")]
#[case("local title", "remote title")]
fn test_equal_timestamps_keep_local_silently(#[case] local_title: &str, #[case] remote_title: &str) {
    let local = record("1", local_title, 150);
    let remote = record("1", remote_title, 150);
    let result = reconcile(&[local.clone()], &[remote]);

    assert_eq!(result.bookmarks, vec![local]);
    assert!(!result.has_changes());
}

/// Scenario D: a newer remote tombstone wins over a live local record.
#[test]
fn test_newer_remote_tombstone_is_remote_update() {
    let local = record("1", "A", 100);
    let mut tombstone = record("1", "A", 300);
    tombstone.deleted = true;

    let result = reconcile(&[local], &[tombstone.clone()]);

    assert_eq!(result.remote_updates, vec![tombstone.clone()]);
    assert_eq!(result.bookmarks, vec![tombstone]);
}

#[test]
fn test_newer_local_tombstone_is_local_update() {
    let mut tombstone = record("1", "A", 300);
    tombstone.deleted = true;
    let remote = record("1", "A", 100);

    let result = reconcile(&[tombstone.clone()], &[remote]);

    assert_eq!(result.local_updates, vec![tombstone.clone()]);
    assert!(result.bookmarks[0].deleted);
}

#[test]
fn test_older_tombstone_loses_to_live_edit() {
    let mut tombstone = record("1", "A", 100);
    tombstone.deleted = true;
    let edited = record("1", "A edited", 200);

    let result = reconcile(&[tombstone], &[edited.clone()]);

    assert_eq!(result.bookmarks, vec![edited]);
    assert!(!result.bookmarks[0].deleted);
}

#[test]
fn test_output_order_is_local_then_remote_only() {
    let local = vec![record("b", "B", 1), record("a", "A", 1)];
    let remote = vec![record("c", "C", 1), record("a", "A", 1), record("d", "D", 1)];

    let result = reconcile(&local, &remote);
    assert_eq!(ids(&result.bookmarks), vec!["b", "a", "c", "d"]);
    assert_eq!(ids(&result.local_new), vec!["b"]);
    assert_eq!(ids(&result.remote_new), vec!["c", "d"]);
}

#[test]
fn test_mixed_scenario_partitions_changes() {
    let local = vec![
        record("same", "S", 10),
        record("local-edit", "L2", 30),
        record("remote-edit", "R1", 10),
        record("local-only", "LO", 5),
    ];
    let remote = vec![
        record("same", "S", 10),
        record("local-edit", "L1", 20),
        record("remote-edit", "R2", 40),
        record("remote-only", "RO", 5),
    ];

    let result = reconcile(&local, &remote);

    assert_eq!(result.bookmarks.len(), 5);
    assert_eq!(ids(&result.local_updates), vec!["local-edit"]);
    assert_eq!(ids(&result.remote_updates), vec!["remote-edit"]);
    assert_eq!(ids(&result.local_new), vec!["local-only"]);
    assert_eq!(ids(&result.remote_new), vec!["remote-only"]);
}

#[test]
fn test_duplicate_ids_appear_once() {
    let local = vec![record("1", "first", 10), record("1", "second", 20)];
    let remote = vec![record("2", "x", 1), record("2", "y", 2)];

    let result = reconcile(&local, &remote);

    assert_eq!(ids(&result.bookmarks), vec!["1", "2"]);
    assert_eq!(result.bookmarks[0].title, "first");
    assert_eq!(result.bookmarks[1].title, "x");
}
