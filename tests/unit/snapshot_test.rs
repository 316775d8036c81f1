//! Unit tests for snapshot extraction from the native tree.

use marksync::services::snapshot::collect_bookmarks;
use marksync::types::tree::{BookmarkNode, NodeType};

const NOW: i64 = 1_700_000_000_000;

#[test]
fn test_skips_unmodifiable_leaf_and_folder_itself() {
    let mut normal = BookmarkNode::bookmark("n1", "Normal", "https://normal.example");
    normal.parent_id = Some("f1".to_string());
    normal.index = Some(1);
    normal.date_added = Some(1_000);
    let root = BookmarkNode::folder("f1", "Folder").with_children(vec![
        BookmarkNode::bookmark("u1", "Managed", "https://managed.example").unmodifiable(),
        normal,
    ]);

    let records = collect_bookmarks(&root, NOW);

    assert_eq!(records.len(), 1);
    let record = &records[0];
    assert_eq!(record.id, "n1");
    assert_eq!(record.title, "Normal");
    assert_eq!(record.url, "https://normal.example");
    assert_eq!(record.created, Some(1_000));
    assert_eq!(record.updated, NOW);
    assert!(!record.deleted);
    assert_eq!(record.parent_id.as_deref(), Some("f1"));
    assert_eq!(record.index, Some(1));
}

#[test]
fn test_depth_first_in_child_order() {
    let root = BookmarkNode::folder("root", "").with_children(vec![
        BookmarkNode::folder("a", "A").with_children(vec![
            BookmarkNode::bookmark("1", "one", "https://1.example"),
            BookmarkNode::folder("a1", "A1")
                .with_children(vec![BookmarkNode::bookmark("2", "two", "https://2.example")]),
        ]),
        BookmarkNode::bookmark("3", "three", "https://3.example"),
    ]);

    let ids: Vec<String> = collect_bookmarks(&root, NOW).into_iter().map(|r| r.id).collect();
    assert_eq!(ids, vec!["1", "2", "3"]);
}

#[test]
fn test_separators_are_skipped() {
    let mut separator = BookmarkNode::folder("sep", "");
    separator.node_type = NodeType::Separator;
    let root = BookmarkNode::folder("root", "").with_children(vec![
        separator,
        BookmarkNode::bookmark("1", "one", "https://1.example"),
    ]);

    assert_eq!(collect_bookmarks(&root, NOW).len(), 1);
}

#[test]
fn test_folders_flagged_unmodifiable_are_still_traversed() {
    let root = BookmarkNode::folder("root", "")
        .unmodifiable()
        .with_children(vec![BookmarkNode::bookmark("1", "one", "https://1.example")]);

    assert_eq!(collect_bookmarks(&root, NOW).len(), 1);
}

#[test]
fn test_extraction_is_repeatable() {
    let root = BookmarkNode::folder("root", "")
        .with_children(vec![BookmarkNode::bookmark("1", "one", "https://1.example")]);
    assert_eq!(collect_bookmarks(&root, NOW), collect_bookmarks(&root, NOW));
}

#[test]
fn test_parses_browser_shaped_json() {
    let json = r#"{
        "type": "folder", "id": "root________", "title": "",
        "children": [
            { "type": "folder", "id": "toolbar_____", "title": "Toolbar", "parentId": "root________", "index": 0,
              "children": [
                { "type": "bookmark", "id": "abc", "title": "Rust", "url": "https://rust-lang.org",
                  "dateAdded": 1600000000000, "parentId": "toolbar_____", "index": 0 },
                { "type": "separator", "id": "sep", "parentId": "toolbar_____", "index": 1 }
              ] }
        ]
    }"#;
    let root: BookmarkNode = serde_json::from_str(json).unwrap();

    let records = collect_bookmarks(&root, NOW);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].created, Some(1_600_000_000_000));
}
