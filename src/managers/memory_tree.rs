//! In-process native bookmark tree.
//!
//! `MemoryTree` implements [`NativeTree`] over an owned `BookmarkNode`
//! hierarchy. The CLI loads it from a JSON file, lets the engine mutate it,
//! then writes it back; tests use it directly.

use std::fs;
use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;
use uuid::Uuid;

use crate::services::native_tree::NativeTree;
use crate::types::bookmark::now_millis;
use crate::types::errors::TreeError;
use crate::types::tree::{BookmarkNode, CreateDetails, NodeType, UpdateChanges};

pub struct MemoryTree {
    root: Mutex<BookmarkNode>,
}

impl MemoryTree {
    /// Wraps `root`, normalising `parentId` and `index` of every descendant.
    pub fn new(mut root: BookmarkNode) -> Self {
        root.parent_id = None;
        root.index = None;
        normalize(&mut root);
        Self {
            root: Mutex::new(root),
        }
    }

    /// A root with the four top-level folders browsers usually expose.
    pub fn with_default_folders() -> Self {
        let root = BookmarkNode::folder("root________", "").unmodifiable().with_children(vec![
            BookmarkNode::folder("menu________", "Bookmarks Menu"),
            BookmarkNode::folder("toolbar_____", "Bookmarks Toolbar"),
            BookmarkNode::folder("unfiled_____", "Other Bookmarks"),
            BookmarkNode::folder("mobile______", "Mobile Bookmarks"),
        ]);
        Self::new(root)
    }

    /// Loads a tree from a JSON file holding the root node.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, TreeError> {
        let content = fs::read_to_string(path.as_ref())
            .map_err(|e| TreeError::IoError(format!("Failed to read tree file: {}", e)))?;
        let root: BookmarkNode = serde_json::from_str(&content)
            .map_err(|e| TreeError::SerializationError(format!("Failed to parse tree file: {}", e)))?;
        Ok(Self::new(root))
    }

    /// Writes the tree back as pretty JSON, creating parent directories.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), TreeError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| TreeError::IoError(format!("Failed to create tree directory: {}", e)))?;
        }
        let json = serde_json::to_string_pretty(&self.snapshot()?)
            .map_err(|e| TreeError::SerializationError(format!("Failed to serialize tree: {}", e)))?;
        fs::write(path, json)
            .map_err(|e| TreeError::IoError(format!("Failed to write tree file: {}", e)))
    }

    /// Clone of the current root.
    pub fn snapshot(&self) -> Result<BookmarkNode, TreeError> {
        Ok(self.lock()?.clone())
    }

    /// Looks up a node anywhere in the tree.
    pub fn find(&self, id: &str) -> Result<Option<BookmarkNode>, TreeError> {
        let root = self.lock()?;
        Ok(find_node(&root, id).cloned())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, BookmarkNode>, TreeError> {
        self.root.lock().map_err(|e| TreeError::StateError(e.to_string()))
    }
}

impl Default for MemoryTree {
    fn default() -> Self {
        Self::with_default_folders()
    }
}

#[async_trait]
impl NativeTree for MemoryTree {
    async fn get_tree(&self) -> Result<BookmarkNode, TreeError> {
        self.snapshot()
    }

    async fn create(&self, details: CreateDetails) -> Result<String, TreeError> {
        let mut root = self.lock()?;
        let parent_id = match details.parent_id {
            Some(id) => id,
            None => default_parent_id(&root),
        };
        let parent = find_node_mut(&mut root, &parent_id)
            .filter(|node| node.is_folder())
            .ok_or_else(|| TreeError::ParentNotFound(parent_id.clone()))?;

        let id = Uuid::new_v4().to_string();
        let mut node = BookmarkNode::bookmark(id.clone(), details.title, details.url);
        node.date_added = Some(now_millis());

        let position = details
            .index
            .map(|i| (i as usize).min(parent.children.len()))
            .unwrap_or(parent.children.len());
        parent.children.insert(position, node);
        normalize(parent);
        Ok(id)
    }

    async fn update(&self, id: &str, changes: UpdateChanges) -> Result<(), TreeError> {
        let mut root = self.lock()?;
        let node = find_node_mut(&mut root, id).ok_or_else(|| TreeError::NotFound(id.to_string()))?;
        if node.unmodifiable {
            return Err(TreeError::Unmodifiable(id.to_string()));
        }
        node.title = changes.title;
        if node.node_type == NodeType::Bookmark {
            node.url = Some(changes.url);
        }
        Ok(())
    }

    async fn remove(&self, id: &str) -> Result<(), TreeError> {
        let mut root = self.lock()?;
        if root.id == id {
            return Err(TreeError::Unmodifiable(id.to_string()));
        }
        let parent = find_parent_mut(&mut root, id).ok_or_else(|| TreeError::NotFound(id.to_string()))?;
        let position = parent
            .children
            .iter()
            .position(|child| child.id == id)
            .ok_or_else(|| TreeError::NotFound(id.to_string()))?;

        let child = &parent.children[position];
        if child.unmodifiable {
            return Err(TreeError::Unmodifiable(id.to_string()));
        }
        if !child.children.is_empty() {
            return Err(TreeError::FolderNotEmpty(id.to_string()));
        }
        parent.children.remove(position);
        normalize(parent);
        Ok(())
    }
}

/// First modifiable top-level folder, or the root itself.
fn default_parent_id(root: &BookmarkNode) -> String {
    root.children
        .iter()
        .find(|child| child.is_folder() && !child.unmodifiable)
        .map(|child| child.id.clone())
        .unwrap_or_else(|| root.id.clone())
}

fn normalize(node: &mut BookmarkNode) {
    let parent_id = node.id.clone();
    for (i, child) in node.children.iter_mut().enumerate() {
        child.parent_id = Some(parent_id.clone());
        child.index = Some(i as u32);
        normalize(child);
    }
}

fn find_node<'a>(node: &'a BookmarkNode, id: &str) -> Option<&'a BookmarkNode> {
    if node.id == id {
        return Some(node);
    }
    node.children.iter().find_map(|child| find_node(child, id))
}

fn find_node_mut<'a>(node: &'a mut BookmarkNode, id: &str) -> Option<&'a mut BookmarkNode> {
    if node.id == id {
        return Some(node);
    }
    node.children.iter_mut().find_map(|child| find_node_mut(child, id))
}

fn find_parent_mut<'a>(node: &'a mut BookmarkNode, id: &str) -> Option<&'a mut BookmarkNode> {
    if node.children.iter().any(|child| child.id == id) {
        return Some(node);
    }
    node.children.iter_mut().find_map(|child| find_parent_mut(child, id))
}
