use serde::{Deserialize, Serialize};

/// Kind of node in the native bookmark tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
    Bookmark,
    Folder,
    Separator,
}

/// A node of the native hierarchical bookmark store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookmarkNode {
    #[serde(rename = "type")]
    pub node_type: NodeType,
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_added: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<u32>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub unmodifiable: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<BookmarkNode>,
}

impl BookmarkNode {
    /// Creates an empty folder node.
    pub fn folder(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            node_type: NodeType::Folder,
            id: id.into(),
            title: title.into(),
            url: None,
            date_added: None,
            parent_id: None,
            index: None,
            unmodifiable: false,
            children: Vec::new(),
        }
    }

    /// Creates a bookmark leaf.
    pub fn bookmark(id: impl Into<String>, title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            node_type: NodeType::Bookmark,
            url: Some(url.into()),
            ..Self::folder(id, title)
        }
    }

    pub fn with_children(mut self, children: Vec<BookmarkNode>) -> Self {
        self.children = children;
        self
    }

    pub fn unmodifiable(mut self) -> Self {
        self.unmodifiable = true;
        self
    }

    pub fn is_folder(&self) -> bool {
        self.node_type == NodeType::Folder
    }
}

/// Arguments of a native `create` call. `None` fields are left unset.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CreateDetails {
    pub title: String,
    pub url: String,
    pub index: Option<u32>,
    pub parent_id: Option<String>,
}

/// Arguments of a native `update` call.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct UpdateChanges {
    pub title: String,
    pub url: String,
}
