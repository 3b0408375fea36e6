pub mod api_client;
pub mod error;
pub mod export;
pub mod file_handler;
pub mod patterns;
pub mod metadata;
pub mod scanner;
pub mod tree_builder;

use serde::{Deserialize, Serialize};

/// One file picked by the user, as reported by the folder selection.
///
/// `relative_path` is `/`-separated and starts with the selected folder's name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedFile {
    pub relative_path: String,
    pub size: u64,
}

/// A file leaf in the folder tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    pub name: String,
    pub size: u64,
}

/// A node of the folder tree sent to the metadata service.
///
/// Serializes as `{"type": "folder", "name", "children"}` or
/// `{"type": "file", "name", "size"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TreeNode {
    Folder {
        name: String,
        children: Vec<TreeNode>,
    },
    File(FileEntry),
}

impl TreeNode {
    pub fn name(&self) -> &str {
        match self {
            TreeNode::Folder { name, .. } => name,
            TreeNode::File(file) => &file.name,
        }
    }

    pub fn is_folder(&self) -> bool {
        matches!(self, TreeNode::Folder { .. })
    }

    /// Children of a folder; empty for files.
    pub fn children(&self) -> &[TreeNode] {
        match self {
            TreeNode::Folder { children, .. } => children,
            TreeNode::File(_) => &[],
        }
    }

    /// Number of file leaves below this node (1 for a file).
    pub fn file_count(&self) -> usize {
        match self {
            TreeNode::Folder { children, .. } => children.iter().map(TreeNode::file_count).sum(),
            TreeNode::File(_) => 1,
        }
    }

    /// Sum of all file sizes below this node.
    pub fn total_size(&self) -> u64 {
        match self {
            TreeNode::Folder { children, .. } => children.iter().map(TreeNode::total_size).sum(),
            TreeNode::File(file) => file.size,
        }
    }

    /// Looks up a descendant by its `/`-separated path relative to this node.
    pub fn find(&self, path: &str) -> Option<&TreeNode> {
        path.split('/')
            .filter(|segment| !segment.is_empty())
            .try_fold(self, |node, segment| {
                node.children().iter().find(|child| child.name() == segment)
            })
    }
}

pub use api_client::{GenerateRequest, HttpMetadataClient, MetadataApi};
pub use error::{CoreError, Result};
pub use export::{Artifact, ExportFormat};
pub use file_handler::FileHandler;
pub use patterns::build_globset_from_patterns;
pub use metadata::{FileMetadata, Metadata};
pub use scanner::DirectoryScanner;
pub use tree_builder::TreeBuilder;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tree_serializes_with_type_tags() {
        let tree = TreeNode::Folder {
            name: "/".to_string(),
            children: vec![TreeNode::File(FileEntry {
                name: "a.txt".to_string(),
                size: 3,
            })],
        };
        let value = serde_json::to_value(&tree).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "type": "folder",
                "name": "/",
                "children": [{ "type": "file", "name": "a.txt", "size": 3 }]
            })
        );
    }

    #[test]
    fn find_on_missing_path_is_none() {
        let tree = TreeNode::Folder {
            name: "/".to_string(),
            children: Vec::new(),
        };
        assert!(tree.find("nope/file").is_none());
        assert_eq!(tree.find(""), Some(&tree));
    }
}
