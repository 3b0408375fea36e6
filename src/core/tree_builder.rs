//! Builds the nested folder tree sent to the metadata service, and renders
//! it as an ASCII preview.

use std::collections::HashMap;

use super::{FileEntry, SelectedFile, TreeNode};

/// Name of the synthetic root folder that holds the whole selection.
pub const ROOT_NAME: &str = "/";

/// A stateless utility for turning a flat file selection into a `TreeNode`.
pub struct TreeBuilder;

impl TreeBuilder {
    /// Converts a flat list of `/`-separated relative paths into a tree.
    ///
    /// The first pass accumulates children in first-seen order, keyed by name.
    /// The second pass freezes that structure into immutable `TreeNode`s.
    /// A file at a path that was already seen replaces the earlier entry.
    pub fn build_tree(entries: &[SelectedFile]) -> TreeNode {
        let mut root = PendingFolder::new(ROOT_NAME);

        for entry in entries {
            let segments: Vec<&str> = entry
                .relative_path
                .split('/')
                .filter(|segment| !segment.is_empty())
                .collect();

            let Some((file_name, folders)) = segments.split_last() else {
                tracing::warn!(
                    "Skipping entry without a usable path segment: {:?}",
                    entry.relative_path
                );
                continue;
            };

            let mut node = &mut root;
            for folder in folders {
                node = node.folder_mut(folder);
            }
            node.put_file(file_name, entry.size);
        }

        root.freeze()
    }

    /// Renders a tree as indented ASCII art.
    ///
    /// Within each folder, subfolders are listed before files and both are
    /// ordered by name.
    pub fn render_ascii(tree: &TreeNode) -> String {
        let mut result = String::new();
        result.push_str(&format!("{}\n", tree.name()));
        if let TreeNode::Folder { children, .. } = tree {
            Self::render_children(children, &mut result, "");
        }
        result
    }

    fn render_children(children: &[TreeNode], result: &mut String, prefix: &str) {
        let mut sorted: Vec<&TreeNode> = children.iter().collect();
        sorted.sort_by(|a, b| match (a.is_folder(), b.is_folder()) {
            (true, false) => std::cmp::Ordering::Less,
            (false, true) => std::cmp::Ordering::Greater,
            _ => a.name().cmp(b.name()),
        });

        for (i, node) in sorted.iter().enumerate() {
            let is_last = i == sorted.len() - 1;
            let connector = if is_last { "└── " } else { "├── " };

            match node {
                TreeNode::Folder { name, children } => {
                    result.push_str(&format!("{prefix}{connector}{name}/\n"));
                    if !children.is_empty() {
                        let new_prefix = if is_last {
                            format!("{prefix}    ")
                        } else {
                            format!("{prefix}│   ")
                        };
                        Self::render_children(children, result, &new_prefix);
                    }
                }
                TreeNode::File(file) => {
                    result.push_str(&format!(
                        "{prefix}{connector}{} ({} bytes)\n",
                        file.name, file.size
                    ));
                }
            }
        }
    }
}

/// A folder under construction. Children keep first-seen order; `index`
/// maps a child name to its slot in `children`.
struct PendingFolder {
    name: String,
    children: Vec<PendingNode>,
    index: HashMap<String, usize>,
}

enum PendingNode {
    Folder(PendingFolder),
    File(FileEntry),
}

impl PendingFolder {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            children: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Returns the child folder called `name`, creating it if needed.
    /// A file occupying that name is replaced by the folder.
    fn folder_mut(&mut self, name: &str) -> &mut PendingFolder {
        let slot = match self.index.get(name).copied() {
            Some(slot) => {
                if matches!(self.children[slot], PendingNode::File(_)) {
                    self.children[slot] = PendingNode::Folder(PendingFolder::new(name));
                }
                slot
            }
            None => self.push(name, PendingNode::Folder(PendingFolder::new(name))),
        };

        match &mut self.children[slot] {
            PendingNode::Folder(folder) => folder,
            PendingNode::File(_) => unreachable!("slot was just set to a folder"),
        }
    }

    fn put_file(&mut self, name: &str, size: u64) {
        let file = PendingNode::File(FileEntry {
            name: name.to_string(),
            size,
        });
        match self.index.get(name).copied() {
            Some(slot) => self.children[slot] = file,
            None => {
                self.push(name, file);
            }
        }
    }

    fn push(&mut self, name: &str, node: PendingNode) -> usize {
        let slot = self.children.len();
        self.children.push(node);
        self.index.insert(name.to_string(), slot);
        slot
    }

    fn freeze(self) -> TreeNode {
        TreeNode::Folder {
            name: self.name,
            children: self
                .children
                .into_iter()
                .map(|child| match child {
                    PendingNode::Folder(folder) => folder.freeze(),
                    PendingNode::File(file) => TreeNode::File(file),
                })
                .collect(),
        }
    }
}
