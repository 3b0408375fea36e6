//! Property tests for building folder trees from flat path lists.

use folder_metadata::core::{SelectedFile, TreeBuilder, TreeNode};
use proptest::prelude::*;
use std::collections::{HashMap, HashSet};

/// Folder segments start with `d`, file names with `f`, so a generated path
/// never uses a file name as a folder.
fn file_path() -> impl Strategy<Value = String> {
    (
        prop::collection::vec("d[a-c]{1,2}", 0..4),
        "f[a-c]{1,2}\\.txt",
    )
        .prop_map(|(folders, file)| {
            let mut segments = vec!["root".to_string()];
            segments.extend(folders);
            segments.push(file);
            segments.join("/")
        })
}

fn entries() -> impl Strategy<Value = Vec<SelectedFile>> {
    prop::collection::hash_map(file_path(), 0u64..10_000, 0..40).prop_map(|files| {
        files
            .into_iter()
            .map(|(relative_path, size)| SelectedFile {
                relative_path,
                size,
            })
            .collect()
    })
}

fn assert_unique_child_names(node: &TreeNode) {
    let mut seen = HashSet::new();
    for child in node.children() {
        assert!(seen.insert(child.name()), "duplicate child {}", child.name());
        assert_unique_child_names(child);
    }
}

proptest! {
    #[test]
    fn every_distinct_path_becomes_exactly_one_leaf(files in entries()) {
        let tree = TreeBuilder::build_tree(&files);

        prop_assert!(tree.is_folder());
        prop_assert_eq!(tree.name(), "/");
        prop_assert_eq!(tree.file_count(), files.len());
        prop_assert_eq!(tree.total_size(), files.iter().map(|f| f.size).sum::<u64>());
        assert_unique_child_names(&tree);

        for file in &files {
            match tree.find(&file.relative_path) {
                Some(TreeNode::File(entry)) => prop_assert_eq!(entry.size, file.size),
                other => prop_assert!(false, "{} resolved to {:?}", file.relative_path, other),
            }
        }
    }

    #[test]
    fn repeated_paths_keep_the_last_size(files in entries(), extra in 1u64..500) {
        let mut doubled = files.clone();
        doubled.extend(files.iter().map(|f| SelectedFile {
            relative_path: f.relative_path.clone(),
            size: f.size + extra,
        }));

        let tree = TreeBuilder::build_tree(&doubled);
        let expected: HashMap<&str, u64> = files
            .iter()
            .map(|f| (f.relative_path.as_str(), f.size + extra))
            .collect();

        prop_assert_eq!(tree.file_count(), files.len());
        for (path, size) in expected {
            match tree.find(path) {
                Some(TreeNode::File(entry)) => prop_assert_eq!(entry.size, size),
                other => prop_assert!(false, "{} resolved to {:?}", path, other),
            }
        }
    }

    #[test]
    fn tree_survives_a_json_round_trip(files in entries()) {
        let tree = TreeBuilder::build_tree(&files);
        let json = serde_json::to_string(&tree).unwrap();
        let back: TreeNode = serde_json::from_str(&json).unwrap();
        prop_assert_eq!(back, tree);
    }
}
