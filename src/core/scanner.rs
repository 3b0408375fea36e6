//! Walks a local folder and reports its files the way a browser folder
//! picker does: one record per file, with a `/`-separated path that starts
//! with the folder's own name.

use super::{build_globset_from_patterns, CoreError, Result, SelectedFile};
use camino::Utf8Path;
use ignore::WalkBuilder;
use std::collections::HashSet;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// The files found below a selected folder.
#[derive(Debug, Clone)]
pub struct ScanResult {
    /// Name of the selected folder, the first segment of every path.
    pub folder_name: String,
    pub files: Vec<SelectedFile>,
    /// Entries excluded by ignore patterns.
    pub ignored: usize,
    /// Entries that could not be read or had non UTF-8 paths.
    pub skipped: usize,
}

pub struct DirectoryScanner {
    ignore_patterns: HashSet<String>,
}

impl DirectoryScanner {
    pub fn new(ignore_patterns: HashSet<String>) -> Self {
        Self { ignore_patterns }
    }

    /// Collects every regular file below `root_path`, sorted by path.
    ///
    /// Hidden files are included and `.gitignore` files are not consulted;
    /// only the configured ignore patterns prune the walk.
    pub fn scan(&self, root_path: &Path) -> Result<ScanResult> {
        let root = root_path
            .canonicalize()
            .map_err(|e| CoreError::Io(e, root_path.to_path_buf()))?;
        if !root.is_dir() {
            return Err(CoreError::NotADirectory(root_path.to_path_buf()));
        }

        let folder_name = root
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| "root".to_string());

        let ignore_set = build_globset_from_patterns(&self.ignore_patterns);
        let ignored = Arc::new(AtomicUsize::new(0));

        let filter_root = root.clone();
        let filter_ignored = ignored.clone();
        let walker = WalkBuilder::new(&root)
            .hidden(false)
            .ignore(false)
            .git_ignore(false)
            .git_global(false)
            .git_exclude(false)
            .parents(false)
            .follow_links(false)
            .sort_by_file_name(|a, b| a.cmp(b))
            .filter_entry(move |entry| {
                let Ok(relative) = entry.path().strip_prefix(&filter_root) else {
                    return true;
                };
                if relative.as_os_str().is_empty() || !ignore_set.is_match(relative) {
                    return true;
                }
                filter_ignored.fetch_add(1, Ordering::Relaxed);
                false
            })
            .build();

        let mut files = Vec::new();
        let mut skipped = 0;

        for result in walker {
            let entry = match result {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!("Skipping unreadable entry: {}", e);
                    skipped += 1;
                    continue;
                }
            };

            if !entry.file_type().is_some_and(|t| t.is_file()) {
                continue;
            }

            let size = match entry.metadata() {
                Ok(metadata) => metadata.len(),
                Err(e) => {
                    tracing::warn!("Could not read metadata for {:?}: {}", entry.path(), e);
                    skipped += 1;
                    continue;
                }
            };

            let Some(relative) = entry
                .path()
                .strip_prefix(&root)
                .ok()
                .and_then(Utf8Path::from_path)
            else {
                tracing::warn!("Skipping non UTF-8 path: {:?}", entry.path());
                skipped += 1;
                continue;
            };

            let segments: Vec<&str> = relative.components().map(|c| c.as_str()).collect();
            files.push(SelectedFile {
                relative_path: format!("{}/{}", folder_name, segments.join("/")),
                size,
            });
        }

        let ignored = ignored.load(Ordering::Relaxed);
        tracing::info!(
            "Scanned {:?}: {} files, {} ignored, {} skipped",
            root,
            files.len(),
            ignored,
            skipped
        );

        Ok(ScanResult {
            folder_name,
            files,
            ignored,
            skipped,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::test_helpers::write_files;

    fn write(root: &Path, path: &str, content: &str) {
        write_files(root, &[(path, content)]).unwrap();
    }

    #[test]
    fn paths_start_with_folder_name() {
        let temp = tempfile::tempdir().unwrap();
        let root = temp.path().join("proj");
        write(&root, "README.md", "hello");
        write(&root, "src/main.rs", "fn main() {}");

        let result = DirectoryScanner::new(HashSet::new()).scan(&root).unwrap();
        assert_eq!(result.folder_name, "proj");
        let paths: Vec<&str> = result
            .files
            .iter()
            .map(|f| f.relative_path.as_str())
            .collect();
        assert_eq!(paths, vec!["proj/README.md", "proj/src/main.rs"]);
        assert_eq!(result.files[0].size, 5);
    }

    #[test]
    fn ignore_patterns_prune_the_walk() {
        let temp = tempfile::tempdir().unwrap();
        let root = temp.path().join("proj");
        write(&root, "keep.txt", "k");
        write(&root, "node_modules/pkg/index.js", "x");
        write(&root, "debug.log", "l");

        let patterns = ["node_modules", "*.log"]
            .iter()
            .map(|p| p.to_string())
            .collect();
        let result = DirectoryScanner::new(patterns).scan(&root).unwrap();
        assert_eq!(result.files.len(), 1);
        assert_eq!(result.files[0].relative_path, "proj/keep.txt");
        assert_eq!(result.ignored, 2);
    }

    #[test]
    fn file_path_is_not_a_directory() {
        let temp = tempfile::tempdir().unwrap();
        write(temp.path(), "file.txt", "x");
        let err = DirectoryScanner::new(HashSet::new())
            .scan(&temp.path().join("file.txt"))
            .unwrap_err();
        assert!(matches!(err, CoreError::NotADirectory(_)));
    }

    #[test]
    fn missing_path_is_an_io_error() {
        let temp = tempfile::tempdir().unwrap();
        let err = DirectoryScanner::new(HashSet::new())
            .scan(&temp.path().join("missing"))
            .unwrap_err();
        assert!(matches!(err, CoreError::Io(_, _)));
    }
}
