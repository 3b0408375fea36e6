//! Checks the warnings emitted on recoverable problems.
//!
//! Kept in its own test binary: `traced_test` installs a global subscriber
//! that must not race with the one from `setup_test_logging`.

use folder_metadata::config::{settings, AppConfig};
use folder_metadata::core::{SelectedFile, TreeBuilder};
use tracing_test::traced_test;

#[traced_test]
#[test]
fn corrupt_config_is_reported_and_replaced_by_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(&path, r#"{"request_timeout_secs": "soon"}"#).unwrap();

    let config = settings::load_config(Some(&path)).unwrap();

    assert_eq!(config, AppConfig::default());
    assert!(logs_contain("Falling back to default config"));
}

#[traced_test]
#[test]
fn entries_without_a_name_are_skipped_with_a_warning() {
    let tree = TreeBuilder::build_tree(&[
        SelectedFile {
            relative_path: "//".to_string(),
            size: 1,
        },
        SelectedFile {
            relative_path: "docs/a.txt".to_string(),
            size: 2,
        },
    ]);

    assert_eq!(tree.file_count(), 1);
    assert!(logs_contain("Skipping entry without a usable path segment"));
}
