//! Defines the central, mutable state of the application.

use crate::config::{self, AppConfig};
use crate::core::{Metadata, SelectedFile};
use std::path::PathBuf;
use tokio::task::JoinHandle;

/// Holds the complete, mutable state of the application.
///
/// This struct is wrapped in an `Arc<Mutex<...>>` so the command handlers and
/// the analysis task can share it. The lock is never held across an `.await`.
pub struct AppState {
    /// The application's configuration settings.
    pub config: AppConfig,
    /// Where `config` is persisted; `None` uses the default location.
    pub config_path: Option<PathBuf>,
    /// The absolute path of the currently selected folder.
    pub current_path: Option<PathBuf>,
    /// Name of the selected folder, the first segment of every relative path.
    pub folder_name: String,
    /// The files of the current selection, in scan order.
    pub selected_files: Vec<SelectedFile>,
    /// The most recent successful analysis result.
    pub current_metadata: Option<Metadata>,
    /// `true` while a metadata request is in flight.
    pub is_generating: bool,
    /// A handle to the running analysis task.
    pub analysis_task: Option<JoinHandle<()>>,
    /// Short human-readable description of what happened last.
    pub status_message: String,
}

impl Default for AppState {
    /// Creates a default `AppState` instance, loading the configuration from disk.
    fn default() -> Self {
        Self::new(AppConfig::load().unwrap_or_default())
    }
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            config_path: None,
            current_path: None,
            folder_name: String::new(),
            selected_files: Vec::new(),
            current_metadata: None,
            is_generating: false,
            analysis_task: None,
            status_message: "Ready.".to_string(),
        }
    }

    /// Total size in bytes of the selected files.
    pub fn selected_size(&self) -> u64 {
        self.selected_files.iter().map(|f| f.size).sum()
    }

    /// Replaces the current selection. Metadata from an earlier analysis is
    /// kept until a new analysis succeeds.
    pub fn replace_selection(&mut self, path: PathBuf, folder_name: String, files: Vec<SelectedFile>) {
        self.current_path = Some(path);
        self.folder_name = folder_name;
        self.selected_files = files;
    }

    /// Writes the configuration back to disk. Failures are logged, not raised.
    pub fn persist_config(&self) {
        if let Err(e) = config::settings::save_config(&self.config, self.config_path.as_deref()) {
            tracing::warn!("Failed to save config: {:#}", e);
        }
    }

    /// Marks the in-flight analysis as finished, whatever its outcome.
    pub fn finish_generation(&mut self, status: impl Into<String>) {
        self.is_generating = false;
        self.analysis_task = None;
        self.status_message = status.into();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selection_replacement_keeps_previous_metadata() {
        let mut state = AppState::new(AppConfig::default());
        state.current_metadata = Some(Metadata {
            title: Some("Old".to_string()),
            ..Default::default()
        });

        state.replace_selection(
            PathBuf::from("/data/photos"),
            "photos".to_string(),
            vec![
                SelectedFile {
                    relative_path: "photos/a.jpg".to_string(),
                    size: 10,
                },
                SelectedFile {
                    relative_path: "photos/b.jpg".to_string(),
                    size: 32,
                },
            ],
        );

        assert_eq!(state.selected_size(), 42);
        assert_eq!(state.folder_name, "photos");
        assert!(state.current_metadata.is_some());
    }

    #[test]
    fn persist_config_writes_to_configured_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let mut state = AppState::new(AppConfig::default());
        state.config_path = Some(path.clone());
        state.config.last_directory = Some(PathBuf::from("/data/photos"));

        state.persist_config();

        let saved = config::settings::load_config(Some(&path)).unwrap();
        assert_eq!(saved.last_directory, Some(PathBuf::from("/data/photos")));
    }

    #[test]
    fn finishing_generation_clears_busy_state() {
        let mut state = AppState::new(AppConfig::default());
        state.is_generating = true;
        state.finish_generation("Done");
        assert!(!state.is_generating);
        assert!(state.analysis_task.is_none());
        assert_eq!(state.status_message, "Done");
    }
}
