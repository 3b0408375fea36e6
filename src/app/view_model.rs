//! Shapes `AppState` and `Metadata` for display.
//!
//! The metadata service may omit any field, so presentation defaults are
//! filled in here and never written back into the stored metadata.

use serde::Serialize;
use std::fmt;

use super::state::AppState;
use crate::core::{FileMetadata, Metadata};

pub const DEFAULT_FOLDER_TITLE: &str = "Folder Analysis";
pub const DEFAULT_FILE_TITLE: &str = "Untitled";

/// A serializable summary of the application state for the front end.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct UiState {
    pub current_path: Option<String>,
    pub folder_name: String,
    pub selected_files_count: usize,
    pub selected_size: u64,
    pub is_generating: bool,
    pub has_metadata: bool,
    pub can_analyze: bool,
    pub status_message: String,
}

/// Creates the complete `UiState` from the current `AppState`.
pub fn generate_ui_state(state: &AppState) -> UiState {
    UiState {
        current_path: state
            .current_path
            .as_ref()
            .map(|p| p.to_string_lossy().to_string()),
        folder_name: state.folder_name.clone(),
        selected_files_count: state.selected_files.len(),
        selected_size: state.selected_size(),
        is_generating: state.is_generating,
        has_metadata: state.current_metadata.is_some(),
        can_analyze: !state.selected_files.is_empty() && !state.is_generating,
        status_message: state.status_message.clone(),
    }
}

/// The analysis result with display defaults applied.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct MetadataView {
    pub title: String,
    pub description: Option<String>,
    pub tags: Vec<String>,
    pub files: Vec<FileView>,
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct FileView {
    pub filename: String,
    pub title: String,
    pub description: String,
    pub tags: Vec<String>,
}

impl From<&Metadata> for MetadataView {
    fn from(metadata: &Metadata) -> Self {
        Self {
            title: metadata.title_or(DEFAULT_FOLDER_TITLE).to_string(),
            description: metadata
                .description
                .clone()
                .filter(|d| !d.is_empty()),
            tags: metadata.tags().to_vec(),
            files: metadata.files().iter().map(FileView::from).collect(),
        }
    }
}

impl From<&FileMetadata> for FileView {
    fn from(file: &FileMetadata) -> Self {
        Self {
            filename: file.filename.clone().unwrap_or_default(),
            title: file.title_or(DEFAULT_FILE_TITLE).to_string(),
            description: file.description.clone().unwrap_or_default(),
            tags: file.tags().to_vec(),
        }
    }
}

/// Plain-text rendering used by the command-line front end.
impl fmt::Display for MetadataView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title)?;
        if let Some(description) = &self.description {
            writeln!(f, "{description}")?;
        }
        if !self.tags.is_empty() {
            writeln!(f, "Tags: {}", self.tags.join(", "))?;
        }
        for file in &self.files {
            writeln!(f)?;
            writeln!(f, "  {} ({})", file.filename, file.title)?;
            if !file.description.is_empty() {
                writeln!(f, "    {}", file.description)?;
            }
            if !file.tags.is_empty() {
                writeln!(f, "    [{}]", file.tags.join("] ["))?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;

    #[test]
    fn view_fills_in_display_defaults() {
        let metadata = Metadata {
            files: Some(vec![FileMetadata {
                filename: Some("notes.md".to_string()),
                ..Default::default()
            }]),
            ..Default::default()
        };
        let view = MetadataView::from(&metadata);
        assert_eq!(view.title, "Folder Analysis");
        assert_eq!(view.description, None);
        assert_eq!(view.files[0].title, "Untitled");
        assert_eq!(view.files[0].description, "");
        assert!(view.files[0].tags.is_empty());
        // Stored metadata is left as received.
        assert!(metadata.title.is_none());
    }

    #[test]
    fn display_lists_files_with_tags() {
        let metadata = Metadata {
            title: Some("Recipes".to_string()),
            tags: Some(vec!["food".to_string()]),
            files: Some(vec![FileMetadata {
                filename: Some("soup.txt".to_string()),
                title: Some("Soup".to_string()),
                description: Some("Tomato soup".to_string()),
                tags: Some(vec!["warm".to_string(), "red".to_string()]),
                ..Default::default()
            }]),
            ..Default::default()
        };
        let text = MetadataView::from(&metadata).to_string();
        insta::assert_snapshot!(text, @r###"
        Recipes
        Tags: food

          soup.txt (Soup)
            Tomato soup
            [warm] [red]
        "###);
    }

    #[test]
    fn ui_state_disables_analysis_without_selection() {
        let state = AppState::new(AppConfig::default());
        let ui = generate_ui_state(&state);
        assert!(!ui.can_analyze);
        assert!(!ui.has_metadata);
        assert_eq!(ui.status_message, "Ready.");
    }
}
