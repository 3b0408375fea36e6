//! Defines the events the controller sends to whatever front end drives it.

use std::path::PathBuf;

use super::view_model::{MetadataView, UiState};
use crate::core::ExportFormat;

/// Events sent from the controller to the front end.
#[derive(Debug)]
pub enum UserEvent {
    /// A complete state update to re-render the UI.
    StateUpdate(Box<UiState>),
    /// A folder was scanned and is now the current selection.
    FolderSelected { folder_name: String, file_count: usize },
    /// The metadata request has been sent.
    AnalysisStarted,
    /// The service answered with metadata, already shaped for display.
    AnalysisCompleted(Box<MetadataView>),
    /// An artifact was written to disk.
    ExportCompleted { format: ExportFormat, path: PathBuf },
    /// An error message to be displayed to the user.
    ShowError(String),
}
