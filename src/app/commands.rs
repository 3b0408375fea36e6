//! Contains the command handlers a front end calls to drive the application.
//!
//! Handlers never return errors to the caller. Every outcome, good or bad, is
//! reported as a `UserEvent` through the given proxy, and busy flags are reset
//! on every path.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use super::events::UserEvent;
use super::helpers::with_state_and_notify;
use super::proxy::EventProxy;
use super::state::AppState;
use super::view_model::{generate_ui_state, MetadataView};
use crate::core::export::export;
use crate::core::{
    CoreError, DirectoryScanner, ExportFormat, FileHandler, Metadata, MetadataApi, TreeBuilder,
};

pub const NO_SELECTION_MESSAGE: &str = "Please select a folder first.";
pub const ALREADY_RUNNING_MESSAGE: &str = "An analysis is already running. Please wait for it to finish.";
pub const NO_METADATA_MESSAGE: &str = "No metadata to export. Please generate metadata first.";

/// Scans `path` and makes its files the current selection.
///
/// The scan runs on the blocking pool. On success the selection is replaced
/// and `FolderSelected` is emitted; on failure the previous selection stays.
pub async fn select_folder<P: EventProxy>(path: PathBuf, proxy: P, state: Arc<Mutex<AppState>>) {
    let ignore_patterns = {
        let state_guard = state
            .lock()
            .expect("Mutex was poisoned. This should not happen.");
        state_guard.config.ignore_patterns.clone()
    };

    let scan_path = path.clone();
    let scan_result = tokio::task::spawn_blocking(move || {
        DirectoryScanner::new(ignore_patterns).scan(&scan_path)
    })
    .await
    .map_err(CoreError::from)
    .and_then(|result| result);

    let scan = match scan_result {
        Ok(scan) => scan,
        Err(e) => {
            tracing::error!("Folder scan failed for {}: {}", path.display(), e);
            with_state_and_notify(&state, &proxy, |s| {
                s.status_message = format!("Could not read folder: {e}");
            });
            proxy.send_event(UserEvent::ShowError(e.to_string()));
            return;
        }
    };

    tracing::info!(
        "Selected {} with {} file(s), {} ignored, {} skipped",
        scan.folder_name,
        scan.files.len(),
        scan.ignored,
        scan.skipped
    );

    let folder_name = scan.folder_name.clone();
    let file_count = scan.files.len();
    with_state_and_notify(&state, &proxy, |s| {
        s.replace_selection(path.clone(), scan.folder_name, scan.files);
        s.status_message = format!("Selected: {folder_name} ({file_count} files)");
        s.config.last_directory = Some(path.clone());
        s.persist_config();
    });

    proxy.send_event(UserEvent::FolderSelected {
        folder_name,
        file_count,
    });
}

/// Starts a metadata request for the current selection.
///
/// Returns `false` when the request was rejected because nothing is selected
/// or another request is in flight. The outcome of an accepted request arrives
/// as `AnalysisCompleted` or `ShowError`.
pub fn start_analysis<P: EventProxy>(
    api: Arc<dyn MetadataApi>,
    proxy: P,
    state: Arc<Mutex<AppState>>,
) -> bool {
    let mut state_guard = state
        .lock()
        .expect("Mutex was poisoned. This should not happen.");

    if state_guard.selected_files.is_empty() {
        drop(state_guard);
        proxy.send_event(UserEvent::ShowError(NO_SELECTION_MESSAGE.to_string()));
        return false;
    }
    if state_guard.is_generating {
        tracing::warn!("Ignoring analysis request while another one is in flight");
        drop(state_guard);
        proxy.send_event(UserEvent::ShowError(ALREADY_RUNNING_MESSAGE.to_string()));
        return false;
    }

    let tree = TreeBuilder::build_tree(&state_guard.selected_files);
    state_guard.is_generating = true;
    state_guard.status_message = "Analyzing folder structure... Please wait.".to_string();

    // Both events go out before the task exists, so they always precede its outcome.
    proxy.send_event(UserEvent::StateUpdate(Box::new(generate_ui_state(&state_guard))));
    proxy.send_event(UserEvent::AnalysisStarted);

    let task_proxy = proxy.clone();
    let task_state = state.clone();
    let handle = tokio::spawn(async move {
        tracing::info!("Requesting metadata for {} file(s)", tree.file_count());
        let result = api.generate_metadata(&tree).await;
        finish_analysis(result, &task_proxy, &task_state);
    });

    // The task cannot finish before the handle is stored: it needs this lock.
    state_guard.analysis_task = Some(handle);
    true
}

fn finish_analysis<P: EventProxy>(
    result: crate::core::Result<Metadata>,
    proxy: &P,
    state: &Arc<Mutex<AppState>>,
) {
    match result {
        Ok(metadata) => {
            let view = MetadataView::from(&metadata);
            tracing::info!(
                "Analysis completed: \"{}\" with {} file record(s)",
                view.title,
                view.files.len()
            );
            with_state_and_notify(state, proxy, |s| {
                s.current_metadata = Some(metadata);
                s.finish_generation("Analysis completed successfully!");
            });
            proxy.send_event(UserEvent::AnalysisCompleted(Box::new(view)));
        }
        Err(e) => {
            tracing::error!("Analysis failed: {}", e);
            with_state_and_notify(state, proxy, |s| {
                s.finish_generation(format!("Error: {e}"));
            });
            proxy.send_event(UserEvent::ShowError(e.to_string()));
        }
    }
}

/// Exports the current metadata in `format` and writes it into `output_dir`.
///
/// Returns the written path so callers that need it (for example to open
/// the file) do not have to wait for the event.
pub fn export_metadata<P: EventProxy>(
    format: ExportFormat,
    output_dir: &Path,
    proxy: P,
    state: Arc<Mutex<AppState>>,
) -> Option<PathBuf> {
    let metadata = {
        let state_guard = state
            .lock()
            .expect("Mutex was poisoned. This should not happen.");
        state_guard.current_metadata.clone()
    };

    let Some(metadata) = metadata else {
        proxy.send_event(UserEvent::ShowError(NO_METADATA_MESSAGE.to_string()));
        return None;
    };

    let outcome = export(format, Some(&metadata), chrono::Local::now())
        .and_then(|artifact| FileHandler::save_artifact(&artifact, output_dir));

    match outcome {
        Ok(path) => {
            with_state_and_notify(&state, &proxy, |s| {
                s.status_message = format!("Exported {} to {}", format, path.display());
            });
            proxy.send_event(UserEvent::ExportCompleted {
                format,
                path: path.clone(),
            });
            Some(path)
        }
        Err(e) => {
            tracing::error!("{} export failed: {}", format, e);
            proxy.send_event(UserEvent::ShowError(format!(
                "Failed to export {format}: {e}"
            )));
            None
        }
    }
}

/// Loads a previously exported metadata JSON file as the current result.
pub fn load_metadata<P: EventProxy>(path: &Path, proxy: P, state: Arc<Mutex<AppState>>) {
    let loaded = std::fs::read_to_string(path)
        .map_err(|e| CoreError::Io(e, path.to_path_buf()))
        .and_then(|content| {
            serde_json::from_str::<Metadata>(&content).map_err(|e| {
                CoreError::InvalidInput(format!("{} is not metadata JSON: {}", path.display(), e))
            })
        });

    match loaded {
        Ok(metadata) => {
            tracing::info!("Loaded metadata from {}", path.display());
            let view = MetadataView::from(&metadata);
            with_state_and_notify(&state, &proxy, |s| {
                s.current_metadata = Some(metadata);
                s.status_message = format!("Loaded metadata from {}", path.display());
            });
            proxy.send_event(UserEvent::AnalysisCompleted(Box::new(view)));
        }
        Err(e) => {
            tracing::error!("Failed to load metadata: {}", e);
            proxy.send_event(UserEvent::ShowError(e.to_string()));
        }
    }
}
