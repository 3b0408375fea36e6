//! Writes finished artifacts to disk.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use super::{Artifact, CoreError, Result};

pub struct FileHandler;

impl FileHandler {
    /// Saves `artifact` into `output_dir` under its own filename.
    ///
    /// The bytes go to a temporary file in the same directory, which is then
    /// renamed into place. On failure the temporary file is removed, so the
    /// target either holds the complete artifact or is left untouched.
    pub fn save_artifact(artifact: &Artifact, output_dir: &Path) -> Result<PathBuf> {
        fs::create_dir_all(output_dir).map_err(|e| CoreError::Io(e, output_dir.to_path_buf()))?;

        let target = output_dir.join(&artifact.filename);
        let mut temp = tempfile::Builder::new()
            .prefix(".folder-metadata-")
            .suffix(".part")
            .tempfile_in(output_dir)
            .map_err(|e| CoreError::Io(e, output_dir.to_path_buf()))?;

        temp.write_all(&artifact.bytes)
            .and_then(|_| temp.as_file().sync_all())
            .map_err(|e| CoreError::Io(e, temp.path().to_path_buf()))?;

        temp.persist(&target)
            .map_err(|e| CoreError::Io(e.error, target.clone()))?;

        tracing::info!(
            "Saved {} ({}, {} bytes)",
            target.display(),
            artifact.content_type,
            artifact.bytes.len()
        );
        Ok(target)
    }
}
