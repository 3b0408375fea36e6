use super::{json_filename, require, Artifact};
use crate::core::{CoreError, Metadata, Result};

/// Serializes the full metadata value as JSON indented by two spaces.
pub fn export_to_json(metadata: Option<&Metadata>) -> Result<Artifact> {
    let metadata = require(metadata)?;
    let text = serde_json::to_string_pretty(metadata)
        .map_err(|e| CoreError::Render(format!("JSON serialization failed: {e}")))?;
    Ok(Artifact::new(
        json_filename(metadata.title.as_deref()),
        text.into_bytes(),
    ))
}
