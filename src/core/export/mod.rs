//! Turns metadata into downloadable artifacts: JSON, PDF and XLSX.
//!
//! Every exporter builds the complete artifact in memory before returning it,
//! so a failure never leaves a partial file behind.

pub mod excel;
pub mod json;
pub mod layout;
pub mod pdf;
pub mod text_metrics;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::{CoreError, Metadata, Result};

pub use excel::export_to_excel;
pub use json::export_to_json;
pub use pdf::export_to_pdf;

/// Title used for filenames when the metadata carries none.
pub const DEFAULT_FILENAME_TITLE: &str = "folder_metadata";

/// A finished export, ready to be written to disk.
#[derive(Debug, Clone)]
pub struct Artifact {
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl Artifact {
    fn new(filename: String, bytes: Vec<u8>) -> Self {
        let content_type = mime_guess::from_path(&filename)
            .first_or_octet_stream()
            .to_string();
        Self {
            filename,
            content_type,
            bytes,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Json,
    Pdf,
    Xlsx,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 3] = [ExportFormat::Json, ExportFormat::Pdf, ExportFormat::Xlsx];

    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Pdf => "pdf",
            ExportFormat::Xlsx => "xlsx",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "pdf" => Ok(ExportFormat::Pdf),
            "xlsx" | "excel" => Ok(ExportFormat::Xlsx),
            other => Err(format!(
                "Unknown export format '{other}'. Use one of: json, pdf, xlsx"
            )),
        }
    }
}

/// Exports `metadata` in the requested format.
pub fn export(
    format: ExportFormat,
    metadata: Option<&Metadata>,
    now: DateTime<Local>,
) -> Result<Artifact> {
    match format {
        ExportFormat::Json => export_to_json(metadata),
        ExportFormat::Pdf => export_to_pdf(metadata, now),
        ExportFormat::Xlsx => export_to_excel(metadata),
    }
}

/// Rejects a missing metadata value.
fn require(metadata: Option<&Metadata>) -> Result<&Metadata> {
    metadata.ok_or_else(|| CoreError::InvalidInput("No metadata to export".to_string()))
}

/// Replaces every character outside `[A-Za-z0-9]` with `_`.
///
/// A missing or empty title falls back to `folder_metadata`.
pub fn sanitize_title(title: Option<&str>) -> String {
    title
        .filter(|t| !t.is_empty())
        .unwrap_or(DEFAULT_FILENAME_TITLE)
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

/// `<Sanitized_Title>.json`, case preserved.
pub fn json_filename(title: Option<&str>) -> String {
    format!("{}.json", sanitize_title(title))
}

/// `folder_analysis_<sanitized_lowercase_title>_<YYYY-MM-DD>.pdf`.
pub fn pdf_filename(title: Option<&str>, now: DateTime<Local>) -> String {
    format!(
        "folder_analysis_{}_{}.pdf",
        sanitize_title(title).to_lowercase(),
        now.format("%Y-%m-%d")
    )
}

/// `<Sanitized_Title>.xlsx`, case preserved.
pub fn excel_filename(title: Option<&str>) -> String {
    format!("{}.xlsx", sanitize_title(title))
}
