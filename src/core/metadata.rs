//! The metadata returned by the generation service.
//!
//! Every field is optional on the wire. Defaults are applied only through the
//! `*_or` accessors at the presentation and export boundary; the stored value
//! is never normalized.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Folder-level metadata, optionally with one record per file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub files: Option<Vec<FileMetadata>>,
    /// Any additional fields the service returned, kept verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Metadata describing a single file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FileMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Treats `None` and the empty string alike.
fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

impl Metadata {
    pub fn title_or<'a>(&'a self, default: &'a str) -> &'a str {
        non_empty(&self.title).unwrap_or(default)
    }

    pub fn description_or<'a>(&'a self, default: &'a str) -> &'a str {
        non_empty(&self.description).unwrap_or(default)
    }

    /// Tags as a slice; absent tags are an empty slice.
    pub fn tags(&self) -> &[String] {
        self.tags.as_deref().unwrap_or_default()
    }

    /// Per-file records as a slice; absent files are an empty slice.
    pub fn files(&self) -> &[FileMetadata] {
        self.files.as_deref().unwrap_or_default()
    }
}

impl FileMetadata {
    pub fn filename_or<'a>(&'a self, default: &'a str) -> &'a str {
        non_empty(&self.filename).unwrap_or(default)
    }

    pub fn title_or<'a>(&'a self, default: &'a str) -> &'a str {
        non_empty(&self.title).unwrap_or(default)
    }

    pub fn description_or<'a>(&'a self, default: &'a str) -> &'a str {
        non_empty(&self.description).unwrap_or(default)
    }

    pub fn tags(&self) -> &[String] {
        self.tags.as_deref().unwrap_or_default()
    }
}

/// Joins tags with `", "`, or returns `placeholder` when there are none.
pub fn join_tags(tags: &[String], placeholder: &str) -> String {
    if tags.is_empty() {
        placeholder.to_string()
    } else {
        tags.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_fields_deserialize_as_none() {
        let metadata: Metadata = serde_json::from_str("{}").unwrap();
        assert_eq!(metadata, Metadata::default());
        assert_eq!(metadata.title_or("Untitled Project"), "Untitled Project");
        assert!(metadata.tags().is_empty());
        assert!(metadata.files().is_empty());
    }

    #[test]
    fn unknown_fields_survive_a_round_trip() {
        let raw = r#"{"title":"Docs","confidence":0.9,"files":[{"filename":"a.txt","lang":"en"}]}"#;
        let metadata: Metadata = serde_json::from_str(raw).unwrap();
        assert_eq!(metadata.extra.get("confidence"), Some(&Value::from(0.9)));
        assert_eq!(
            metadata.files()[0].extra.get("lang"),
            Some(&Value::from("en"))
        );

        let back: Value = serde_json::to_value(&metadata).unwrap();
        assert_eq!(back, serde_json::from_str::<Value>(raw).unwrap());
    }

    #[test]
    fn empty_strings_fall_back_to_defaults() {
        let metadata = Metadata {
            title: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(metadata.title_or("Unknown Folder"), "Unknown Folder");
    }

    #[test]
    fn join_tags_uses_placeholder_when_empty() {
        assert_eq!(join_tags(&[], "No tags"), "No tags");
        assert_eq!(
            join_tags(&["x".to_string(), "y".to_string()], "No tags"),
            "x, y"
        );
    }
}
