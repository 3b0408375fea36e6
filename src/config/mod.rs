pub mod settings;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::PathBuf;
use std::time::Duration;

use crate::core::ExportFormat;

/// Environment variable that overrides `api_base_url`.
pub const API_URL_ENV: &str = "FOLDER_METADATA_API_URL";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// Base URL of the metadata service; `/api/generate` is appended.
    pub api_base_url: String,
    pub request_timeout_secs: u64,
    pub ignore_patterns: HashSet<String>,
    pub last_directory: Option<PathBuf>,
    pub output_directory: Option<PathBuf>,
    pub default_formats: Vec<ExportFormat>,
    pub open_after_export: bool,
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        settings::load_config(None)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    /// Where exports are written when no directory is given explicitly.
    pub fn resolved_output_directory(&self) -> PathBuf {
        self.output_directory
            .clone()
            .or_else(dirs::download_dir)
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Applies `FOLDER_METADATA_API_URL` if it is set and non-empty.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var(API_URL_ENV) {
            if !url.trim().is_empty() {
                tracing::debug!("Using API base URL from {}", API_URL_ENV);
                self.api_base_url = url.trim().to_string();
            }
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        let ignore_patterns = [
            ".git",
            "node_modules",
            "__pycache__",
            ".DS_Store",
            "Thumbs.db",
            "target",
            "venv",
        ]
        .iter()
        .map(|p| p.to_string())
        .collect();

        Self {
            api_base_url: "http://127.0.0.1:5000".to_string(),
            request_timeout_secs: 60,
            ignore_patterns,
            last_directory: None,
            output_directory: None,
            default_formats: vec![ExportFormat::Json],
            open_after_export: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn partial_config_fills_in_defaults() {
        let config: AppConfig =
            serde_json::from_str(r#"{"api_base_url":"http://example.test"}"#).unwrap();
        assert_eq!(config.api_base_url, "http://example.test");
        assert_eq!(config.request_timeout_secs, 60);
        assert!(config.ignore_patterns.contains(".git"));
        assert_eq!(config.default_formats, vec![ExportFormat::Json]);
    }

    #[test]
    fn zero_timeout_is_clamped() {
        let config = AppConfig {
            request_timeout_secs: 0,
            ..Default::default()
        };
        assert_eq!(config.request_timeout(), Duration::from_secs(1));
    }

    #[test]
    fn explicit_output_directory_wins() {
        let config = AppConfig {
            output_directory: Some(PathBuf::from("/tmp/exports")),
            ..Default::default()
        };
        assert_eq!(
            config.resolved_output_directory(),
            PathBuf::from("/tmp/exports")
        );
    }

    #[test]
    #[serial]
    fn env_override_replaces_api_url() {
        std::env::set_var(API_URL_ENV, " http://override.test ");
        let mut config = AppConfig::default();
        config.apply_env_overrides();
        std::env::remove_var(API_URL_ENV);
        assert_eq!(config.api_base_url, "http://override.test");
    }

    #[test]
    #[serial]
    fn blank_env_override_is_ignored() {
        std::env::set_var(API_URL_ENV, "  ");
        let mut config = AppConfig::default();
        config.apply_env_overrides();
        std::env::remove_var(API_URL_ENV);
        assert_eq!(config.api_base_url, AppConfig::default().api_base_url);
    }
}
