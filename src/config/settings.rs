use anyhow::{Context, Result};
use directories::ProjectDirs;
use std::fs;
use std::path::{Path, PathBuf};

use super::AppConfig;

const APP_NAME: &str = "FolderMetadata";
const CONFIG_FILE: &str = "config.json";

/// Environment variable pointing at an alternative config file.
pub const CONFIG_PATH_ENV: &str = "FOLDER_METADATA_CONFIG";

/// Returns the platform-specific configuration directory for the application.
pub fn get_config_directory() -> Option<PathBuf> {
    ProjectDirs::from("com", "foldermetadata", APP_NAME)
        .map(|proj_dirs| proj_dirs.config_dir().to_path_buf())
}

/// Resolves the config file: explicit override, then `FOLDER_METADATA_CONFIG`,
/// then the platform default.
pub fn get_config_file_path(override_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = override_path {
        return Some(path.to_path_buf());
    }
    if let Some(path) = std::env::var_os(CONFIG_PATH_ENV).filter(|p| !p.is_empty()) {
        return Some(PathBuf::from(path));
    }
    get_config_directory().map(|dir| dir.join(CONFIG_FILE))
}

/// Loads the application configuration.
///
/// A missing file is created with defaults. A file that cannot be parsed is
/// reported with a warning and replaced by defaults in memory; it is left
/// untouched on disk so the user can repair it.
pub fn load_config(override_path: Option<&Path>) -> Result<AppConfig> {
    let config_path = get_config_file_path(override_path)
        .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

    if !config_path.exists() {
        tracing::info!(
            "Config file not found, creating default config at {:?}",
            config_path
        );
        let default_config = AppConfig::default();
        save_config(&default_config, Some(&config_path))?;
        return Ok(default_config);
    }

    let config_content = fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read config file {}", config_path.display()))?;

    match serde_json::from_str::<AppConfig>(&config_content) {
        Ok(config) => {
            tracing::info!("Loaded config from {:?}", config_path);
            Ok(config)
        }
        Err(e) => {
            tracing::warn!(
                "Failed to parse config file at {:?}: {}. Falling back to default config.",
                config_path,
                e
            );
            Ok(AppConfig::default())
        }
    }
}

/// Saves the configuration as pretty JSON, creating parent directories.
pub fn save_config(config: &AppConfig, override_path: Option<&Path>) -> Result<()> {
    let config_path = get_config_file_path(override_path)
        .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

    if let Some(config_dir) = config_path.parent().filter(|d| !d.as_os_str().is_empty()) {
        if !config_dir.exists() {
            fs::create_dir_all(config_dir).with_context(|| {
                format!("Failed to create config directory {}", config_dir.display())
            })?;
            tracing::info!("Created config directory: {:?}", config_dir);
        }
    }

    let config_json = serde_json::to_string_pretty(config)?;
    fs::write(&config_path, config_json)
        .with_context(|| format!("Failed to write config file {}", config_path.display()))?;
    tracing::info!("Saved config to {:?}", config_path);

    Ok(())
}

// Platform-specific configuration paths for reference:
// macOS:   ~/Library/Application Support/com.foldermetadata.FolderMetadata/
// Linux:   ~/.config/foldermetadata/
// Windows: %APPDATA%/foldermetadata/FolderMetadata/config/
