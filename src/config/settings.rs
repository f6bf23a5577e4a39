use anyhow::{Context, Result};
use directories::ProjectDirs;
use std::fs;
use std::path::{Path, PathBuf};

use super::AppConfig;

const APP_NAME: &str = "StructureWatcher";
const CONFIG_FILE: &str = "config.json";

/// Returns the platform-specific configuration directory for the application.
pub fn get_config_directory() -> Option<PathBuf> {
    ProjectDirs::from("com", "structurewatcher", APP_NAME)
        .map(|proj_dirs| proj_dirs.config_dir().to_path_buf())
}

/// Returns the full path to the configuration file.
pub fn get_config_file_path() -> Option<PathBuf> {
    get_config_directory().map(|dir| dir.join(CONFIG_FILE))
}

fn resolve_path(path: Option<&Path>) -> Result<PathBuf> {
    match path {
        Some(path) => Ok(path.to_path_buf()),
        None => get_config_file_path()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory")),
    }
}

/// Loads the configuration from `path`, or from the default location.
///
/// A missing file yields the default configuration. If the file is corrupted
/// or cannot be parsed, a warning is logged and the defaults are used instead
/// of failing.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig> {
    let config_path = resolve_path(path)?;

    if !config_path.exists() {
        tracing::info!(
            "Config file not found at {:?}, using default settings",
            config_path
        );
        return Ok(AppConfig::default());
    }

    let config_content = fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read config file {:?}", config_path))?;

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

/// Saves the configuration to `path`, or to the default location.
pub fn save_config(config: &AppConfig, path: Option<&Path>) -> Result<PathBuf> {
    let config_path = resolve_path(path)?;

    if let Some(config_dir) = config_path.parent() {
        if !config_dir.as_os_str().is_empty() && !config_dir.exists() {
            fs::create_dir_all(config_dir)
                .with_context(|| format!("Failed to create config directory {:?}", config_dir))?;
            tracing::info!("Created config directory: {:?}", config_dir);
        }
    }

    let config_json = serde_json::to_string_pretty(config)?;
    fs::write(&config_path, config_json)
        .with_context(|| format!("Failed to write config file {:?}", config_path))?;
    tracing::info!("Saved config to {:?}", config_path);

    Ok(config_path)
}

// Platform-specific configuration paths for reference:
// macOS:   ~/Library/Application Support/com.structurewatcher.StructureWatcher/
// Linux:   ~/.config/structurewatcher/
// Windows: %APPDATA%/structurewatcher/StructureWatcher/config/
