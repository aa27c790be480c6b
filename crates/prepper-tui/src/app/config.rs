//! Client configuration persistence
//!
//! Saves and loads where the session store lives, the landing route and how
//! often the countdown is refreshed.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use prepper_core::{FileStore, LANDING_ROUTE};

/// Configuration file name
const CONFIG_FILE_NAME: &str = "config.json";

/// Log file name, next to the config file
const LOG_FILE_NAME: &str = "prepper-tui.log";

/// Configuration directory under ~/.config
const CONFIG_DIR_NAME: &str = "ml-prepper";

/// Client configuration that persists across runs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Key-value store file (defaults to the user data directory)
    #[serde(default)]
    pub store_path: Option<PathBuf>,

    /// Route shown after sign-out
    #[serde(default = "default_landing_route")]
    pub landing_route: String,

    /// How often the status bar countdown is re-read
    #[serde(default = "default_countdown_refresh_secs")]
    pub countdown_refresh_secs: u64,

    /// `tracing` filter directive
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

fn default_landing_route() -> String {
    LANDING_ROUTE.to_string()
}

fn default_countdown_refresh_secs() -> u64 {
    30
}

fn default_log_filter() -> String {
    "prepper=info".to_string()
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            store_path: None,
            landing_route: default_landing_route(),
            countdown_refresh_secs: default_countdown_refresh_secs(),
            log_filter: default_log_filter(),
        }
    }
}

impl ClientConfig {
    /// Get the configuration directory path
    pub fn config_dir() -> Option<PathBuf> {
        // Try XDG_CONFIG_HOME first, then fall back to ~/.config
        if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
            return Some(PathBuf::from(xdg_config).join(CONFIG_DIR_NAME));
        }

        dirs::config_dir().map(|p| p.join(CONFIG_DIR_NAME))
    }

    /// Get the full config file path
    pub fn config_file_path() -> Option<PathBuf> {
        Self::config_dir().map(|d| d.join(CONFIG_FILE_NAME))
    }

    /// Log file path
    pub fn log_file_path() -> Option<PathBuf> {
        Self::config_dir().map(|d| d.join(LOG_FILE_NAME))
    }

    /// Store file, falling back to the default data location
    pub fn resolved_store_path(&self) -> PathBuf {
        self.store_path
            .clone()
            .unwrap_or_else(FileStore::default_path)
    }

    /// Load configuration from the default location
    ///
    /// A missing file (or no config directory) yields the defaults.
    pub fn load() -> Result<Self, ConfigError> {
        match Self::config_file_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load configuration from `path`
    ///
    /// Errors are returned rather than logged because the log subscriber is
    /// configured from the result.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path).map_err(|e| ConfigError::Io(e.to_string()))?;
        serde_json::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Save configuration to the default location
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = Self::config_file_path().ok_or(ConfigError::NoConfigDir)?;
        self.save_to(&path)
    }

    /// Save configuration to `path`
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(dir) = path.parent() {
            if !dir.exists() {
                fs::create_dir_all(dir).map_err(|e| ConfigError::Io(e.to_string()))?;
            }
        }

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::Serialize(e.to_string()))?;

        fs::write(path, contents).map_err(|e| ConfigError::Io(e.to_string()))?;

        tracing::debug!("Saved config to {:?}", path);
        Ok(())
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("IO error: {0}")]
    Io(String),

    #[error("Serialization error: {0}")]
    Serialize(String),

    #[error("Invalid config file: {0}")]
    Parse(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert!(config.store_path.is_none());
        assert_eq!(config.landing_route, "/");
        assert_eq!(config.countdown_refresh_secs, 30);
        assert_eq!(config.resolved_store_path(), FileStore::default_path());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let parsed: ClientConfig = serde_json::from_str(r#"{"landing_route": "/sign-in"}"#).unwrap();
        assert_eq!(parsed.landing_route, "/sign-in");
        assert_eq!(parsed.countdown_refresh_secs, 30);
        assert_eq!(parsed.log_filter, "prepper=info");
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("cfg").join(CONFIG_FILE_NAME);

        let config = ClientConfig {
            store_path: Some(temp_dir.path().join("store.json")),
            landing_route: "/welcome".to_string(),
            countdown_refresh_secs: 5,
            log_filter: "prepper=debug".to_string(),
        };
        config.save_to(&path).unwrap();

        assert_eq!(ClientConfig::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_missing_file_is_default() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join(CONFIG_FILE_NAME);
        assert_eq!(ClientConfig::load_from(&path).unwrap(), ClientConfig::default());
    }

    #[test]
    fn test_corrupt_file_is_reported() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "{ nope").unwrap();

        assert!(matches!(
            ClientConfig::load_from(&path),
            Err(ConfigError::Parse(_))
        ));
    }
}
