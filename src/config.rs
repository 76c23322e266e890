//! Configuration for the windowed map.

use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// One hour, the window used by the worked example.
pub const DEFAULT_WINDOW_SIZE_MS: i64 = 60 * 60 * 1000;

/// Main configuration for a windowed map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Width of the trailing visibility window, in milliseconds
    pub window_size_ms: i64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            window_size_ms: DEFAULT_WINDOW_SIZE_MS,
        }
    }
}

impl Config {
    /// Create a configuration with the given window width.
    pub fn new(window_size_ms: i64) -> Self {
        Self { window_size_ms }
    }

    /// Load configuration from the default location.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from `path`, falling back to defaults if it does not exist.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to the default location.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::config_path())
    }

    /// Save configuration to `path`, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        self.validate()?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self).map_err(ConfigError::Serialize)?;
        std::fs::write(path, content)?;

        Ok(())
    }

    /// Get the path to the configuration file.
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("windowed-map")
            .join("config.json")
    }

    /// Reject a window that is zero or negative.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window_size_ms <= 0 {
            return Err(ConfigError::InvalidWindow(self.window_size_ms));
        }
        Ok(())
    }

    /// The window as a duration.
    pub fn window(&self) -> Duration {
        Duration::milliseconds(self.window_size_ms)
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(serde_json::Error),
    #[error("Serialize error: {0}")]
    Serialize(serde_json::Error),
    #[error("window size must be positive, got {0} ms")]
    InvalidWindow(i64),
}
