use crate::domain::{config::FileConfig, error::{McuxeqError, McuxeqResult}};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Configuration file locator and loader
pub struct ConfigManager {
    config_path: Option<PathBuf>,
    explicit: bool,
}

impl ConfigManager {
    /// Use the per-user configuration file, if a home directory exists
    pub fn new() -> Self {
        Self {
            config_path: Self::get_global_config_path(),
            explicit: false,
        }
    }

    /// Use a file named on the command line; it must exist
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: Some(path.into()),
            explicit: true,
        }
    }

    /// Load configuration, falling back to empty settings when the
    /// per-user file does not exist
    pub fn load_config(&self) -> McuxeqResult<FileConfig> {
        match &self.config_path {
            Some(path) if self.explicit || path.exists() => self.load_config_from_path(path),
            Some(path) => {
                debug!("No configuration file at {}", path.display());
                Ok(FileConfig::default())
            }
            None => Ok(FileConfig::default()),
        }
    }

    /// Load configuration from specific path
    pub fn load_config_from_path(&self, path: &Path) -> McuxeqResult<FileConfig> {
        let content = fs::read_to_string(path).map_err(|e| McuxeqError::Config {
            message: format!("Failed to read config file {}: {}", path.display(), e),
        })?;

        let config = toml::from_str(&content).map_err(|e| McuxeqError::Config {
            message: format!("Failed to parse config file {}: {}", path.display(), e),
        })?;
        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Get global configuration path
    fn get_global_config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".config").join("mcuxeq").join("config.toml"))
    }

    /// The file this manager reads, if any
    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}
