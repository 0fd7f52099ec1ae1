//! Configuration management for gcis.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default data directory name.
const DATA_DIR_NAME: &str = "gcis";

/// Default database file name.
const DATABASE_FILE_NAME: &str = "profile.db";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `GCIS_`, nested keys split on `__`)
/// 2. TOML config file at `~/.config/gcis/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Storage configuration.
    pub storage: StorageConfig,
    /// Directory data sources.
    pub data: DataConfig,
    /// Form export configuration.
    pub export: ExportConfig,
    /// Charter reading configuration.
    pub charter: CharterConfig,
}

/// Storage-related configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path to the profile database.
    /// Defaults to `~/.local/share/gcis/profile.db`
    pub database_path: Option<PathBuf>,
}

/// Where record and project lists are read from.
///
/// Unset paths fall back to the built-in lists.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// JSON array of records.
    pub records_path: Option<PathBuf>,
    /// JSON array of projects.
    pub projects_path: Option<PathBuf>,
}

/// Export-related configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Directory that filed records and registered projects are written to.
    /// Defaults to the current directory.
    pub directory: Option<PathBuf>,
}

/// Charter reading configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CharterConfig {
    /// Seconds the charter must stay open before it counts as read.
    pub read_delay_secs: u64,
}

impl Default for CharterConfig {
    fn default() -> Self {
        Self {
            read_delay_secs: 20,
        }
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed("GCIS_").split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(DATA_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from(".local/share"))
            .join(DATA_DIR_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        if self.charter.read_delay_secs == 0 {
            return Err(Error::ConfigValidation {
                message: "read_delay_secs must be greater than 0".to_string(),
            });
        }

        if let Some(dir) = &self.export.directory {
            if dir.as_os_str().is_empty() {
                return Err(Error::ConfigValidation {
                    message: "export directory cannot be empty".to_string(),
                });
            }
        }

        Ok(())
    }

    /// Get the database path, resolving defaults if not set.
    #[must_use]
    pub fn database_path(&self) -> PathBuf {
        self.storage
            .database_path
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(DATABASE_FILE_NAME))
    }

    /// Get the export directory, resolving defaults if not set.
    #[must_use]
    pub fn export_dir(&self) -> PathBuf {
        self.export
            .directory
            .clone()
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Get the charter read delay as a Duration.
    #[must_use]
    pub fn read_delay(&self) -> Duration {
        Duration::from_secs(self.charter.read_delay_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert!(config.storage.database_path.is_none());
        assert!(config.data.records_path.is_none());
        assert!(config.data.projects_path.is_none());
        assert!(config.export.directory.is_none());
        assert_eq!(config.charter.read_delay_secs, 20);
    }

    #[test]
    fn test_validate_valid_config() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_validate_zero_read_delay() {
        let mut config = Config::default();
        config.charter.read_delay_secs = 0;

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("read_delay_secs"));
    }

    #[test]
    fn test_validate_empty_export_dir() {
        let mut config = Config::default();
        config.export.directory = Some(PathBuf::new());

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("export directory"));
    }

    #[test]
    fn test_database_path_default() {
        let config = Config::default();
        assert!(config.database_path().to_string_lossy().contains("profile.db"));
    }

    #[test]
    fn test_database_path_custom() {
        let mut config = Config::default();
        config.storage.database_path = Some(PathBuf::from("/custom/path/db.sqlite"));

        assert_eq!(
            config.database_path(),
            PathBuf::from("/custom/path/db.sqlite")
        );
    }

    #[test]
    fn test_export_dir_default() {
        assert_eq!(Config::default().export_dir(), PathBuf::from("."));
    }

    #[test]
    fn test_read_delay() {
        assert_eq!(Config::default().read_delay(), Duration::from_secs(20));
    }

    #[test]
    fn test_default_config_path() {
        let path = Config::default_config_path();
        assert!(path.to_string_lossy().contains("gcis"));
        assert!(path.to_string_lossy().contains("config.toml"));
    }

    #[test]
    fn test_load_nonexistent_config() {
        let config = Config::load_from(Some(PathBuf::from("/nonexistent/config.toml"))).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_from_toml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[charter]\nread_delay_secs = 5\n\n[export]\ndirectory = \"/tmp/exports\"\n",
        )
        .unwrap();

        let config = Config::load_from(Some(path)).unwrap();
        assert_eq!(config.charter.read_delay_secs, 5);
        assert_eq!(config.export_dir(), PathBuf::from("/tmp/exports"));
    }

    #[test]
    fn test_load_rejects_invalid_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[charter]\nread_delay_secs = 0\n").unwrap();

        assert!(matches!(
            Config::load_from(Some(path)),
            Err(Error::ConfigValidation { .. })
        ));
    }

    #[test]
    fn test_charter_config_deserialize() {
        let json = r#"{"read_delay_secs": 3}"#;
        let charter: CharterConfig = serde_json::from_str(json).unwrap();
        assert_eq!(charter.read_delay_secs, 3);
    }
}
