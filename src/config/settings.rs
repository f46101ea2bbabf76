use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{ChronicleError, Result};

/// Example configuration file contents (bundled with the binary)
pub const EXAMPLE_CONFIG: &str = include_str!("config.toml.example");

/// Application configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Backup directory override (None = <data dir>/backup)
    pub backup_dir: Option<PathBuf>,
    /// Application name written into exported files
    pub export_app: String,
    /// Default log filter directive
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backup_dir: None,
            export_app: "Chronicle".to_string(),
            log_level: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlBackupConfig {
    pub dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlExportConfig {
    pub app_name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlLogConfig {
    pub level: Option<String>,
}

/// TOML representation of the config file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    pub backup: Option<TomlBackupConfig>,
    pub export: Option<TomlExportConfig>,
    pub log: Option<TomlLogConfig>,
}

impl Config {
    /// Parse a config document, merging it over the defaults
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let toml_config: TomlConfig =
            toml::from_str(contents).map_err(|e| ChronicleError::Config(e.to_string()))?;
        let mut config = Config::default();

        if let Some(dir) = toml_config.backup.and_then(|b| b.dir) {
            config.backup_dir = Some(dir);
        }

        if let Some(app_name) = toml_config.export.and_then(|e| e.app_name) {
            if !app_name.trim().is_empty() {
                config.export_app = app_name;
            }
        }

        if let Some(level) = toml_config.log.and_then(|l| l.level) {
            config.log_level = level;
        }

        Ok(config)
    }

    /// Load configuration from file.
    ///
    /// Writes the bundled example and returns the defaults on first run. An
    /// unreadable or invalid file is an error.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            Self::create_default_config(path);
            return Ok(Config::default());
        }

        let contents = fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Like [`Config::load`], but an unusable file is logged and the defaults are used
    pub fn load_or_default(path: &Path) -> Self {
        Self::load(path).unwrap_or_else(|e| {
            tracing::warn!(path = %path.display(), error = %e, "Ignoring config file");
            Config::default()
        })
    }

    /// Create the default config file from the bundled example
    fn create_default_config(path: &Path) {
        if let Some(parent) = path.parent() {
            if let Err(e) = fs::create_dir_all(parent) {
                tracing::warn!(path = %parent.display(), error = %e, "Failed to create config directory");
                return;
            }
        }
        if let Err(e) = fs::write(path, EXAMPLE_CONFIG) {
            tracing::warn!(path = %path.display(), error = %e, "Failed to write example config");
        }
    }
}
