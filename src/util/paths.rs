//! Path layout of the Chronicle data directory

use std::path::{Path, PathBuf};

/// Environment variable overriding the data directory
pub const DATA_DIR_ENV: &str = "CHRONICLE_DATA_DIR";

/// Resolved locations of everything Chronicle keeps on disk.
///
/// Built once at startup and carried by the application context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataPaths {
    data_dir: PathBuf,
}

impl DataPaths {
    /// Use `custom_path` if given, otherwise the default ~/.chronicle location
    pub fn new(custom_path: Option<PathBuf>) -> Self {
        Self {
            data_dir: custom_path.unwrap_or_else(default_data_dir),
        }
    }

    /// Base data directory
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Database file (<data_dir>/chronicle.db)
    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join("chronicle.db")
    }

    /// Logs directory (<data_dir>/logs)
    pub fn logs_dir(&self) -> PathBuf {
        self.data_dir.join("logs")
    }

    /// Log file (<data_dir>/logs/chronicle.log)
    pub fn log_file_path(&self) -> PathBuf {
        self.logs_dir().join("chronicle.log")
    }

    /// Config file (<data_dir>/config.toml)
    pub fn config_path(&self) -> PathBuf {
        self.data_dir.join("config.toml")
    }

    /// Backup directory used when neither the command line nor the config names one
    pub fn default_backup_dir(&self) -> PathBuf {
        self.data_dir.join("backup")
    }
}

/// Default data directory (~/.chronicle)
fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .map(|h| h.join(".chronicle"))
        .unwrap_or_else(|| PathBuf::from(".chronicle"))
}
