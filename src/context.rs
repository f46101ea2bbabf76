//! Application context built once at startup

use std::path::PathBuf;

use serde::Serialize;

use crate::backup::Orchestrator;
use crate::config::Config;
use crate::data::{AchievementOverview, Database, Stores};
use crate::error::Result;
use crate::interchange::ExportMeta;
use crate::util::DataPaths;

/// What the local store holds
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusSummary {
    pub achievements: AchievementOverview,
    /// (uid, records) per gacha user
    pub gacha: Vec<(String, i64)>,
    pub abyss_records: i64,
    pub cookie_keys: usize,
}

/// Paths, configuration and the open store, passed explicitly to every command
pub struct AppContext {
    pub paths: DataPaths,
    pub config: Config,
    pub db: Database,
    pub stores: Stores,
}

impl AppContext {
    /// Load the config file and open (migrating) the database under `paths`.
    ///
    /// An unusable config file is logged and replaced by the defaults.
    pub fn open(paths: DataPaths) -> Result<Self> {
        tracing::debug!(path = %paths.data_dir().display(), "Using data directory");
        let config = Config::load_or_default(&paths.config_path());
        let db = Database::open(paths.database_path())?;
        Ok(Self::new(paths, config, db))
    }

    pub fn new(paths: DataPaths, config: Config, db: Database) -> Self {
        let stores = Stores::new(&db);
        Self {
            paths,
            config,
            db,
            stores,
        }
    }

    /// Backup directory: config override, else <data dir>/backup
    pub fn backup_dir(&self) -> PathBuf {
        self.config
            .backup_dir
            .clone()
            .unwrap_or_else(|| self.paths.default_backup_dir())
    }

    pub fn orchestrator(&self) -> Orchestrator<'_> {
        Orchestrator::new(&self.stores, ExportMeta::new(self.config.export_app.clone()))
    }

    pub fn status(&self) -> Result<StatusSummary> {
        Ok(StatusSummary {
            achievements: self.stores.achievements.overview()?,
            gacha: self.stores.gacha.count_by_uid()?,
            abyss_records: self.stores.abyss.count()?,
            cookie_keys: self.stores.app_data.cookie()?.len(),
        })
    }
}
