//! Data persistence layer for Chronicle
//!
//! SQLite-backed storage for achievements, gacha history, abyss schedules and
//! app data. Every statement binds its values as parameters.

mod abyss;
mod achievement;
mod app_data;
mod database;
mod gacha;
mod migrations;
mod models;

pub use abyss::{AbyssStore, Upsert};
pub use achievement::AchievementStore;
pub use app_data::{AppDataStore, Cookie, COOKIE_KEY};
pub use database::{Database, DatabaseError};
pub use gacha::GachaStore;
pub use models::{
    AbyssRecord, AchievementOverview, AchievementRecord, AchievementStatus, GachaRecord,
    GACHA_TIME_FORMAT,
};

/// All category stores over one shared connection
#[derive(Clone)]
pub struct Stores {
    pub achievements: AchievementStore,
    pub gacha: GachaStore,
    pub abyss: AbyssStore,
    pub app_data: AppDataStore,
}

impl Stores {
    pub fn new(db: &Database) -> Self {
        Self {
            achievements: AchievementStore::new(db.connection()),
            gacha: GachaStore::new(db.connection()),
            abyss: AbyssStore::new(db.connection()),
            app_data: AppDataStore::new(db.connection()),
        }
    }
}
