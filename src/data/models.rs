//! Data models for achievements, gacha history and abyss records

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Completion state of an achievement, ordered from least to most complete
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AchievementStatus {
    Locked,
    InProgress,
    Completed,
}

impl AchievementStatus {
    /// Column value stored in `achievements.status`
    pub fn as_i64(&self) -> i64 {
        match self {
            AchievementStatus::Locked => 0,
            AchievementStatus::InProgress => 1,
            AchievementStatus::Completed => 2,
        }
    }

    pub fn from_i64(value: i64) -> Option<Self> {
        match value {
            0 => Some(AchievementStatus::Locked),
            1 => Some(AchievementStatus::InProgress),
            2 => Some(AchievementStatus::Completed),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AchievementStatus::Locked => "locked",
            AchievementStatus::InProgress => "in progress",
            AchievementStatus::Completed => "completed",
        }
    }
}

/// Progress of a single achievement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AchievementRecord {
    /// Achievement id, unique within the data series
    pub id: i64,
    pub status: AchievementStatus,
    /// Progress counter, never negative
    pub progress: i64,
    /// Completion time in unix seconds; present only when completed
    pub completed_at: Option<i64>,
}

impl AchievementRecord {
    pub fn locked(id: i64) -> Self {
        Self {
            id,
            status: AchievementStatus::Locked,
            progress: 0,
            completed_at: None,
        }
    }

    pub fn in_progress(id: i64, progress: i64) -> Self {
        Self {
            id,
            status: AchievementStatus::InProgress,
            progress,
            completed_at: None,
        }
    }

    pub fn completed(id: i64, progress: i64, completed_at: i64) -> Self {
        Self {
            id,
            status: AchievementStatus::Completed,
            progress,
            completed_at: Some(completed_at),
        }
    }

    /// Check the record invariants, returning a description of the first violation
    pub fn validate(&self) -> Result<(), String> {
        if self.progress < 0 {
            return Err(format!(
                "achievement {}: negative progress {}",
                self.id, self.progress
            ));
        }
        if self.progress > 0 && self.status == AchievementStatus::Locked {
            return Err(format!(
                "achievement {}: progress {} on a locked achievement",
                self.id, self.progress
            ));
        }
        match (self.status, self.completed_at) {
            (AchievementStatus::Completed, None) => Err(format!(
                "achievement {}: completed without a completion time",
                self.id
            )),
            (status, Some(_)) if status != AchievementStatus::Completed => Err(format!(
                "achievement {}: completion time on a {} achievement",
                self.id,
                status.label()
            )),
            _ => Ok(()),
        }
    }

    /// Key of the total order used when merging: status first, then progress
    pub fn completeness(&self) -> (AchievementStatus, i64) {
        (self.status, self.progress)
    }
}

/// Format of gacha timestamps, second resolution in the server's local time
pub const GACHA_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A single gacha pull. Immutable once stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GachaRecord {
    /// Owning game user id
    pub uid: String,
    /// Record id, unique per user
    pub id: String,
    /// Pool (banner) type as reported by the game
    pub gacha_type: String,
    /// Normalized pool type shared by related banners
    pub uigf_gacha_type: String,
    pub item_id: Option<String>,
    /// Name of the awarded item
    pub name: String,
    pub item_type: String,
    pub rank_type: String,
    pub count: i64,
    pub time: NaiveDateTime,
}

impl GachaRecord {
    pub fn time_string(&self) -> String {
        self.time.format(GACHA_TIME_FORMAT).to_string()
    }
}

/// One spiral abyss schedule for one user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AbyssRecord {
    pub uid: String,
    /// Schedule id
    pub id: i64,
    pub start_time: String,
    pub end_time: String,
    #[serde(default)]
    pub total_battle_times: i64,
    #[serde(default)]
    pub total_win_times: i64,
    #[serde(default)]
    pub max_floor: String,
    #[serde(default)]
    pub total_star: i64,
    #[serde(default)]
    pub is_unlock: bool,
    /// Reveal ranks, floors and the rest of the schedule payload
    #[serde(default = "empty_detail")]
    pub detail: serde_json::Value,
}

fn empty_detail() -> serde_json::Value {
    serde_json::Value::Object(serde_json::Map::new())
}

/// Achievement totals for the status summary
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AchievementOverview {
    pub total: i64,
    pub in_progress: i64,
    pub completed: i64,
}
