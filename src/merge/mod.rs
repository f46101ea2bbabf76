//! Merge engine: reconcile incoming record batches with the local store
//!
//! Every record is looked up by its natural key and classified on its own.
//! A store failure on one record is logged and counted; the rest of the batch
//! still runs. Re-applying a batch is a no-op.

mod abyss;
mod achievement;
mod gacha;

pub use abyss::merge_abyss;
pub use achievement::{merge_achievements, reconcile};
pub use gacha::merge_gacha;

use serde::Serialize;

/// Outcome of merging an achievement batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AchievementMergeReport {
    pub inserted: usize,
    pub updated: usize,
    pub unchanged: usize,
    pub failed: usize,
}

/// Outcome of merging a gacha batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GachaMergeReport {
    pub inserted: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Outcome of merging abyss schedules
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AbyssMergeReport {
    pub inserted: usize,
    pub updated: usize,
    pub unchanged: usize,
    pub failed: usize,
}

impl std::fmt::Display for AchievementMergeReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} inserted, {} updated, {} unchanged",
            self.inserted, self.updated, self.unchanged
        )?;
        if self.failed > 0 {
            write!(f, ", {} failed", self.failed)?;
        }
        Ok(())
    }
}

impl std::fmt::Display for GachaMergeReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} inserted, {} skipped", self.inserted, self.skipped)?;
        if self.failed > 0 {
            write!(f, ", {} failed", self.failed)?;
        }
        Ok(())
    }
}

impl std::fmt::Display for AbyssMergeReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} inserted, {} updated, {} unchanged",
            self.inserted, self.updated, self.unchanged
        )?;
        if self.failed > 0 {
            write!(f, ", {} failed", self.failed)?;
        }
        Ok(())
    }
}
