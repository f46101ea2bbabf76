use tracing::{debug, warn};

use super::AchievementMergeReport;
use crate::data::{AchievementRecord, AchievementStatus, AchievementStore, DatabaseError};

/// Combine a stored achievement with an incoming one.
///
/// The more complete record wins, where completeness is the total order on
/// `(status, progress)`. When both are completed the earliest completion time
/// is kept. The result never has a lower status or progress than `local`.
pub fn reconcile(local: &AchievementRecord, incoming: &AchievementRecord) -> AchievementRecord {
    let mut merged = if incoming.completeness() > local.completeness() {
        incoming.clone()
    } else {
        local.clone()
    };

    if local.status == AchievementStatus::Completed && incoming.status == AchievementStatus::Completed
    {
        merged.completed_at = earliest_known(local.completed_at, incoming.completed_at);
    }

    merged
}

/// Earliest of two completion times. Zero and below mean "finished, time unknown"
/// and only survive when neither side knows the time.
fn earliest_known(a: Option<i64>, b: Option<i64>) -> Option<i64> {
    let known = |t: &i64| *t > 0;
    match (a.filter(known), b.filter(known)) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (Some(t), None) | (None, Some(t)) => Some(t),
        (None, None) => a.max(b),
    }
}

enum Applied {
    Inserted,
    Updated,
    Unchanged,
}

fn apply(store: &AchievementStore, incoming: &AchievementRecord) -> Result<Applied, DatabaseError> {
    match store.get(incoming.id)? {
        None => {
            store.insert(incoming)?;
            Ok(Applied::Inserted)
        }
        Some(local) => {
            let merged = reconcile(&local, incoming);
            if merged == local {
                Ok(Applied::Unchanged)
            } else {
                store.update(&merged)?;
                Ok(Applied::Updated)
            }
        }
    }
}

/// Merge an achievement batch into the store
pub fn merge_achievements(
    store: &AchievementStore,
    incoming: &[AchievementRecord],
) -> AchievementMergeReport {
    let mut report = AchievementMergeReport::default();

    for record in incoming {
        match apply(store, record) {
            Ok(Applied::Inserted) => report.inserted += 1,
            Ok(Applied::Updated) => report.updated += 1,
            Ok(Applied::Unchanged) => report.unchanged += 1,
            Err(e) => {
                warn!(id = record.id, error = %e, "Failed to merge achievement");
                report.failed += 1;
            }
        }
    }

    debug!(
        inserted = report.inserted,
        updated = report.updated,
        unchanged = report.unchanged,
        failed = report.failed,
        "Merged achievements"
    );
    report
}
