use tracing::{debug, warn};

use super::AbyssMergeReport;
use crate::data::{AbyssRecord, AbyssStore, DatabaseError, Upsert};

enum Applied {
    Written(Upsert),
    Unchanged,
}

fn apply(store: &AbyssStore, incoming: &AbyssRecord) -> Result<Applied, DatabaseError> {
    if store.get(&incoming.uid, incoming.id)?.as_ref() == Some(incoming) {
        return Ok(Applied::Unchanged);
    }
    Ok(Applied::Written(store.upsert(incoming)?))
}

/// Merge abyss schedules. The incoming copy of a schedule replaces the stored one.
pub fn merge_abyss(store: &AbyssStore, incoming: &[AbyssRecord]) -> AbyssMergeReport {
    let mut report = AbyssMergeReport::default();

    for record in incoming {
        match apply(store, record) {
            Ok(Applied::Written(Upsert::Inserted)) => report.inserted += 1,
            Ok(Applied::Written(Upsert::Updated)) => report.updated += 1,
            Ok(Applied::Unchanged) => report.unchanged += 1,
            Err(e) => {
                warn!(uid = %record.uid, id = record.id, error = %e, "Failed to merge abyss record");
                report.failed += 1;
            }
        }
    }

    debug!(
        inserted = report.inserted,
        updated = report.updated,
        unchanged = report.unchanged,
        failed = report.failed,
        "Merged abyss records"
    );
    report
}
