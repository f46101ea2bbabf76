use tracing::{debug, warn};

use super::GachaMergeReport;
use crate::data::{DatabaseError, GachaRecord, GachaStore};

fn apply(store: &GachaStore, uid: &str, incoming: &GachaRecord) -> Result<bool, DatabaseError> {
    if store.exists(uid, &incoming.id)? {
        return Ok(false);
    }
    let owned = GachaRecord {
        uid: uid.to_string(),
        ..incoming.clone()
    };
    store.insert(&owned)?;
    Ok(true)
}

/// Merge a gacha batch for `uid`. Stored records are never modified; known
/// (uid, id) pairs are skipped.
pub fn merge_gacha(store: &GachaStore, uid: &str, incoming: &[GachaRecord]) -> GachaMergeReport {
    let mut report = GachaMergeReport::default();

    for record in incoming {
        match apply(store, uid, record) {
            Ok(true) => report.inserted += 1,
            Ok(false) => report.skipped += 1,
            Err(e) => {
                warn!(uid, id = %record.id, error = %e, "Failed to merge gacha record");
                report.failed += 1;
            }
        }
    }

    debug!(
        uid,
        inserted = report.inserted,
        skipped = report.skipped,
        failed = report.failed,
        "Merged gacha records"
    );
    report
}
