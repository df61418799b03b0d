//! Repair history helpers.

use rescue_core::RepairRecord;

/// Shown when there are no records yet.
pub const EMPTY_HISTORY: &str = "暫無紀錄";

/// Add a record at the front of the collection.
pub fn prepend(history: &mut Vec<RepairRecord>, record: RepairRecord) {
    history.insert(0, record);
}

/// Records ordered for display, newest timestamp first.
pub fn newest_first(history: &[RepairRecord]) -> Vec<&RepairRecord> {
    let mut sorted: Vec<&RepairRecord> = history.iter().collect();
    sorted.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    sorted
}
