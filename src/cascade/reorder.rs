//! Reorder edits.
//!
//! The caller supplies the complete new id sequence for one track (drag
//! and drop lands here). Order keys are renumbered 0..N-1, and when
//! cascading is on, start times are reassigned gaplessly from the track
//! anchor — but only for the moved entry and everything after its new
//! position. Entries ahead of it are assumed already canonical.

use std::collections::HashMap;

use tracing::debug;

use super::{gapless_times, patch_time_if_changed};
use crate::models::{EntryPatch, PatchSet, ScheduleEntry, ScheduleSettings};

/// Plans patches for a within-track reorder.
///
/// `next_ordered_ids` is the track's full entry sequence after the move;
/// ids not present in `entries` are skipped.
pub fn plan_reorder(
    entries: &[ScheduleEntry],
    settings: &ScheduleSettings,
    moved_entry_id: &str,
    next_ordered_ids: &[String],
) -> Vec<EntryPatch> {
    let by_id: HashMap<&str, &ScheduleEntry> =
        entries.iter().map(|e| (e.id.as_str(), e)).collect();
    let sequence: Vec<&ScheduleEntry> = next_ordered_ids
        .iter()
        .filter_map(|id| by_id.get(id.as_str()).copied())
        .collect();

    let mut patches = PatchSet::new();
    for (index, entry) in sequence.iter().enumerate() {
        if entry.order != index as i32 {
            patches.set_order(&entry.id, index as i32);
        }
    }

    if !settings.cascade_changes {
        debug!(moved_entry_id, "cascade disabled, renumbering only");
        return patches.into_patches();
    }

    let Some(moved_index) = sequence.iter().position(|e| e.id == moved_entry_id) else {
        return patches.into_patches();
    };

    let times = gapless_times(&sequence, settings);
    for (index, &entry) in sequence.iter().enumerate().skip(moved_index) {
        patch_time_if_changed(&mut patches, entry, times[index]);
    }

    patches.into_patches()
}
