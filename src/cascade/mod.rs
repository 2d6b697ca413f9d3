//! Minimal-diff edit planning.
//!
//! Each structural edit (reorder, direct time edit, duration edit, move
//! between tracks) is turned into the smallest set of field patches that
//! brings the schedule to its new canonical state, optionally cascading
//! start-time shifts to downstream entries. The engine proposes; an
//! external persistence collaborator applies.
//!
//! # Invariants
//!
//! - Patches for the same entry are coalesced into one record.
//! - Every emission site compares against the current value and skips
//!   no-op writes, so applying a patch set and re-planning the same edit
//!   yields an empty list.
//! - Only entries logically downstream of the change point are ever
//!   touched; upstream entries never appear in a patch list.
//!
//! # Failure Policy
//!
//! An edit referencing an unknown entry id yields an empty or partial
//! patch list. A cascade that cannot resolve an anchor degrades to
//! patching only the directly-edited field. Nothing here returns an
//! error or panics.

mod reorder;
mod retime;
mod transfer;

pub use reorder::plan_reorder;
pub use retime::{plan_duration_edit, plan_start_time_edit};
pub use transfer::plan_track_move;

use std::collections::HashSet;

use crate::models::{resolve_track_id, PatchSet, ScheduleEntry, ScheduleSettings};
use crate::projector::sequence_cmp;
use crate::timecode::minutes_to_hhmm;

/// Non-banner entries resolved to one track, in (order, id) sequence.
pub(crate) fn track_sequence<'a>(
    entries: &'a [ScheduleEntry],
    track_id: &str,
    known: &HashSet<&str>,
) -> Vec<&'a ScheduleEntry> {
    let mut sequence: Vec<&ScheduleEntry> = entries
        .iter()
        .filter(|e| !e.is_banner(known) && resolve_track_id(e, known) == track_id)
        .collect();
    sequence.sort_by(|a, b| sequence_cmp(a, b));
    sequence
}

/// A track's anchor: the first entry's explicit time, else the day anchor.
pub(crate) fn anchor_time(sequence: &[&ScheduleEntry], settings: &ScheduleSettings) -> i32 {
    sequence
        .first()
        .and_then(|e| e.explicit_start_min())
        .unwrap_or_else(|| settings.day_anchor_min())
}

/// Gapless reassignment: anchor plus running effective durations.
///
/// Used by the cascades, which pack downstream entries back-to-back.
pub(crate) fn gapless_times(sequence: &[&ScheduleEntry], settings: &ScheduleSettings) -> Vec<i32> {
    let mut times = Vec::with_capacity(sequence.len());
    let mut cursor = anchor_time(sequence, settings);
    for &entry in sequence {
        times.push(cursor);
        cursor += settings.effective_duration(entry);
    }
    times
}

/// Projection-style walk: explicit times preserved, untimed entries take
/// the cursor. These are the "current" times edits are compared against.
pub(crate) fn walk_times(sequence: &[&ScheduleEntry], settings: &ScheduleSettings) -> Vec<i32> {
    let mut times = Vec::with_capacity(sequence.len());
    let mut cursor = anchor_time(sequence, settings);
    for &entry in sequence {
        let start = entry.explicit_start_min().unwrap_or(cursor);
        times.push(start);
        cursor = start + settings.effective_duration(entry);
    }
    times
}

/// Emits a start-time patch only when the computed minute differs from
/// the entry's current explicit time.
pub(crate) fn patch_time_if_changed(patches: &mut PatchSet, entry: &ScheduleEntry, computed: i32) {
    if entry.explicit_start_min() != Some(computed) {
        patches.set_start_time(&entry.id, minutes_to_hhmm(computed));
    }
}

#[cfg(test)]
pub(crate) mod testutil {
    use crate::models::{EntryPatch, ScheduleEntry};

    /// Applies a patch set the way the persistence collaborator would.
    pub(crate) fn apply(entries: &[ScheduleEntry], patches: &[EntryPatch]) -> Vec<ScheduleEntry> {
        entries
            .iter()
            .cloned()
            .map(|mut entry| {
                if let Some(record) = patches.iter().find(|p| p.entry_id == entry.id) {
                    if let Some(order) = record.patch.order {
                        entry.order = order;
                    }
                    if let Some(ref start_time) = record.patch.start_time {
                        entry.start_time = Some(start_time.clone());
                    }
                    if let Some(duration) = record.patch.duration {
                        entry.duration = Some(duration);
                    }
                    if let Some(ref track_id) = record.patch.track_id {
                        entry.track_id = Some(track_id.clone());
                    }
                }
                entry
            })
            .collect()
    }
}
