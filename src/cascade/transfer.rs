//! Move-between-tracks edits.
//!
//! Removing an entry from one track and inserting it into another
//! renumbers both tracks and, when cascading, retimes each track
//! independently from its own anchor — touching only entries at or after
//! the removal point (source) and the insertion point (destination).
//! Everything upstream of either change point is left exactly as it was.

use tracing::debug;

use super::{gapless_times, patch_time_if_changed, track_sequence};
use crate::models::{
    normalize_tracks, track_id_set, EntryPatch, PatchSet, ScheduleEntry, ScheduleSettings,
    ScheduleTrack,
};

/// Plans patches for moving one entry to another track.
///
/// `insert_index` is clamped to the destination length. Banners are not
/// track-bound, so moving one is a no-op.
pub fn plan_track_move(
    entries: &[ScheduleEntry],
    tracks: &[ScheduleTrack],
    settings: &ScheduleSettings,
    entry_id: &str,
    from_track_id: &str,
    to_track_id: &str,
    insert_index: usize,
) -> Vec<EntryPatch> {
    let Some(moved) = entries.iter().find(|e| e.id == entry_id) else {
        return Vec::new();
    };

    let tracks = normalize_tracks(tracks);
    let known = track_id_set(&tracks);
    if moved.is_banner(&known) {
        debug!(entry_id, "banners cannot be moved between tracks");
        return Vec::new();
    }

    let mut patches = PatchSet::new();

    let source_with_moved = track_sequence(entries, from_track_id, &known);
    let removed_index = source_with_moved.iter().position(|e| e.id == entry_id);
    let source: Vec<&ScheduleEntry> = source_with_moved
        .iter()
        .copied()
        .filter(|e| e.id != entry_id)
        .collect();

    let same_track = to_track_id == from_track_id;
    let destination_base: Vec<&ScheduleEntry> = if same_track {
        source.clone()
    } else {
        track_sequence(entries, to_track_id, &known)
            .into_iter()
            .filter(|e| e.id != entry_id)
            .collect()
    };
    let insert_at = insert_index.min(destination_base.len());
    let mut destination = destination_base;
    destination.insert(insert_at, moved);

    let track_changes = moved.track_id.as_deref() != Some(to_track_id);
    if track_changes {
        patches.set_track_id(entry_id, to_track_id);
    }

    // Renumber. The moved entry's order is stamped alongside its trackId
    // write; everyone else is changed-only.
    if !same_track {
        for (index, entry) in source.iter().enumerate() {
            if entry.order != index as i32 {
                patches.set_order(&entry.id, index as i32);
            }
        }
    }
    for (index, entry) in destination.iter().enumerate() {
        let stamp_moved = entry.id == entry_id && track_changes;
        if stamp_moved || entry.order != index as i32 {
            patches.set_order(&entry.id, index as i32);
        }
    }

    if !settings.cascade_changes {
        return patches.into_patches();
    }

    // Each track retimes from its own anchor, downstream of its change
    // point only.
    if !same_track {
        if let Some(removed_at) = removed_index {
            let times = gapless_times(&source, settings);
            for (index, &entry) in source.iter().enumerate().skip(removed_at) {
                patch_time_if_changed(&mut patches, entry, times[index]);
            }
        }
    }

    let times = gapless_times(&destination, settings);
    for (index, &entry) in destination.iter().enumerate().skip(insert_at) {
        patch_time_if_changed(&mut patches, entry, times[index]);
    }

    patches.into_patches()
}
