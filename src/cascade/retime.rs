//! Direct time and duration edits.
//!
//! A direct start-time edit can change an entry's position in the day,
//! so the whole track is re-ranked around the substituted time before
//! anything downstream is shifted. A duration edit keeps positions and
//! only pushes later entries.

use tracing::debug;

use super::{patch_time_if_changed, track_sequence, walk_times};
use crate::models::{
    normalize_tracks, resolve_track_id, track_id_set, EntryPatch, PatchSet, ScheduleEntry,
    ScheduleSettings, ScheduleTrack,
};
use crate::timecode::{minutes_to_hhmm, parse_time_to_minutes};

/// Plans patches for editing one entry's start time.
pub fn plan_start_time_edit(
    entries: &[ScheduleEntry],
    tracks: &[ScheduleTrack],
    settings: &ScheduleSettings,
    entry_id: &str,
    next_start_time: &str,
) -> Vec<EntryPatch> {
    let Some(edited) = entries.iter().find(|e| e.id == entry_id) else {
        return Vec::new();
    };

    let mut patches = PatchSet::new();
    let parsed = parse_time_to_minutes(next_start_time);

    let Some(new_start) = parsed.filter(|_| settings.cascade_changes) else {
        // Cascade off, or a non-time override: patch the field alone.
        // Parseable input is canonicalized; raw text is kept verbatim.
        match parsed {
            Some(minutes) => patch_time_if_changed(&mut patches, edited, minutes),
            None if edited.raw_time() != Some(next_start_time.trim()) => {
                patches.set_start_time(entry_id, next_start_time.trim());
            }
            None => {}
        }
        debug!(entry_id, "start time edit without cascade");
        return patches.into_patches();
    };

    let tracks = normalize_tracks(tracks);
    let known = track_id_set(&tracks);
    if edited.is_banner(&known) {
        // Banners float outside the track sequence; nothing to cascade.
        patch_time_if_changed(&mut patches, edited, new_start);
        return patches.into_patches();
    }

    let track_id = resolve_track_id(edited, &known);
    let sequence = track_sequence(entries, track_id, &known);
    let current_times = walk_times(&sequence, settings);

    // Re-rank the track around the substituted time. Every other entry
    // keeps its current explicit/derived time; ties fall back to the
    // original position, then id.
    let mut ranked: Vec<(usize, &ScheduleEntry, i32)> = sequence
        .iter()
        .enumerate()
        .map(|(index, &entry)| {
            let time = if entry.id == entry_id {
                new_start
            } else {
                current_times[index]
            };
            (index, entry, time)
        })
        .collect();
    ranked.sort_by(|a, b| {
        a.2.cmp(&b.2)
            .then_with(|| a.0.cmp(&b.0))
            .then_with(|| a.1.id.cmp(&b.1.id))
    });

    for (rank, &(_, entry, _)) in ranked.iter().enumerate() {
        if entry.order != rank as i32 {
            patches.set_order(&entry.id, rank as i32);
        }
    }

    patch_time_if_changed(&mut patches, edited, new_start);

    // The edited entry's rank is always found: it is in its own track
    // sequence. Infer a duration from the gap to its new neighbor when
    // it has none of its own.
    let edited_rank = ranked
        .iter()
        .position(|(_, e, _)| e.id == entry_id)
        .unwrap_or(ranked.len());
    let mut cascade_duration = settings.effective_duration(edited);
    if edited.explicit_duration().is_none() {
        if let Some((_, _, next_time)) = ranked.get(edited_rank + 1) {
            if *next_time > new_start {
                cascade_duration = *next_time - new_start;
                if edited.duration != Some(cascade_duration) {
                    patches.set_duration(entry_id, cascade_duration);
                }
            }
        }
    }

    // Shift everything after the edited entry's new position.
    let mut cursor = new_start + cascade_duration;
    for &(original_index, entry, _) in ranked.iter().skip(edited_rank + 1) {
        if current_times[original_index] != cursor {
            patches.set_start_time(&entry.id, minutes_to_hhmm(cursor));
        }
        cursor += settings.effective_duration(entry);
    }

    patches.into_patches()
}

/// Plans patches for editing one entry's duration.
pub fn plan_duration_edit(
    entries: &[ScheduleEntry],
    tracks: &[ScheduleTrack],
    settings: &ScheduleSettings,
    entry_id: &str,
    next_duration_minutes: i32,
) -> Vec<EntryPatch> {
    let Some(edited) = entries.iter().find(|e| e.id == entry_id) else {
        return Vec::new();
    };

    let mut patches = PatchSet::new();
    if edited.duration != Some(next_duration_minutes) {
        patches.set_duration(entry_id, next_duration_minutes);
    }

    if !settings.cascade_changes {
        return patches.into_patches();
    }
    let Some(start) = edited.explicit_start_min() else {
        debug!(entry_id, "duration edit without a parseable start, no cascade");
        return patches.into_patches();
    };

    let tracks = normalize_tracks(tracks);
    let known = track_id_set(&tracks);
    let track_id = resolve_track_id(edited, &known);
    let sequence = track_sequence(entries, track_id, &known);
    let Some(position) = sequence.iter().position(|e| e.id == entry_id) else {
        return patches.into_patches();
    };
    let current_times = walk_times(&sequence, settings);

    let new_effective = if next_duration_minutes > 0 {
        next_duration_minutes
    } else {
        settings.default_duration_min()
    };

    let mut cursor = start + new_effective;
    for (index, &entry) in sequence.iter().enumerate().skip(position + 1) {
        if current_times[index] != cursor {
            patches.set_start_time(&entry.id, minutes_to_hhmm(cursor));
        }
        cursor += settings.effective_duration(entry);
    }

    patches.into_patches()
}
