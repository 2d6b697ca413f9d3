//! Per-track overlap detection.
//!
//! Finds pairwise time overlaps between entries on the same track. The
//! engine only reports conflicts — it never resolves them.
//!
//! # Algorithm
//!
//! Entries are grouped by resolved track and sorted by start time, so
//! only **adjacent** pairs need checking: a conflict with a non-adjacent
//! entry implies a conflict with the one between them. This finds every
//! violation without duplicate reports for transitively-overlapping
//! chains.
//!
//! Banners, shared-broadcast entries, and entries without a parseable
//! time never participate.

use std::cmp::Ordering;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::{
    normalize_tracks, resolve_track_id, track_id_set, MinuteSpan, ScheduleEntry, ScheduleSettings,
    ScheduleTrack,
};

/// Input to [`find_overlaps`].
#[derive(Debug, Clone, Copy)]
pub struct OverlapQuery<'a> {
    /// Entries to inspect.
    pub entries: &'a [ScheduleEntry],
    /// Raw track list (normalized internally).
    pub tracks: &'a [ScheduleTrack],
    /// Settings (for the fallback duration).
    pub settings: &'a ScheduleSettings,
    /// Optional scope: only report conflicts on these tracks.
    pub track_ids: Option<&'a [String]>,
}

/// One side of a reported overlap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConflictParty {
    /// Entry id.
    pub entry_id: String,
    /// Entry title, for human-readable reporting downstream.
    pub title: String,
}

/// A pairwise time overlap on one track.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackOverlapConflict {
    /// Track where the overlap occurs.
    pub track_id: String,
    /// Track display name.
    pub track_name: String,
    /// The earlier entry.
    pub first: ConflictParty,
    /// The later entry whose start the first one runs past.
    pub second: ConflictParty,
    /// The earlier entry's resolved interval.
    pub first_span: MinuteSpan,
    /// The later entry's resolved interval.
    pub second_span: MinuteSpan,
}

/// Finds pairwise time overlaps within each track.
pub fn find_overlaps(query: &OverlapQuery) -> Vec<TrackOverlapConflict> {
    let tracks = normalize_tracks(query.tracks);
    let known = track_id_set(&tracks);

    let in_scope = |track_id: &str| match query.track_ids {
        Some(scope) => scope.iter().any(|id| id == track_id),
        None => true,
    };

    // Group timed, track-bound entries by resolved track.
    let mut groups: IndexMap<&str, Vec<&ScheduleEntry>> = tracks
        .iter()
        .filter(|t| in_scope(&t.id))
        .map(|t| (t.id.as_str(), Vec::new()))
        .collect();
    for entry in query.entries {
        if entry.is_banner(&known) || entry.is_shared_marker() {
            continue;
        }
        if entry.explicit_start_min().is_none() {
            continue;
        }
        let resolved = resolve_track_id(entry, &known);
        if let Some(group) = groups.get_mut(resolved) {
            group.push(entry);
        }
    }

    let mut conflicts = Vec::new();
    for (track_id, mut group) in groups {
        group.sort_by(|a, b| start_cmp(a, b));
        let track_name = tracks
            .iter()
            .find(|t| t.id == track_id)
            .map(|t| t.name.clone())
            .unwrap_or_default();

        for pair in group.windows(2) {
            let (current, next) = (pair[0], pair[1]);
            let current_start = current.explicit_start_min().unwrap_or_default();
            let next_start = next.explicit_start_min().unwrap_or_default();

            // Effective duration: explicit, else the gap to a later
            // neighbor, else the settings default.
            let duration = current.explicit_duration().unwrap_or_else(|| {
                if next_start > current_start {
                    next_start - current_start
                } else {
                    query.settings.default_duration_min()
                }
            });
            let current_end = current_start + duration;

            if current_end > next_start {
                conflicts.push(TrackOverlapConflict {
                    track_id: track_id.to_string(),
                    track_name: track_name.clone(),
                    first: party(current),
                    second: party(next),
                    first_span: MinuteSpan::new(current_start, current_end),
                    second_span: MinuteSpan::new(
                        next_start,
                        next_start + query.settings.effective_duration(next),
                    ),
                });
            }
        }
    }

    if !conflicts.is_empty() {
        debug!(count = conflicts.len(), "track overlaps detected");
    }
    conflicts
}

/// (startMin, order, id).
fn start_cmp(a: &ScheduleEntry, b: &ScheduleEntry) -> Ordering {
    a.explicit_start_min()
        .cmp(&b.explicit_start_min())
        .then_with(|| a.order.cmp(&b.order))
        .then_with(|| a.id.cmp(&b.id))
}

fn party(entry: &ScheduleEntry) -> ConflictParty {
    ConflictParty {
        entry_id: entry.id.clone(),
        title: entry.title.clone(),
    }
}
