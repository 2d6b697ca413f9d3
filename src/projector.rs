//! Canonical schedule projection.
//!
//! Turns a loose entry list into ordered, time-annotated rows. All time
//! derivation is a per-track cursor walk: the first entry's explicit time
//! (else the day anchor) seeds the cursor, each untimed entry receives
//! the cursor value, and the cursor advances by the entry's effective
//! duration.
//!
//! # Algorithm
//!
//! 1. Normalize tracks; partition entries by resolved track, banners apart.
//! 2. Per track, sort by (order, id) and walk with a time cursor.
//! 3. Derive banner times independently from the day anchor.
//! 4. Classify applicability and sort rows for the requested mode.
//!
//! # Guarantee
//!
//! Every entry appears in exactly one row, and the anchor fallback chain
//! (first explicit time → settings day start → 06:00) means a row's
//! `start_min` is always populated.

use std::cmp::Ordering;
use std::collections::HashSet;

use indexmap::IndexMap;
use tracing::trace;

use crate::models::{
    normalize_tracks, resolve_track_id, track_id_set, Applicability, ProjectedRow, ProjectionMode,
    ScheduleEntry, ScheduleProjection, ScheduleSettings, ScheduleTrack, TimeSource,
};

/// Projects entries onto tracks, deriving a start time for every row.
///
/// # Example
///
/// ```
/// use u_stripboard::models::{EntryType, ProjectionMode, ScheduleEntry, ScheduleSettings};
/// use u_stripboard::projector::project;
///
/// let entries = vec![
///     ScheduleEntry::new("open", EntryType::Shot)
///         .with_order(0)
///         .with_start_time("06:00")
///         .with_duration(45),
///     ScheduleEntry::new("next", EntryType::Shot).with_order(1),
/// ];
///
/// let projection = project(&entries, &[], &ScheduleSettings::default(), ProjectionMode::Time);
/// // "next" has no time of its own: the cursor walk derives 06:45.
/// assert_eq!(projection.rows[1].start_min, Some(405));
/// ```
pub fn project(
    entries: &[ScheduleEntry],
    tracks: &[ScheduleTrack],
    settings: &ScheduleSettings,
    mode: ProjectionMode,
) -> ScheduleProjection {
    let tracks = normalize_tracks(tracks);
    let known = track_id_set(&tracks);

    // Partition: banners float above the track lanes.
    let mut banners: Vec<&ScheduleEntry> = Vec::new();
    let mut groups: IndexMap<&str, Vec<&ScheduleEntry>> =
        tracks.iter().map(|t| (t.id.as_str(), Vec::new())).collect();
    for entry in entries {
        if entry.is_banner(&known) {
            banners.push(entry);
            continue;
        }
        let resolved = resolve_track_id(entry, &known);
        if entry.track_id.as_deref().is_some_and(|id| id != resolved) {
            trace!(entry_id = %entry.id, "unknown track id, resolving to primary");
        }
        groups.entry(resolved).or_default().push(entry);
    }

    let mut rows: Vec<ProjectedRow> = Vec::with_capacity(entries.len());

    for (track_id, mut group) in groups {
        group.sort_by(|a, b| sequence_cmp(a, b));
        let mut cursor = group
            .first()
            .and_then(|e| e.explicit_start_min())
            .unwrap_or_else(|| settings.day_anchor_min());

        for entry in group {
            let (start, source) = match entry.explicit_start_min() {
                Some(explicit) => (explicit, TimeSource::Explicit),
                None => (cursor, TimeSource::Derived),
            };
            let duration = settings.effective_duration(entry);
            cursor = start + duration;
            rows.push(make_row(entry, track_id, start, duration, source, &known));
        }
    }

    for entry in banners {
        let (start, source) = match entry.explicit_start_min() {
            Some(explicit) => (explicit, TimeSource::Explicit),
            None => (settings.day_anchor_min(), TimeSource::Derived),
        };
        let duration = settings.effective_duration(entry);
        let track_id = resolve_track_id(entry, &known);
        rows.push(make_row(entry, track_id, start, duration, source, &known));
    }

    sort_rows(&mut rows, &tracks, mode);

    ScheduleProjection { tracks, rows }
}

/// (order, id) — the sequence-mode comparator used throughout the engine.
pub(crate) fn sequence_cmp(a: &ScheduleEntry, b: &ScheduleEntry) -> Ordering {
    a.order.cmp(&b.order).then_with(|| a.id.cmp(&b.id))
}

fn make_row(
    entry: &ScheduleEntry,
    track_id: &str,
    start: i32,
    duration: i32,
    source: TimeSource,
    known: &HashSet<&str>,
) -> ProjectedRow {
    ProjectedRow {
        is_banner: entry.is_banner(known),
        applicability: classify_applicability(entry, known),
        entry: entry.clone(),
        track_id: track_id.to_string(),
        start_min: Some(start),
        end_min: Some(start + duration),
        duration_minutes: Some(duration),
        time_source: source,
    }
}

fn classify_applicability(entry: &ScheduleEntry, known: &HashSet<&str>) -> Applicability {
    if entry.is_banner(known) {
        return Applicability::All;
    }
    match &entry.applies_to_track_ids {
        Some(ids) if !ids.is_empty() => {
            let unique: HashSet<&str> = ids.iter().map(String::as_str).collect();
            if unique.len() == 1 {
                Applicability::Single
            } else {
                Applicability::Subset
            }
        }
        _ => Applicability::None,
    }
}

fn sort_rows(rows: &mut [ProjectedRow], tracks: &[ScheduleTrack], mode: ProjectionMode) {
    match mode {
        ProjectionMode::Sequence => {
            rows.sort_by(|a, b| sequence_cmp(&a.entry, &b.entry));
        }
        ProjectionMode::Time => {
            let display_pos = |row: &ProjectedRow| {
                tracks
                    .iter()
                    .position(|t| t.id == row.track_id)
                    .unwrap_or(usize::MAX)
            };
            rows.sort_by(|a, b| {
                // Absent times sort last.
                match (a.start_min, b.start_min) {
                    (Some(sa), Some(sb)) => sa.cmp(&sb),
                    (Some(_), None) => Ordering::Less,
                    (None, Some(_)) => Ordering::Greater,
                    (None, None) => Ordering::Equal,
                }
                .then_with(|| display_pos(a).cmp(&display_pos(b)))
                .then_with(|| sequence_cmp(&a.entry, &b.entry))
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EntryType;

    fn shot(id: &str, order: i32) -> ScheduleEntry {
        ScheduleEntry::new(id, EntryType::Shot).with_order(order)
    }

    fn two_tracks() -> Vec<ScheduleTrack> {
        vec![
            ScheduleTrack::new("primary").with_name("Main Unit"),
            ScheduleTrack::new("unit-b").with_name("Second Unit").with_order(1),
        ]
    }

    #[test]
    fn test_cursor_walk_derives_untimed_entries() {
        let entries = vec![
            shot("a", 0).with_start_time("06:00").with_duration(15),
            shot("b", 1), // derived
            shot("c", 2), // derived
        ];
        let projection = project(
            &entries,
            &[],
            &ScheduleSettings::default(),
            ProjectionMode::Sequence,
        );

        assert_eq!(projection.rows.len(), 3);
        assert_eq!(projection.rows[0].start_min, Some(360));
        assert_eq!(projection.rows[0].time_source, TimeSource::Explicit);
        assert_eq!(projection.rows[1].start_min, Some(375));
        assert_eq!(projection.rows[1].time_source, TimeSource::Derived);
        // b used the default 15-minute duration.
        assert_eq!(projection.rows[2].start_min, Some(390));
    }

    #[test]
    fn test_explicit_time_resets_cursor() {
        let entries = vec![
            shot("a", 0).with_start_time("06:00").with_duration(15),
            shot("b", 1).with_start_time("08:00"),
            shot("c", 2),
        ];
        let projection = project(
            &entries,
            &[],
            &ScheduleSettings::default(),
            ProjectionMode::Sequence,
        );
        assert_eq!(projection.rows[1].start_min, Some(480));
        assert_eq!(projection.rows[2].start_min, Some(495));
    }

    #[test]
    fn test_anchor_falls_back_to_day_start() {
        let entries = vec![shot("a", 0), shot("b", 1)];
        let settings = ScheduleSettings::default().with_day_start("07:30");
        let projection = project(&entries, &[], &settings, ProjectionMode::Sequence);
        assert_eq!(projection.rows[0].start_min, Some(450));
        assert_eq!(projection.rows[0].time_source, TimeSource::Derived);
        assert_eq!(projection.rows[1].start_min, Some(465));
    }

    #[test]
    fn test_anchor_last_resort_is_0600() {
        let entries = vec![shot("a", 0)];
        let settings = ScheduleSettings::default().with_day_start("not a time");
        let projection = project(&entries, &[], &settings, ProjectionMode::Sequence);
        assert_eq!(projection.rows[0].start_min, Some(360));
    }

    #[test]
    fn test_tracks_walk_independently() {
        let entries = vec![
            shot("a", 0).with_track("primary").with_start_time("06:00"),
            shot("b", 1).with_track("primary"),
            shot("c", 0).with_track("unit-b").with_start_time("09:00").with_duration(30),
            shot("d", 1).with_track("unit-b"),
        ];
        let projection = project(
            &entries,
            &two_tracks(),
            &ScheduleSettings::default(),
            ProjectionMode::Sequence,
        );

        let row = |id: &str| projection.rows.iter().find(|r| r.entry.id == id).unwrap();
        assert_eq!(row("b").start_min, Some(375));
        assert_eq!(row("d").start_min, Some(570)); // 09:00 + 30
    }

    #[test]
    fn test_banner_derives_independently() {
        let entries = vec![
            shot("a", 0).with_start_time("09:00"),
            ScheduleEntry::new("crew-call", EntryType::Banner).with_order(1),
        ];
        let projection = project(
            &entries,
            &[],
            &ScheduleSettings::default(),
            ProjectionMode::Sequence,
        );
        let banner = projection.rows.iter().find(|r| r.is_banner).unwrap();
        // Day anchor, not the track cursor.
        assert_eq!(banner.start_min, Some(360));
        assert_eq!(banner.time_source, TimeSource::Derived);
        assert_eq!(banner.applicability, Applicability::All);
    }

    #[test]
    fn test_full_scope_entry_is_banner() {
        let entries = vec![ScheduleEntry::new("lunch", EntryType::Break)
            .with_applies_to(vec!["unit-b".into(), "primary".into()])];
        let projection = project(
            &entries,
            &two_tracks(),
            &ScheduleSettings::default(),
            ProjectionMode::Time,
        );
        assert!(projection.rows[0].is_banner);
        assert_eq!(projection.rows[0].applicability, Applicability::All);
    }

    #[test]
    fn test_applicability_kinds() {
        let entries = vec![
            shot("single", 0).with_applies_to(vec!["primary".into()]),
            shot("plain", 1),
            shot("subset", 2).with_applies_to(vec!["primary".into(), "unit-b".into()]),
        ];
        let tracks = vec![
            ScheduleTrack::new("primary"),
            ScheduleTrack::new("unit-b").with_order(1),
            ScheduleTrack::new("unit-c").with_order(2),
        ];
        let projection = project(
            &entries,
            &tracks,
            &ScheduleSettings::default(),
            ProjectionMode::Sequence,
        );

        let row = |id: &str| projection.rows.iter().find(|r| r.entry.id == id).unwrap();
        assert_eq!(row("single").applicability, Applicability::Single);
        assert_eq!(row("plain").applicability, Applicability::None);
        assert_eq!(row("subset").applicability, Applicability::Subset);
        assert!(!row("subset").is_banner);
    }

    #[test]
    fn test_unknown_track_resolves_to_primary() {
        let entries = vec![shot("a", 0).with_track("nonexistent")];
        let projection = project(
            &entries,
            &two_tracks(),
            &ScheduleSettings::default(),
            ProjectionMode::Time,
        );
        assert_eq!(projection.rows[0].track_id, "primary");
    }

    #[test]
    fn test_every_entry_appears_once() {
        let entries = vec![
            shot("a", 0).with_track("primary"),
            shot("b", 1).with_track("unit-b"),
            shot("c", 2).with_track("bogus"),
            ScheduleEntry::new("banner", EntryType::Banner),
        ];
        let projection = project(
            &entries,
            &two_tracks(),
            &ScheduleSettings::default(),
            ProjectionMode::Time,
        );
        assert_eq!(projection.rows.len(), entries.len());
        let mut ids: Vec<&str> = projection.rows.iter().map(|r| r.entry.id.as_str()).collect();
        ids.sort_unstable();
        assert_eq!(ids, ["a", "b", "banner", "c"]);
    }

    #[test]
    fn test_time_mode_sort() {
        let entries = vec![
            shot("late", 0).with_track("primary").with_start_time("10:00"),
            shot("early", 1).with_track("unit-b").with_start_time("07:00"),
            // Same time on both tracks: primary's display order wins.
            shot("tie-b", 2).with_track("unit-b").with_start_time("08:00"),
            shot("tie-a", 3).with_track("primary").with_start_time("08:00"),
        ];
        let projection = project(
            &entries,
            &two_tracks(),
            &ScheduleSettings::default(),
            ProjectionMode::Time,
        );
        let ids: Vec<&str> = projection.rows.iter().map(|r| r.entry.id.as_str()).collect();
        assert_eq!(ids, ["early", "tie-a", "tie-b", "late"]);
    }

    #[test]
    fn test_sequence_mode_sort() {
        let entries = vec![
            shot("b", 1).with_start_time("06:00"),
            shot("a", 0).with_start_time("10:00"),
            // Order tie broken by id.
            shot("z", 2),
            shot("y", 2),
        ];
        let projection = project(
            &entries,
            &[],
            &ScheduleSettings::default(),
            ProjectionMode::Sequence,
        );
        let ids: Vec<&str> = projection.rows.iter().map(|r| r.entry.id.as_str()).collect();
        assert_eq!(ids, ["a", "b", "y", "z"]);
    }

    #[test]
    fn test_inputs_untouched() {
        let entries = vec![shot("a", 0)];
        let tracks = vec![ScheduleTrack::new("primary")];
        let before = (entries.clone(), tracks.clone());
        let _ = project(
            &entries,
            &tracks,
            &ScheduleSettings::default(),
            ProjectionMode::Time,
        );
        assert_eq!((entries, tracks), before);
    }

    #[test]
    fn test_empty_inputs() {
        let projection = project(
            &[],
            &[],
            &ScheduleSettings::default(),
            ProjectionMode::Time,
        );
        assert!(projection.rows.is_empty());
        assert_eq!(projection.tracks.len(), 1); // synthesized primary
    }
}
