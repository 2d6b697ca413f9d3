//! Unit track model and normalization.
//!
//! A track is one parallel lane of the shooting day (main unit, second
//! unit, splinter unit). Track lists arrive from external callers in any
//! state; [`normalize_tracks`] is re-run on every engine call rather than
//! cached — it is idempotent and cheap.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::ScheduleEntry;

/// The fallback track id. Entries with a missing or unknown track id
/// resolve here, and a track with this id is synthesized when a schedule
/// has no usable tracks at all.
pub const PRIMARY_TRACK_ID: &str = "primary";

/// A parallel unit track on the schedule board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleTrack {
    /// Unique track identifier.
    pub id: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Display position (ascending).
    #[serde(default)]
    pub order: i32,
}

impl ScheduleTrack {
    /// Creates a new track.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            order: 0,
        }
    }

    /// Sets the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the display position.
    pub fn with_order(mut self, order: i32) -> Self {
        self.order = order;
        self
    }

    /// The synthesized fallback track.
    pub fn primary() -> Self {
        Self::new(PRIMARY_TRACK_ID).with_name("Primary")
    }
}

/// Normalizes a raw track list.
///
/// Drops tracks with a blank id, sorts by (order, id), and synthesizes a
/// "primary" track when nothing usable remains. The result is freshly
/// allocated; the input is never touched.
pub fn normalize_tracks(tracks: &[ScheduleTrack]) -> Vec<ScheduleTrack> {
    let mut normalized: Vec<ScheduleTrack> = tracks
        .iter()
        .filter(|t| !t.id.trim().is_empty())
        .cloned()
        .collect();
    normalized.sort_by(|a, b| a.order.cmp(&b.order).then_with(|| a.id.cmp(&b.id)));

    if normalized.is_empty() {
        normalized.push(ScheduleTrack::primary());
    }
    normalized
}

/// Collects the id set of a normalized track list.
pub fn track_id_set(tracks: &[ScheduleTrack]) -> HashSet<&str> {
    tracks.iter().map(|t| t.id.as_str()).collect()
}

/// Resolves the track an entry belongs to.
///
/// Returns the entry's own track id when it is known, else
/// [`PRIMARY_TRACK_ID`]. Never fails.
pub fn resolve_track_id<'a>(entry: &'a ScheduleEntry, known_ids: &HashSet<&str>) -> &'a str {
    match entry.track_id.as_deref() {
        Some(id) if known_ids.contains(id) => id,
        _ => PRIMARY_TRACK_ID,
    }
}
