//! Schedule entry (strip) model.
//!
//! An entry is one strip on the shooting-day board: a shot, a setup, a
//! break, a company move, or a banner broadcast across every unit track.
//! Entries are created and mutated entirely by external callers; the
//! engine reads them and emits patch proposals, nothing more.
//!
//! # Field Contract
//!
//! The wire shape is JSON, camelCase, case-sensitive. Every field other
//! than `id` and `type` is individually defaulted when absent, so a
//! partially-filled document deserializes without error.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::timecode::parse_time_to_minutes;

/// Track-id markers that broadcast an entry across units instead of
/// pinning it to one track. Excluded from overlap detection.
pub const SHARED_TRACK_MARKERS: [&str; 2] = ["shared", "all"];

/// Kind of schedule entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
    /// A camera setup + take block.
    Shot,
    /// Lighting/rigging preparation ahead of a shot.
    Setup,
    /// Meal or rest break.
    Break,
    /// Company move between locations.
    Move,
    /// Day-wide marker spanning all tracks (e.g. "CREW CALL").
    Banner,
}

/// A single strip on the schedule board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleEntry {
    /// Unique entry identifier.
    pub id: String,
    /// Entry kind.
    #[serde(rename = "type")]
    pub entry_type: EntryType,
    /// Display title.
    #[serde(default)]
    pub title: String,
    /// Secondary sort key. Primary ordering is by resolved start time.
    #[serde(default)]
    pub order: i32,
    /// Owning track. Absent or unknown ids fall back to "primary".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub track_id: Option<String>,
    /// Canonical `HH:MM` start time, when explicitly scheduled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    /// Legacy free-text time field, consulted when `start_time` is absent.
    #[serde(default, rename = "time", skip_serializing_if = "Option::is_none")]
    pub legacy_time: Option<String>,
    /// Duration in minutes. Non-positive or absent means "use default".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<i32>,
    /// Explicit broadcast scope. When it set-equals the full track list,
    /// the entry is classified as a banner.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub applies_to_track_ids: Option<Vec<String>>,
    /// Display-only metadata, passed through untouched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub highlight: Option<HashMap<String, String>>,
}

impl ScheduleEntry {
    /// Creates a new entry with the given ID and kind.
    pub fn new(id: impl Into<String>, entry_type: EntryType) -> Self {
        Self {
            id: id.into(),
            entry_type,
            title: String::new(),
            order: 0,
            track_id: None,
            start_time: None,
            legacy_time: None,
            duration: None,
            applies_to_track_ids: None,
            highlight: None,
        }
    }

    /// Sets the display title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Sets the secondary sort key.
    pub fn with_order(mut self, order: i32) -> Self {
        self.order = order;
        self
    }

    /// Sets the owning track.
    pub fn with_track(mut self, track_id: impl Into<String>) -> Self {
        self.track_id = Some(track_id.into());
        self
    }

    /// Sets the explicit start time.
    pub fn with_start_time(mut self, start_time: impl Into<String>) -> Self {
        self.start_time = Some(start_time.into());
        self
    }

    /// Sets the legacy free-text time field.
    pub fn with_legacy_time(mut self, time: impl Into<String>) -> Self {
        self.legacy_time = Some(time.into());
        self
    }

    /// Sets the duration in minutes.
    pub fn with_duration(mut self, minutes: i32) -> Self {
        self.duration = Some(minutes);
        self
    }

    /// Sets the explicit broadcast scope.
    pub fn with_applies_to(mut self, track_ids: Vec<String>) -> Self {
        self.applies_to_track_ids = Some(track_ids);
        self
    }

    /// Adds a display-only highlight attribute.
    pub fn with_highlight(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.highlight
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value.into());
        self
    }

    /// The raw time string: `start_time`, else the legacy field.
    ///
    /// Blank strings count as absent.
    pub fn raw_time(&self) -> Option<&str> {
        non_blank(self.start_time.as_deref()).or_else(|| non_blank(self.legacy_time.as_deref()))
    }

    /// Explicit start in minutes since midnight, when the raw time parses.
    pub fn explicit_start_min(&self) -> Option<i32> {
        self.raw_time().and_then(parse_time_to_minutes)
    }

    /// Explicit duration, when present and positive.
    pub fn explicit_duration(&self) -> Option<i32> {
        self.duration.filter(|d| *d > 0)
    }

    /// Whether the track id is a shared-broadcast marker.
    pub fn is_shared_marker(&self) -> bool {
        self.track_id
            .as_deref()
            .is_some_and(|id| SHARED_TRACK_MARKERS.contains(&id))
    }

    /// Whether this entry is a banner with respect to the given track set.
    ///
    /// An entry is a banner iff its type is [`EntryType::Banner`], or its
    /// broadcast scope is non-empty and set-equal to the full track set.
    pub fn is_banner(&self, known_track_ids: &HashSet<&str>) -> bool {
        if self.entry_type == EntryType::Banner {
            return true;
        }
        match &self.applies_to_track_ids {
            Some(ids) if !ids.is_empty() => {
                let applied: HashSet<&str> = ids.iter().map(String::as_str).collect();
                applied == *known_track_ids
            }
            _ => false,
        }
    }
}

fn non_blank(text: Option<&str>) -> Option<&str> {
    text.filter(|t| !t.trim().is_empty())
}
