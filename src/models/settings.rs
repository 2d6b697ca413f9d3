//! Schedule settings.
//!
//! Caller-supplied knobs for the whole engine. Every field is defaulted
//! individually on deserialization, so a malformed or partial settings
//! object never fails — it degrades field by field.

use serde::{Deserialize, Serialize};

use super::ScheduleEntry;
use crate::timecode::parse_time_to_minutes;

/// Fallback day anchor when `day_start_time` is absent or unparseable
/// (06:00).
pub const DEFAULT_DAY_START_MIN: i32 = 360;

/// Fallback entry duration in minutes.
pub const DEFAULT_ENTRY_DURATION_MIN: i32 = 15;

/// Engine-wide schedule settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScheduleSettings {
    /// Whether edits cascade start-time shifts to downstream entries.
    pub cascade_changes: bool,
    /// `HH:MM` anchor used when a track has no explicitly timed entry.
    pub day_start_time: String,
    /// Fallback duration for entries without a positive duration.
    pub default_entry_duration_minutes: i32,
}

impl Default for ScheduleSettings {
    fn default() -> Self {
        Self {
            cascade_changes: true,
            day_start_time: "06:00".to_string(),
            default_entry_duration_minutes: DEFAULT_ENTRY_DURATION_MIN,
        }
    }
}

impl ScheduleSettings {
    /// Disables cascading.
    pub fn without_cascade(mut self) -> Self {
        self.cascade_changes = false;
        self
    }

    /// Sets the day anchor time.
    pub fn with_day_start(mut self, hhmm: impl Into<String>) -> Self {
        self.day_start_time = hhmm.into();
        self
    }

    /// Sets the fallback duration.
    pub fn with_default_duration(mut self, minutes: i32) -> Self {
        self.default_entry_duration_minutes = minutes;
        self
    }

    /// The day anchor in minutes since midnight.
    ///
    /// Falls back to 06:00 when `day_start_time` does not parse.
    pub fn day_anchor_min(&self) -> i32 {
        parse_time_to_minutes(&self.day_start_time).unwrap_or(DEFAULT_DAY_START_MIN)
    }

    /// The fallback duration, guarded against non-positive configuration.
    pub fn default_duration_min(&self) -> i32 {
        if self.default_entry_duration_minutes > 0 {
            self.default_entry_duration_minutes
        } else {
            DEFAULT_ENTRY_DURATION_MIN
        }
    }

    /// Effective duration of an entry: explicit positive duration, else
    /// the settings default.
    pub fn effective_duration(&self, entry: &ScheduleEntry) -> i32 {
        entry
            .explicit_duration()
            .unwrap_or_else(|| self.default_duration_min())
    }
}
