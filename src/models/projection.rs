//! Projected schedule output types.
//!
//! A projection is the canonical, ephemeral view of a schedule: every
//! entry annotated with its resolved track, banner/applicability
//! classification, and derived times. Recomputed on every call, never
//! cached, never written back.

use serde::{Deserialize, Serialize};

use super::{MinuteSpan, ScheduleEntry, ScheduleTrack};

/// Row ordering of a projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectionMode {
    /// Sort by resolved start time (absent last), track display order,
    /// order, id.
    Time,
    /// Sort by (order, id) only.
    Sequence,
}

/// Where a row's start time came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeSource {
    /// The entry carries its own parseable time.
    Explicit,
    /// Assigned by the projector's cursor walk or day anchor.
    Derived,
    /// No time could be resolved.
    None,
}

/// How broadly an entry applies across tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Applicability {
    /// Broadcast across every track (banner).
    All,
    /// Explicitly scoped to several, but not all, tracks.
    Subset,
    /// Explicitly scoped to exactly one track.
    Single,
    /// No explicit scope; confined to its resolved track.
    None,
}

/// One entry annotated with its projected state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectedRow {
    /// The source entry (copied; inputs are never mutated).
    pub entry: ScheduleEntry,
    /// Resolved track id.
    pub track_id: String,
    /// Cross-track applicability classification.
    pub applicability: Applicability,
    /// Whether this row is a banner.
    pub is_banner: bool,
    /// Derived start (minutes since midnight).
    pub start_min: Option<i32>,
    /// Derived end (minutes since midnight).
    pub end_min: Option<i32>,
    /// Effective duration used to derive the end.
    pub duration_minutes: Option<i32>,
    /// Provenance of the start time.
    pub time_source: TimeSource,
}

impl ProjectedRow {
    /// The row's `[start, end)` interval, when both bounds resolved.
    pub fn span(&self) -> Option<MinuteSpan> {
        match (self.start_min, self.end_min) {
            (Some(start), Some(end)) => Some(MinuteSpan::new(start, end)),
            _ => None,
        }
    }
}

/// Complete projection of one schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleProjection {
    /// Normalized track list, display order.
    pub tracks: Vec<ScheduleTrack>,
    /// Projected rows, one per input entry, in mode order.
    pub rows: Vec<ProjectedRow>,
}

impl ScheduleProjection {
    /// Rows on a given track (banners excluded).
    pub fn rows_for_track(&self, track_id: &str) -> Vec<&ProjectedRow> {
        self.rows
            .iter()
            .filter(|r| !r.is_banner && r.track_id == track_id)
            .collect()
    }

    /// Banner rows.
    pub fn banner_rows(&self) -> Vec<&ProjectedRow> {
        self.rows.iter().filter(|r| r.is_banner).collect()
    }
}
