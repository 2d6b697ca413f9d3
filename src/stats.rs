//! Day-level schedule metrics.
//!
//! Computes summary numbers from a finished projection: call and wrap
//! times, scheduled work, idle time, per-track load. Read-only over the
//! projection, like everything else in the engine.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | First call | Earliest projected start |
//! | Estimated wrap | Latest projected end |
//! | Span | Wrap minus first call |
//! | Scheduled | Sum of non-banner durations |
//! | Idle | Span not covered by scheduled work (floored at 0) |
//! | Utilization | Per-track busy time over the day span |

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::models::{EntryType, ScheduleProjection};

/// Summary metrics for one projected day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleStats {
    /// Earliest projected start (minutes since midnight).
    pub first_call_min: Option<i32>,
    /// Latest projected end (minutes since midnight).
    pub estimated_wrap_min: Option<i32>,
    /// Wrap minus first call.
    pub span_minutes: i32,
    /// Total non-banner scheduled minutes across all tracks.
    pub scheduled_minutes: i32,
    /// Span minutes not covered by scheduled work, floored at zero
    /// (parallel tracks can schedule more than the span).
    pub idle_minutes: i32,
    /// Entry counts by kind.
    pub entry_counts: IndexMap<EntryType, usize>,
    /// Busy minutes per track (banners excluded).
    pub busy_minutes_by_track: IndexMap<String, i32>,
    /// Busy time over day span per track (0.0..1.0), zero-span days
    /// report zero.
    pub utilization_by_track: IndexMap<String, f64>,
}

impl ScheduleStats {
    /// Computes stats from a projection.
    pub fn calculate(projection: &ScheduleProjection) -> Self {
        let first_call_min = projection.rows.iter().filter_map(|r| r.start_min).min();
        let estimated_wrap_min = projection.rows.iter().filter_map(|r| r.end_min).max();
        let span_minutes = match (first_call_min, estimated_wrap_min) {
            (Some(call), Some(wrap)) => (wrap - call).max(0),
            _ => 0,
        };

        let mut entry_counts: IndexMap<EntryType, usize> = IndexMap::new();
        let mut busy_minutes_by_track: IndexMap<String, i32> = projection
            .tracks
            .iter()
            .map(|t| (t.id.clone(), 0))
            .collect();
        let mut scheduled_minutes = 0;

        for row in &projection.rows {
            *entry_counts.entry(row.entry.entry_type).or_insert(0) += 1;
            if row.is_banner {
                continue;
            }
            let duration = row.duration_minutes.unwrap_or(0);
            scheduled_minutes += duration;
            *busy_minutes_by_track
                .entry(row.track_id.clone())
                .or_insert(0) += duration;
        }

        let utilization_by_track = busy_minutes_by_track
            .iter()
            .map(|(id, &busy)| {
                let utilization = if span_minutes > 0 {
                    f64::from(busy) / f64::from(span_minutes)
                } else {
                    0.0
                };
                (id.clone(), utilization)
            })
            .collect();

        Self {
            first_call_min,
            estimated_wrap_min,
            span_minutes,
            scheduled_minutes,
            idle_minutes: (span_minutes - scheduled_minutes).max(0),
            entry_counts,
            busy_minutes_by_track,
            utilization_by_track,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        EntryType, ProjectionMode, ScheduleEntry, ScheduleSettings, ScheduleTrack,
    };
    use crate::projector::project;

    fn sample_projection() -> ScheduleProjection {
        let tracks = vec![
            ScheduleTrack::new("primary").with_name("Main Unit"),
            ScheduleTrack::new("unit-b").with_name("Second Unit").with_order(1),
        ];
        let entries = vec![
            ScheduleEntry::new("crew-call", EntryType::Banner)
                .with_order(0)
                .with_start_time("06:00")
                .with_duration(15),
            ScheduleEntry::new("s1", EntryType::Shot)
                .with_order(1)
                .with_track("primary")
                .with_start_time("06:30")
                .with_duration(90),
            ScheduleEntry::new("lunch", EntryType::Break)
                .with_order(2)
                .with_track("primary")
                .with_start_time("12:00")
                .with_duration(60),
            ScheduleEntry::new("s2", EntryType::Shot)
                .with_order(1)
                .with_track("unit-b")
                .with_start_time("07:00")
                .with_duration(120),
        ];
        project(
            &entries,
            &tracks,
            &ScheduleSettings::default(),
            ProjectionMode::Time,
        )
    }

    #[test]
    fn test_call_and_wrap() {
        let stats = ScheduleStats::calculate(&sample_projection());
        assert_eq!(stats.first_call_min, Some(360)); // crew call banner
        assert_eq!(stats.estimated_wrap_min, Some(780)); // lunch ends 13:00
        assert_eq!(stats.span_minutes, 420);
    }

    #[test]
    fn test_scheduled_excludes_banners() {
        let stats = ScheduleStats::calculate(&sample_projection());
        assert_eq!(stats.scheduled_minutes, 90 + 60 + 120);
        assert_eq!(stats.idle_minutes, 420 - 270);
    }

    #[test]
    fn test_entry_counts() {
        let stats = ScheduleStats::calculate(&sample_projection());
        assert_eq!(stats.entry_counts[&EntryType::Shot], 2);
        assert_eq!(stats.entry_counts[&EntryType::Break], 1);
        assert_eq!(stats.entry_counts[&EntryType::Banner], 1);
    }

    #[test]
    fn test_per_track_busy_and_utilization() {
        let stats = ScheduleStats::calculate(&sample_projection());
        assert_eq!(stats.busy_minutes_by_track["primary"], 150);
        assert_eq!(stats.busy_minutes_by_track["unit-b"], 120);

        let primary = stats.utilization_by_track["primary"];
        assert!((primary - 150.0 / 420.0).abs() < 1e-10);
    }

    #[test]
    fn test_empty_projection() {
        let projection = project(
            &[],
            &[],
            &ScheduleSettings::default(),
            ProjectionMode::Time,
        );
        let stats = ScheduleStats::calculate(&projection);
        assert_eq!(stats.first_call_min, None);
        assert_eq!(stats.span_minutes, 0);
        assert_eq!(stats.scheduled_minutes, 0);
        assert_eq!(stats.utilization_by_track["primary"], 0.0);
    }
}
