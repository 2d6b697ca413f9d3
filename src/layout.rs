//! Adaptive timeline layout.
//!
//! Segments a projected day into a render-ready sequence: banner
//! segments, labeled gaps, and dense blocks whose pixel density adapts
//! to how crowded each stretch of the day is.
//!
//! # Algorithm
//!
//! 1. Partition rows into unscheduled, banner, and timed.
//! 2. Merge timed `[start, end)` intervals whose gap is at most
//!    [`MERGE_TOLERANCE_MIN`] into windows (sort, then extend-or-push).
//! 3. Group each window's rows into per-track lanes.
//! 4. Pick a pixel rate from event density, scaled up to meet the
//!    minimum block height.
//! 5. Walk banners and blocks in start order, inserting labeled gaps;
//!    the cursor only ever advances, so overlapping-but-unmerged items
//!    never rewind it.

use serde::{Deserialize, Serialize};

use crate::models::{MinuteSpan, ProjectedRow, ScheduleProjection, ScheduleTrack};

/// Two intervals this close (minutes) render as one block.
pub const MERGE_TOLERANCE_MIN: i32 = 5;

/// Smallest rendered height of a dense block (px).
pub const MIN_BLOCK_HEIGHT_PX: i32 = 120;

/// Pixel rate for crowded windows (≥ 0.1 events/minute).
pub const DENSE_RATE_PX: i32 = 8;

/// Pixel rate for moderate windows (≥ 0.04 events/minute).
pub const MODERATE_RATE_PX: i32 = 6;

/// Pixel rate for sparse windows.
pub const SPARSE_RATE_PX: i32 = 4;

/// Base card height before metadata rows (px).
pub const CARD_BASE_HEIGHT_PX: i32 = 48;

/// Height of one metadata row on a card (px).
pub const CARD_META_ROW_HEIGHT_PX: i32 = 18;

/// At most this many metadata rows contribute to card height.
pub const MAX_CARD_META_ROWS: usize = 2;

/// Rows of one track within a dense block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackLane {
    /// Track id.
    pub track_id: String,
    /// Rows whose start falls inside the block's window.
    pub rows: Vec<ProjectedRow>,
}

/// One rendered stretch of the timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum TimelineSegment {
    /// A day-wide banner.
    Banner {
        /// The banner's projected row (start, duration, title).
        row: ProjectedRow,
    },
    /// Unscheduled time between anchors.
    Gap {
        /// The gap interval.
        span: MinuteSpan,
        /// Human label, e.g. `"45 min gap"` or `"1h 30m gap"`.
        label: String,
    },
    /// One or more near-adjacent intervals rendered together.
    DenseBlock {
        /// The merged window.
        span: MinuteSpan,
        /// Vertical scale for this block.
        pixels_per_minute: i32,
        /// Rows grouped by track, display order.
        lanes: Vec<TrackLane>,
    },
}

/// Complete adaptive layout of one projection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdaptiveLayout {
    /// Start-ordered segments.
    pub segments: Vec<TimelineSegment>,
    /// Track list, display order.
    pub tracks: Vec<ScheduleTrack>,
    /// Rows with no resolvable start time, excluded from the timeline.
    pub unscheduled_rows: Vec<ProjectedRow>,
}

/// Builds the adaptive timeline layout for a projection.
pub fn build_adaptive_layout(projection: &ScheduleProjection) -> AdaptiveLayout {
    let mut unscheduled: Vec<ProjectedRow> = Vec::new();
    let mut banners: Vec<&ProjectedRow> = Vec::new();
    let mut timed: Vec<&ProjectedRow> = Vec::new();

    for row in &projection.rows {
        if row.start_min.is_none() {
            unscheduled.push(row.clone());
        } else if row.is_banner {
            banners.push(row);
        } else {
            timed.push(row);
        }
    }

    let windows = merge_windows(&timed);
    let blocks: Vec<BlockParts> = windows
        .into_iter()
        .map(|window| build_block(window, &timed, &projection.tracks))
        .collect();

    // One start-ordered anchor sequence: banners first on ties so a
    // banner opening a block renders above it.
    enum Anchor<'a> {
        Banner(&'a ProjectedRow),
        Block(BlockParts),
    }
    let mut anchors: Vec<(i32, u8, Anchor)> = Vec::new();
    for banner in banners {
        let start = banner.start_min.unwrap_or_default();
        anchors.push((start, 0, Anchor::Banner(banner)));
    }
    for block in blocks {
        anchors.push((block.span.start_min, 1, Anchor::Block(block)));
    }
    anchors.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(&b.1)));

    let mut segments: Vec<TimelineSegment> = Vec::new();
    let mut cursor: Option<i32> = None;
    for (start, _, anchor) in anchors {
        if let Some(position) = cursor {
            if start > position {
                segments.push(TimelineSegment::Gap {
                    span: MinuteSpan::new(position, start),
                    label: gap_label(start - position),
                });
            }
        }
        let end = match &anchor {
            Anchor::Banner(row) => row.end_min.unwrap_or(start),
            Anchor::Block(parts) => parts.span.end_min,
        };
        // Never rewind past an earlier, longer item.
        cursor = Some(cursor.map_or(end, |position| position.max(end)));
        segments.push(match anchor {
            Anchor::Banner(row) => TimelineSegment::Banner { row: row.clone() },
            Anchor::Block(parts) => TimelineSegment::DenseBlock {
                span: parts.span,
                pixels_per_minute: parts.pixels_per_minute,
                lanes: parts.lanes,
            },
        });
    }

    AdaptiveLayout {
        segments,
        tracks: projection.tracks.clone(),
        unscheduled_rows: unscheduled,
    }
}

/// Minimum card height for a row with the given metadata row count.
pub fn compute_min_card_height(metadata_rows: usize) -> i32 {
    CARD_BASE_HEIGHT_PX + metadata_rows.min(MAX_CARD_META_ROWS) as i32 * CARD_META_ROW_HEIGHT_PX
}

/// Rendered card height: the natural (duration-scaled) height, floored
/// at the minimum.
pub fn compute_card_height(natural_height: i32, min_height: i32) -> i32 {
    natural_height.max(min_height)
}

/// Classic interval-merge sweep over the timed rows' spans.
fn merge_windows(timed: &[&ProjectedRow]) -> Vec<MinuteSpan> {
    let mut spans: Vec<MinuteSpan> = timed.iter().filter_map(|r| r.span()).collect();
    spans.sort_by(|a, b| {
        a.start_min
            .cmp(&b.start_min)
            .then_with(|| a.end_min.cmp(&b.end_min))
    });

    let mut windows: Vec<MinuteSpan> = Vec::new();
    for span in spans {
        match windows.last_mut() {
            Some(window) if window.gap_to(&span) <= MERGE_TOLERANCE_MIN => {
                window.end_min = window.end_min.max(span.end_min);
            }
            _ => windows.push(span),
        }
    }
    windows
}

/// A dense block before segment assembly.
struct BlockParts {
    span: MinuteSpan,
    pixels_per_minute: i32,
    lanes: Vec<TrackLane>,
}

fn build_block(window: MinuteSpan, timed: &[&ProjectedRow], tracks: &[ScheduleTrack]) -> BlockParts {
    let members: Vec<&ProjectedRow> = timed
        .iter()
        .copied()
        .filter(|r| r.start_min.is_some_and(|start| window.contains(start)))
        .collect();

    // Lanes in track display order; unknown tracks fall back to the
    // first known track.
    let mut lanes: Vec<TrackLane> = tracks
        .iter()
        .map(|t| TrackLane {
            track_id: t.id.clone(),
            rows: Vec::new(),
        })
        .collect();
    for row in &members {
        let lane = match lanes.iter().position(|l| l.track_id == row.track_id) {
            Some(index) => index,
            None if !lanes.is_empty() => 0,
            None => {
                lanes.push(TrackLane {
                    track_id: row.track_id.clone(),
                    rows: Vec::new(),
                });
                0
            }
        };
        lanes[lane].rows.push((*row).clone());
    }
    lanes.retain(|l| !l.rows.is_empty());

    BlockParts {
        span: window,
        pixels_per_minute: block_rate(members.len(), window.duration_minutes()),
        lanes,
    }
}

/// Density-tiered pixel rate, scaled up to the minimum block height.
fn block_rate(event_count: usize, duration_minutes: i32) -> i32 {
    let duration = duration_minutes.max(1);
    let events_per_minute = event_count as f64 / f64::from(duration);
    let natural = if events_per_minute >= 0.1 {
        DENSE_RATE_PX
    } else if events_per_minute >= 0.04 {
        MODERATE_RATE_PX
    } else {
        SPARSE_RATE_PX
    };

    if natural * duration < MIN_BLOCK_HEIGHT_PX {
        // ceil(min_height / duration)
        (MIN_BLOCK_HEIGHT_PX + duration - 1) / duration
    } else {
        natural
    }
}

fn gap_label(minutes: i32) -> String {
    if minutes < 60 {
        return format!("{minutes} min gap");
    }
    let (hours, rem) = (minutes / 60, minutes % 60);
    if rem == 0 {
        format!("{hours}h gap")
    } else {
        format!("{hours}h {rem}m gap")
    }
}
