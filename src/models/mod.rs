//! Schedule domain models.
//!
//! Core data types for the shooting-day board: entries (strips), unit
//! tracks, settings, and the ephemeral output shapes every engine call
//! freshly constructs (projections, patches, spans).
//!
//! # Ownership
//!
//! The caller owns entries, tracks, and settings; the engine borrows
//! them read-only and returns newly allocated results. Nothing in this
//! module mutates its inputs.

mod entry;
mod patch;
mod projection;
mod settings;
mod span;
mod track;

pub use entry::{EntryType, ScheduleEntry, SHARED_TRACK_MARKERS};
pub use patch::{EntryPatch, PatchFields, PatchSet};
pub use projection::{Applicability, ProjectedRow, ProjectionMode, ScheduleProjection, TimeSource};
pub use settings::{ScheduleSettings, DEFAULT_DAY_START_MIN, DEFAULT_ENTRY_DURATION_MIN};
pub use span::MinuteSpan;
pub use track::{
    normalize_tracks, resolve_track_id, track_id_set, ScheduleTrack, PRIMARY_TRACK_ID,
};
