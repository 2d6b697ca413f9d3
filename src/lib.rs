//! Shooting-day schedule engine for the U-Engine ecosystem.
//!
//! Pure, in-memory computations over a stripboard-style schedule:
//! entries (shots, setups, breaks, moves, banners) distributed across
//! parallel unit tracks are turned into a canonical time projection,
//! minimal patch sets for structural edits, overlap-conflict reports,
//! and an adaptive visual timeline layout.
//!
//! # Modules
//!
//! - **`timecode`**: Time-of-day parsing, formatting, and input
//!   classification — the leaf everything else resolves times through
//! - **`models`**: Domain types — `ScheduleEntry`, `ScheduleTrack`,
//!   `ScheduleSettings`, `ProjectedRow`, `EntryPatch`, `MinuteSpan`
//! - **`projector`**: Canonical time projection (per-track cursor walk)
//! - **`conflict`**: Per-track overlap detection (adjacent-pair sweep)
//! - **`cascade`**: Minimal-diff patch planning for reorders, time and
//!   duration edits, and moves between tracks
//! - **`layout`**: Adaptive timeline segmentation with density-scaled
//!   pixel rates
//! - **`stats`**: Day-level summary metrics
//!
//! # Architecture
//!
//! Every operation is a synchronous, side-effect-free function over
//! immutable-in-effect inputs: no I/O, no retries, no shared state
//! between calls. Degraded input never fails — unparseable times,
//! unknown tracks, and malformed settings all default silently.
//! Persistence, rendering, and call-sheet generation are external
//! collaborators that consume the output types read-only.
//!
//! # References
//!
//! - Cormen et al. (2009), "Introduction to Algorithms", Ch. 16
//!   (interval scheduling and merging)

pub mod cascade;
pub mod conflict;
pub mod layout;
pub mod models;
pub mod projector;
pub mod stats;
pub mod timecode;
