//! Entry patch output model.
//!
//! The cascade engine never writes anywhere; it returns a list of
//! [`EntryPatch`] records for an external persistence collaborator to
//! merge into its stored entries (that collaborator stamps its own
//! update metadata). Patches targeting the same entry are always
//! coalesced into one record before being returned; later writes win
//! per field.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Patchable entry fields. Only fields actually written are serialized.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PatchFields {
    /// New secondary sort key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<i32>,
    /// New start time. Canonical `HH:MM` when derived by the engine;
    /// verbatim caller text for non-time overrides.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    /// New duration in minutes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<i32>,
    /// New owning track.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub track_id: Option<String>,
}

impl PatchFields {
    /// Whether no field is written.
    pub fn is_empty(&self) -> bool {
        self.order.is_none()
            && self.start_time.is_none()
            && self.duration.is_none()
            && self.track_id.is_none()
    }
}

/// A field patch proposal for one entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryPatch {
    /// Target entry.
    pub entry_id: String,
    /// Fields to merge into the stored entry.
    pub patch: PatchFields,
}

/// Accumulates patches with per-entry coalescing.
///
/// Emission order is first-touch order, which keeps patch lists
/// deterministic for a given edit.
#[derive(Debug, Clone, Default)]
pub struct PatchSet {
    patches: IndexMap<String, PatchFields>,
}

impl PatchSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Writes an order value for an entry.
    pub fn set_order(&mut self, entry_id: &str, order: i32) {
        self.fields_mut(entry_id).order = Some(order);
    }

    /// Writes a start time for an entry.
    pub fn set_start_time(&mut self, entry_id: &str, start_time: impl Into<String>) {
        self.fields_mut(entry_id).start_time = Some(start_time.into());
    }

    /// Writes a duration for an entry.
    pub fn set_duration(&mut self, entry_id: &str, duration: i32) {
        self.fields_mut(entry_id).duration = Some(duration);
    }

    /// Writes a track id for an entry.
    pub fn set_track_id(&mut self, entry_id: &str, track_id: impl Into<String>) {
        self.fields_mut(entry_id).track_id = Some(track_id.into());
    }

    /// Whether no patch has been written.
    pub fn is_empty(&self) -> bool {
        self.patches.is_empty()
    }

    /// Number of patched entries.
    pub fn len(&self) -> usize {
        self.patches.len()
    }

    /// Drains into the output contract, one record per entry.
    pub fn into_patches(self) -> Vec<EntryPatch> {
        self.patches
            .into_iter()
            .map(|(entry_id, patch)| EntryPatch { entry_id, patch })
            .collect()
    }

    fn fields_mut(&mut self, entry_id: &str) -> &mut PatchFields {
        self.patches.entry(entry_id.to_string()).or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coalesces_same_entry() {
        let mut set = PatchSet::new();
        set.set_order("e1", 2);
        set.set_start_time("e1", "06:15");
        set.set_order("e2", 0);

        let patches = set.into_patches();
        assert_eq!(patches.len(), 2);
        assert_eq!(patches[0].entry_id, "e1");
        assert_eq!(patches[0].patch.order, Some(2));
        assert_eq!(patches[0].patch.start_time.as_deref(), Some("06:15"));
        assert_eq!(patches[1].entry_id, "e2");
    }

    #[test]
    fn test_later_write_wins_per_field() {
        let mut set = PatchSet::new();
        set.set_start_time("e1", "06:00");
        set.set_start_time("e1", "06:30");

        let patches = set.into_patches();
        assert_eq!(patches.len(), 1);
        assert_eq!(patches[0].patch.start_time.as_deref(), Some("06:30"));
    }

    #[test]
    fn test_emission_is_first_touch_order() {
        let mut set = PatchSet::new();
        set.set_order("b", 1);
        set.set_order("a", 0);
        set.set_duration("b", 30);

        let ids: Vec<String> = set
            .into_patches()
            .into_iter()
            .map(|p| p.entry_id)
            .collect();
        assert_eq!(ids, ["b", "a"]);
    }

    #[test]
    fn test_patch_serializes_only_written_fields() {
        let mut set = PatchSet::new();
        set.set_track_id("e1", "unit-b");
        set.set_order("e1", 1);

        let patches = set.into_patches();
        let json = serde_json::to_value(&patches[0]).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "entryId": "e1",
                "patch": {"order": 1, "trackId": "unit-b"}
            })
        );
    }

    #[test]
    fn test_empty_set() {
        let set = PatchSet::new();
        assert!(set.is_empty());
        assert_eq!(set.len(), 0);
        assert!(set.into_patches().is_empty());
    }
}
