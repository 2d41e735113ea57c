//! The image tray: an ordered collection of uploaded images with selection
//! and active-image state.
//!
//! All mutation funnels through the transition methods on [`Tray`], so the
//! state machine is testable without any UI:
//!
//! - upload → [`Tray::insert_batch`] (append, auto-activate if nothing active)
//! - toggle-select → [`Tray::toggle_selected`]
//! - toggle-select-all → [`Tray::toggle_select_all`] (full → empty, else → full)
//! - select → [`Tray::activate`]
//! - remove → [`Tray::remove`] (active reassignment + selection drop)
//! - reset → [`Tray::reset`] (clears records, active, and selection atomically)
//!
//! Invariants held across every transition: record ids are unique; the active
//! id, if set, refers to a present record; the selection set is a subset of
//! present ids.

use crate::source::DataRef;
use serde::Serialize;
use std::collections::HashSet;
use std::time::{SystemTime, UNIX_EPOCH};

/// Milliseconds since the Unix epoch, used for record ids and export names.
pub(crate) fn epoch_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0)
}

/// One uploaded image and its derived state.
#[derive(Debug, Clone, Serialize)]
pub struct ImageRecord {
    /// Unique id: `<name>-<epoch_ms>-<counter>`. The counter is per-tray, so
    /// duplicate filenames uploaded in the same batch still get distinct ids.
    pub id: String,
    /// Original filename, immutable.
    pub name: String,
    /// The unmodified upload. Immutable after creation.
    pub original: DataRef,
    /// Latest transform result. Overwritten (not accumulated) on each
    /// successful resize or crop; at most one processed variant per record.
    pub processed: Option<DataRef>,
}

/// Ordered image collection plus selection set and active pointer.
#[derive(Debug, Default)]
pub struct Tray {
    records: Vec<ImageRecord>,
    active: Option<String>,
    selected: HashSet<String>,
    next_index: u64,
}

/// Serializable snapshot of tray state for `inspect --json`.
#[derive(Debug, Serialize)]
pub struct TrayManifest {
    pub records: Vec<RecordSummary>,
    pub active: Option<String>,
    pub selected: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct RecordSummary {
    pub id: String,
    pub name: String,
    pub processed: bool,
}

impl Tray {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[ImageRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn active_id(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn active(&self) -> Option<&ImageRecord> {
        let id = self.active.as_deref()?;
        self.records.iter().find(|r| r.id == id)
    }

    pub fn selected_ids(&self) -> &HashSet<String> {
        &self.selected
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.contains(id)
    }

    pub fn has_processed(&self) -> bool {
        self.records.iter().any(|r| r.processed.is_some())
    }

    /// Append a batch of uploads in order and return their ids. If nothing
    /// was active, the first new record becomes active.
    pub fn insert_batch(&mut self, uploads: Vec<(String, DataRef)>) -> Vec<String> {
        let timestamp = epoch_millis();
        let mut ids = Vec::with_capacity(uploads.len());

        for (name, original) in uploads {
            let id = format!("{name}-{timestamp}-{}", self.next_index);
            self.next_index += 1;
            ids.push(id.clone());
            self.records.push(ImageRecord {
                id,
                name,
                original,
                processed: None,
            });
        }

        if self.active.is_none() {
            if let Some(first) = ids.first() {
                self.active = Some(first.clone());
            }
        }
        ids
    }

    /// Flip one id's selection membership. Unknown ids are ignored.
    pub fn toggle_selected(&mut self, id: &str) {
        if !self.records.iter().any(|r| r.id == id) {
            return;
        }
        if !self.selected.remove(id) {
            self.selected.insert(id.to_string());
        }
    }

    /// Select-all toggle: when every record is already selected the selection
    /// empties; in any other state it becomes the full set of present ids.
    pub fn toggle_select_all(&mut self) {
        if !self.records.is_empty() && self.selected.len() == self.records.len() {
            self.selected.clear();
        } else {
            self.selected = self.records.iter().map(|r| r.id.clone()).collect();
        }
    }

    /// Point the active marker at a present record. Unknown ids are ignored.
    pub fn activate(&mut self, id: &str) {
        if self.records.iter().any(|r| r.id == id) {
            self.active = Some(id.to_string());
        }
    }

    /// Remove a record. If it was active, the first remaining record (in tray
    /// order) becomes active, or none if the tray empties. The id is
    /// unconditionally dropped from the selection.
    pub fn remove(&mut self, id: &str) {
        self.records.retain(|r| r.id != id);
        self.selected.remove(id);
        if self.active.as_deref() == Some(id) {
            self.active = self.records.first().map(|r| r.id.clone());
        }
    }

    /// Clear records, active pointer, and selection in one transition.
    pub fn reset(&mut self) {
        self.records.clear();
        self.active = None;
        self.selected.clear();
    }

    /// Assign one record's processed variant, replacing any previous result.
    pub fn set_processed(&mut self, id: &str, processed: DataRef) {
        if let Some(record) = self.records.iter_mut().find(|r| r.id == id) {
            record.processed = Some(processed);
        }
    }

    /// Reconcile a completed batch in a single pass. The concurrent phase
    /// never touches the tray; this is the only write-back point.
    pub fn apply_processed(&mut self, updates: Vec<(String, DataRef)>) {
        for (id, processed) in updates {
            self.set_processed(&id, processed);
        }
    }

    pub fn manifest(&self) -> TrayManifest {
        let mut selected: Vec<String> = self.selected.iter().cloned().collect();
        selected.sort();
        TrayManifest {
            records: self
                .records
                .iter()
                .map(|r| RecordSummary {
                    id: r.id.clone(),
                    name: r.name.clone(),
                    processed: r.processed.is_some(),
                })
                .collect(),
            active: self.active.clone(),
            selected,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upload(name: &str) -> (String, DataRef) {
        (name.to_string(), DataRef::jpeg(name.as_bytes()))
    }

    fn tray_with(names: &[&str]) -> (Tray, Vec<String>) {
        let mut tray = Tray::new();
        let ids = tray.insert_batch(names.iter().map(|n| upload(n)).collect());
        (tray, ids)
    }

    #[test]
    fn insert_appends_in_upload_order() {
        let (tray, ids) = tray_with(&["a.jpg", "b.jpg", "c.jpg"]);
        let names: Vec<&str> = tray.records().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["a.jpg", "b.jpg", "c.jpg"]);
        assert_eq!(tray.records()[0].id, ids[0]);
    }

    #[test]
    fn duplicate_names_in_one_batch_get_unique_ids() {
        let (_, ids) = tray_with(&["same.jpg", "same.jpg"]);
        assert_ne!(ids[0], ids[1]);
    }

    #[test]
    fn ids_stay_unique_across_batches() {
        let (mut tray, first) = tray_with(&["a.jpg"]);
        let second = tray.insert_batch(vec![upload("a.jpg")]);
        assert_ne!(first[0], second[0]);
    }

    #[test]
    fn first_upload_auto_activates() {
        let (tray, ids) = tray_with(&["a.jpg", "b.jpg"]);
        assert_eq!(tray.active_id(), Some(ids[0].as_str()));
    }

    #[test]
    fn later_uploads_do_not_steal_active() {
        let (mut tray, ids) = tray_with(&["a.jpg"]);
        tray.insert_batch(vec![upload("b.jpg")]);
        assert_eq!(tray.active_id(), Some(ids[0].as_str()));
    }

    #[test]
    fn toggle_selected_flips_membership() {
        let (mut tray, ids) = tray_with(&["a.jpg"]);
        tray.toggle_selected(&ids[0]);
        assert!(tray.is_selected(&ids[0]));
        tray.toggle_selected(&ids[0]);
        assert!(!tray.is_selected(&ids[0]));
    }

    #[test]
    fn toggle_selected_ignores_unknown_id() {
        let (mut tray, _) = tray_with(&["a.jpg"]);
        tray.toggle_selected("ghost");
        assert!(tray.selected_ids().is_empty());
    }

    #[test]
    fn select_all_from_empty_selects_everything() {
        let (mut tray, ids) = tray_with(&["a.jpg", "b.jpg", "c.jpg"]);
        tray.toggle_select_all();
        assert_eq!(tray.selected_ids().len(), 3);
        assert!(ids.iter().all(|id| tray.is_selected(id)));
    }

    #[test]
    fn select_all_from_full_clears() {
        let (mut tray, _) = tray_with(&["a.jpg", "b.jpg"]);
        tray.toggle_select_all();
        tray.toggle_select_all();
        assert!(tray.selected_ids().is_empty());
    }

    #[test]
    fn select_all_from_partial_completes_the_set() {
        // A toggle, not a monotonic union: partial state jumps to full
        let (mut tray, ids) = tray_with(&["a.jpg", "b.jpg", "c.jpg"]);
        tray.toggle_selected(&ids[1]);
        tray.toggle_select_all();
        assert_eq!(tray.selected_ids().len(), 3);
    }

    #[test]
    fn select_all_double_application_returns_to_start() {
        let (mut tray, ids) = tray_with(&["a.jpg", "b.jpg"]);
        tray.toggle_selected(&ids[0]);

        // partial → full → empty; empty → full → empty: two applications
        // from any non-full state end empty, from full end full
        tray.toggle_select_all();
        tray.toggle_select_all();
        assert!(tray.selected_ids().is_empty());
    }

    #[test]
    fn remove_active_reassigns_to_first_remaining() {
        let (mut tray, ids) = tray_with(&["a.jpg", "b.jpg", "c.jpg"]);
        tray.activate(&ids[1]);
        tray.remove(&ids[1]);
        assert_eq!(tray.active_id(), Some(ids[0].as_str()));
        assert_eq!(tray.len(), 2);
    }

    #[test]
    fn remove_only_record_clears_active() {
        let (mut tray, ids) = tray_with(&["a.jpg"]);
        tray.remove(&ids[0]);
        assert_eq!(tray.active_id(), None);
        assert!(tray.is_empty());
    }

    #[test]
    fn remove_non_active_leaves_active_unchanged() {
        let (mut tray, ids) = tray_with(&["a.jpg", "b.jpg"]);
        tray.remove(&ids[1]);
        assert_eq!(tray.active_id(), Some(ids[0].as_str()));
    }

    #[test]
    fn remove_drops_id_from_selection() {
        let (mut tray, ids) = tray_with(&["a.jpg", "b.jpg"]);
        tray.toggle_select_all();
        tray.remove(&ids[0]);
        assert!(!tray.is_selected(&ids[0]));
        assert_eq!(tray.selected_ids().len(), 1);
    }

    #[test]
    fn activate_ignores_absent_id() {
        let (mut tray, ids) = tray_with(&["a.jpg"]);
        tray.activate("ghost");
        assert_eq!(tray.active_id(), Some(ids[0].as_str()));
    }

    #[test]
    fn reset_clears_everything_atomically() {
        let (mut tray, ids) = tray_with(&["a.jpg", "b.jpg"]);
        tray.toggle_select_all();
        tray.set_processed(&ids[0], DataRef::jpeg(b"out"));

        tray.reset();
        assert!(tray.is_empty());
        assert_eq!(tray.active_id(), None);
        assert!(tray.selected_ids().is_empty());
    }

    #[test]
    fn set_processed_replaces_previous_variant() {
        let (mut tray, ids) = tray_with(&["a.jpg"]);
        tray.set_processed(&ids[0], DataRef::jpeg(b"first"));
        tray.set_processed(&ids[0], DataRef::jpeg(b"second"));

        let processed = tray.records()[0].processed.as_ref().unwrap();
        assert_eq!(processed.to_bytes().unwrap(), b"second");
    }

    #[test]
    fn apply_processed_updates_in_one_pass() {
        let (mut tray, ids) = tray_with(&["a.jpg", "b.jpg", "c.jpg"]);
        tray.apply_processed(vec![
            (ids[0].clone(), DataRef::jpeg(b"a-out")),
            (ids[2].clone(), DataRef::jpeg(b"c-out")),
        ]);

        assert!(tray.records()[0].processed.is_some());
        assert!(tray.records()[1].processed.is_none());
        assert!(tray.records()[2].processed.is_some());
    }

    #[test]
    fn manifest_reflects_state() {
        let (mut tray, ids) = tray_with(&["b.jpg", "a.jpg"]);
        tray.toggle_selected(&ids[1]);
        tray.set_processed(&ids[0], DataRef::jpeg(b"out"));

        let manifest = tray.manifest();
        assert_eq!(manifest.records.len(), 2);
        assert!(manifest.records[0].processed);
        assert!(!manifest.records[1].processed);
        assert_eq!(manifest.active.as_deref(), Some(ids[0].as_str()));
        assert_eq!(manifest.selected, vec![ids[1].clone()]);
    }
}
