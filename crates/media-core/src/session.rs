//! Single owner of the collection, the selection and the load status.
//!
//! All state transitions are synchronous; async work (loads, deletes) runs
//! elsewhere and its results are applied here. Every transition that shrinks
//! or replaces the collection prunes the selection in the same step, so the
//! selection never names a record that is not in the collection.

use std::collections::HashSet;

use tracing::{debug, error};

use crate::deletion::BatchOutcome;
use crate::distribution::{self, ChannelField, ChannelList, Distribution, RecordField};
use crate::error::StoreError;
use crate::record::{Record, RecordId};
use crate::selection::Selection;

/// Load status reported to the view.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum LoadStatus {
    /// Nothing requested yet.
    #[default]
    Idle,
    Loading,
    Ready,
    Failed(StoreError),
}

impl LoadStatus {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Loading => "loading",
            Self::Ready => "ready",
            Self::Failed(_) => "failed",
        }
    }
}

#[derive(Debug, Default)]
pub struct FileSession {
    collection: Vec<Record>,
    selection: Selection,
    status: LoadStatus,
    initialized: bool,
}

impl FileSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn collection(&self) -> &[Record] {
        &self.collection
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn status(&self) -> &LoadStatus {
        &self.status
    }

    pub fn is_loading(&self) -> bool {
        self.status == LoadStatus::Loading
    }

    pub fn record(&self, id: RecordId) -> Option<&Record> {
        self.collection.iter().find(|r| r.id == id)
    }

    /// Ids of the collection in display order.
    pub fn visible_ids(&self) -> Vec<RecordId> {
        self.collection.iter().map(|r| r.id).collect()
    }

    /// Flip the one-shot initialization flag. Returns `false` if the session
    /// was already initialized.
    pub fn mark_initialized(&mut self) -> bool {
        !std::mem::replace(&mut self.initialized, true)
    }

    /// Enter `Loading`. Returns `false`, leaving state untouched, if a load
    /// is already in flight.
    pub fn begin_load(&mut self) -> bool {
        if self.is_loading() {
            debug!("load already in flight; ignoring reload request");
            return false;
        }
        self.status = LoadStatus::Loading;
        true
    }

    /// Apply the result of a full load. On failure nothing stale is kept.
    pub fn finish_load(&mut self, result: Result<Vec<Record>, StoreError>) {
        match result {
            Ok(records) => {
                self.collection = records;
                self.prune_selection();
                self.status = LoadStatus::Ready;
            }
            Err(e) => {
                error!("collection load failed: {}", e);
                self.collection.clear();
                self.selection.clear();
                self.status = LoadStatus::Failed(e);
            }
        }
    }

    /// Toggle `id`; ids that are not in the collection are ignored.
    pub fn toggle(&mut self, id: RecordId) {
        if self.collection.iter().any(|r| r.id == id) {
            self.selection.toggle(id);
        }
    }

    pub fn toggle_all(&mut self) {
        let visible = self.visible_ids();
        self.selection.toggle_all(&visible);
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Remove `ids` from both collection and selection.
    pub fn remove_records(&mut self, ids: &[RecordId]) {
        let doomed: HashSet<RecordId> = ids.iter().copied().collect();
        self.collection.retain(|r| !doomed.contains(&r.id));
        self.selection.remove(ids);
    }

    /// Reconcile after a batch delete: every requested id is purged locally,
    /// including ones whose deletion did not confirm.
    pub fn apply_batch(&mut self, outcome: &BatchOutcome) {
        self.remove_records(&outcome.requested);
    }

    /// Reconcile after a delete-all: the local view is dropped wholesale
    /// whatever the per-id outcome was. A load still in flight keeps the
    /// session in `Loading` so the reload guard stays closed.
    pub fn apply_delete_all(&mut self) {
        self.collection.clear();
        self.selection.clear();
        if !self.is_loading() {
            self.status = LoadStatus::Ready;
        }
    }

    pub fn distribution(&self, field: RecordField) -> Distribution {
        distribution::distribution(&self.collection, field)
    }

    pub fn nested_distribution(&self, list: ChannelList, field: ChannelField) -> Distribution {
        distribution::nested_distribution(&self.collection, list, field)
    }

    fn prune_selection(&mut self) {
        let present: HashSet<RecordId> = self.collection.iter().map(|r| r.id).collect();
        self.selection.retain(&present);
    }
}
