//! Controller tying the session to the loader and the deletion coordinator.

use std::sync::Arc;

use tracing::{debug, info};

use crate::config::CollectionConfig;
use crate::deletion::{BatchOutcome, DeletionCoordinator};
use crate::distribution::{ChannelField, ChannelList, Distribution, RecordField};
use crate::error::{CollectionError, StoreError};
use crate::loader::CollectionLoader;
use crate::record::{Record, RecordId};
use crate::session::FileSession;
use crate::store::RecordStore;

pub struct FileManager<S> {
    session: FileSession,
    loader: CollectionLoader<S>,
    deleter: DeletionCoordinator<S>,
}

impl<S: RecordStore + 'static> FileManager<S> {
    pub fn new(store: Arc<S>, config: &CollectionConfig) -> Self {
        let loader = CollectionLoader::new(store, config.effective_page_size());
        let deleter = DeletionCoordinator::new(loader.clone(), config.effective_delete_concurrency());
        Self {
            session: FileSession::new(),
            loader,
            deleter,
        }
    }

    pub fn session(&self) -> &FileSession {
        &self.session
    }

    /// For owners that run loads/deletes in background tasks and apply the
    /// results themselves.
    pub fn session_mut(&mut self) -> &mut FileSession {
        &mut self.session
    }

    pub fn loader(&self) -> &CollectionLoader<S> {
        &self.loader
    }

    pub fn deleter(&self) -> &DeletionCoordinator<S> {
        &self.deleter
    }

    /// First load of the session. Later calls do nothing.
    pub async fn initialize(&mut self) -> Result<(), StoreError> {
        if !self.session.mark_initialized() {
            debug!("session already initialized");
            return Ok(());
        }
        self.reload().await
    }

    /// Replace the collection with a fresh full load.
    pub async fn reload(&mut self) -> Result<(), StoreError> {
        if !self.session.begin_load() {
            return Ok(());
        }
        let result = self.loader.load_all().await;
        let outcome = result.as_ref().map(|_| ()).map_err(|e| e.clone());
        self.session.finish_load(result);
        outcome
    }

    pub fn toggle(&mut self, id: RecordId) {
        self.session.toggle(id);
    }

    pub fn toggle_all(&mut self) {
        self.session.toggle_all();
    }

    pub fn clear_selection(&mut self) {
        self.session.clear_selection();
    }

    /// Delete `ids` remotely and purge all of them locally. A partial
    /// failure is reported after the purge; re-`reload` to reconcile.
    pub async fn delete_many(&mut self, ids: &[RecordId]) -> Result<BatchOutcome, CollectionError> {
        let outcome = self.deleter.delete_many(ids).await;
        self.session.apply_batch(&outcome);
        outcome.into_result()
    }

    pub async fn delete_selected(&mut self) -> Result<BatchOutcome, CollectionError> {
        let ids = self.session.selection().ids();
        self.delete_many(&ids).await
    }

    /// Delete everything the service holds and empty the local view. If the
    /// authoritative id fetch fails, nothing is deleted and the view is kept.
    pub async fn delete_all(&mut self) -> Result<BatchOutcome, CollectionError> {
        let outcome = self.deleter.delete_all().await?;
        self.session.apply_delete_all();
        info!("collection cleared");
        outcome.into_result()
    }

    /// Delete a single record, e.g. from a detail view. The collection is
    /// left alone.
    pub async fn delete_single(&self, id: RecordId) -> Result<(), StoreError> {
        self.deleter.delete_single(id).await
    }

    pub async fn fetch_one(&self, id: RecordId) -> Result<Record, StoreError> {
        self.loader.store().get_one(id).await
    }

    pub fn distribution(&self, field: RecordField) -> Distribution {
        self.session.distribution(field)
    }

    pub fn nested_distribution(&self, list: ChannelList, field: ChannelField) -> Distribution {
        self.session.nested_distribution(list, field)
    }
}
