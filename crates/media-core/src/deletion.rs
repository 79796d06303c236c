//! Single, batch and full-collection deletes.
//!
//! The service has no batch endpoint, so a batch becomes one request per id.
//! Requests are spawned together (bounded by a semaphore) and the batch
//! settles only once every request has reported back.

use std::collections::HashSet;
use std::sync::Arc;

use tokio::sync::{mpsc, Semaphore};
use tracing::{debug, info, warn};

use crate::error::{CollectionError, FailedDeletion, StoreError};
use crate::loader::CollectionLoader;
use crate::record::RecordId;
use crate::store::RecordStore;

/// Per-id results of a batch delete. Every requested id lands in exactly one
/// of `deleted`, `already_gone`, or `failed`, each in request order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchOutcome {
    pub requested: Vec<RecordId>,
    pub deleted: Vec<RecordId>,
    /// The service had no such record; treated as a soft success.
    pub already_gone: Vec<RecordId>,
    pub failed: Vec<FailedDeletion>,
}

impl BatchOutcome {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }

    /// `Err(PartialBatchFailure)` if any deletion did not confirm.
    pub fn into_result(self) -> Result<Self, CollectionError> {
        if self.failed.is_empty() {
            Ok(self)
        } else {
            Err(CollectionError::PartialBatchFailure {
                requested: self.requested.len(),
                failed: self.failed,
            })
        }
    }
}

pub struct DeletionCoordinator<S> {
    store: Arc<S>,
    loader: CollectionLoader<S>,
    concurrency: usize,
}

impl<S> Clone for DeletionCoordinator<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            loader: self.loader.clone(),
            concurrency: self.concurrency,
        }
    }
}

impl<S: RecordStore + 'static> DeletionCoordinator<S> {
    /// `concurrency` is clamped to at least 1.
    pub fn new(loader: CollectionLoader<S>, concurrency: usize) -> Self {
        Self {
            store: Arc::clone(loader.store()),
            loader,
            concurrency: concurrency.max(1),
        }
    }

    /// Delete one record. `NotFound` is returned as-is so callers can treat
    /// it as "already gone".
    pub async fn delete_single(&self, id: RecordId) -> Result<(), StoreError> {
        match self.store.delete_one(id).await {
            Ok(()) => {
                info!("deleted record {}", id);
                Ok(())
            }
            Err(e) => {
                warn!("delete {} failed: {}", id, e);
                Err(e)
            }
        }
    }

    /// Issue one delete per id and wait for all of them to settle.
    /// Successful deletions are never rolled back.
    pub async fn delete_many(&self, ids: &[RecordId]) -> BatchOutcome {
        let mut seen = HashSet::new();
        let requested: Vec<RecordId> = ids.iter().copied().filter(|id| seen.insert(*id)).collect();

        let mut outcome = BatchOutcome {
            requested: requested.clone(),
            ..BatchOutcome::default()
        };
        if requested.is_empty() {
            return outcome;
        }

        let sem = Arc::new(Semaphore::new(self.concurrency));
        let (tx, mut rx) = mpsc::channel(requested.len());

        for (slot, id) in requested.iter().copied().enumerate() {
            let txc = tx.clone();
            let store = Arc::clone(&self.store);
            let semc = Arc::clone(&sem);
            tokio::spawn(async move {
                // The semaphore is never closed, so acquire cannot fail.
                let _permit = semc.acquire_owned().await.ok();
                debug!("DELETE {}", id);
                let result = store.delete_one(id).await;
                let _ = txc.send((slot, result)).await;
            });
        }
        drop(tx);

        let mut results: Vec<Option<Result<(), StoreError>>> = vec![None; requested.len()];
        while let Some((slot, result)) = rx.recv().await {
            results[slot] = Some(result);
        }

        for (id, result) in requested.iter().copied().zip(results) {
            match result {
                Some(Ok(())) => outcome.deleted.push(id),
                Some(Err(StoreError::NotFound(_))) => outcome.already_gone.push(id),
                Some(Err(reason)) => outcome.failed.push(FailedDeletion { id, reason }),
                None => outcome.failed.push(FailedDeletion {
                    id,
                    reason: StoreError::NetworkFailure("delete task aborted".to_string()),
                }),
            }
        }

        if outcome.failed.is_empty() {
            info!(
                "batch delete: {} deleted, {} already gone",
                outcome.deleted.len(),
                outcome.already_gone.len()
            );
        } else {
            warn!(
                "batch delete: {} of {} did not confirm",
                outcome.failed.len(),
                outcome.requested.len()
            );
        }
        outcome
    }

    /// Delete every record the service currently has.
    ///
    /// The id list comes from a fresh full load rather than any cached
    /// collection. If that load fails nothing is deleted.
    pub async fn delete_all(&self) -> Result<BatchOutcome, StoreError> {
        let records = self.loader.load_all().await?;
        let ids: Vec<RecordId> = records.iter().map(|r| r.id).collect();
        info!("deleting all {} records", ids.len());
        Ok(self.delete_many(&ids).await)
    }
}
