use thiserror::Error;

use crate::record::RecordId;

/// Failure of a single request against the collection service.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    /// The request never completed, or the service answered with something
    /// other than a usable response.
    #[error("network failure: {0}")]
    NetworkFailure(String),

    /// No record with this identifier exists (or it was already deleted).
    #[error("record {0} not found")]
    NotFound(RecordId),
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

impl From<reqwest::Error> for StoreError {
    fn from(e: reqwest::Error) -> Self {
        Self::NetworkFailure(e.to_string())
    }
}

/// A delete request that did not confirm.
#[derive(Debug, Clone, PartialEq)]
pub struct FailedDeletion {
    pub id: RecordId,
    pub reason: StoreError,
}

/// Failure of a collection-level operation (load or batch delete).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CollectionError {
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Some deletions in a batch did not confirm. Deletions that did succeed
    /// are not rolled back.
    #[error("{} of {requested} deletions did not confirm", failed.len())]
    PartialBatchFailure {
        requested: usize,
        failed: Vec<FailedDeletion>,
    },
}

impl CollectionError {
    /// Identifiers whose deletion did not confirm, if this is a batch failure.
    pub fn unconfirmed_ids(&self) -> Vec<RecordId> {
        match self {
            Self::PartialBatchFailure { failed, .. } => failed.iter().map(|f| f.id).collect(),
            Self::Store(_) => Vec::new(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CollectionError>;
