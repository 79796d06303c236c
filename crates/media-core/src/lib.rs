//! Client-side manager for a remote collection of media-file records.
//!
//! Records are fetched page by page into an in-memory collection, tallied
//! into distributions for charts, selected, and deleted one, many, or all at
//! a time. The remote service is reached only through [`store::RecordStore`].

pub mod config;
pub mod deletion;
pub mod distribution;
pub mod error;
pub mod loader;
pub mod manager;
pub mod platform;
pub mod record;
pub mod selection;
pub mod session;
pub mod store;

pub use deletion::{BatchOutcome, DeletionCoordinator};
pub use error::{CollectionError, FailedDeletion, StoreError};
pub use loader::CollectionLoader;
pub use manager::FileManager;
pub use record::{AudioChannel, Record, RecordId, SubtitleChannel};
pub use selection::Selection;
pub use session::{FileSession, LoadStatus};
pub use store::{HttpRecordStore, RecordStore};
