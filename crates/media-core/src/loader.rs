//! Assembles the full collection from bounded pages.

use std::sync::Arc;

use tracing::{debug, info};

use crate::error::StoreError;
use crate::record::Record;
use crate::store::RecordStore;

pub struct CollectionLoader<S> {
    store: Arc<S>,
    page_size: usize,
}

impl<S> Clone for CollectionLoader<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            page_size: self.page_size,
        }
    }
}

impl<S: RecordStore> CollectionLoader<S> {
    /// `page_size` is clamped to at least 1.
    pub fn new(store: Arc<S>, page_size: usize) -> Self {
        Self {
            store,
            page_size: page_size.max(1),
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Fetch pages one after another until a page comes back short.
    ///
    /// A collection whose size is an exact multiple of the page size costs
    /// one trailing empty-page request. Any page failure discards everything
    /// fetched so far.
    pub async fn load_all(&self) -> Result<Vec<Record>, StoreError> {
        let mut records = Vec::new();
        let mut offset = 0;
        let mut pages = 0usize;

        loop {
            let page = self.store.list_page(offset, self.page_size).await?;
            pages += 1;
            let fetched = page.len();
            debug!("page {} at offset {}: {} records", pages, offset, fetched);
            records.extend(page);

            if fetched < self.page_size {
                break;
            }
            offset += self.page_size;
        }

        info!("loaded {} records in {} pages", records.len(), pages);
        Ok(records)
    }
}
