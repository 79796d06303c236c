//! Client boundary to the remote file-collection service.
//!
//! `RecordStore` is the seam the rest of the crate is written against;
//! `HttpRecordStore` speaks the service's JSON-over-HTTP dialect.

use std::future::Future;

use reqwest::StatusCode;
use tracing::{debug, trace};

use crate::config::ServiceConfig;
use crate::error::StoreError;
use crate::record::{Record, RecordId};

/// Remote collection operations. Implementations hold no collection state.
pub trait RecordStore: Send + Sync {
    /// At most `limit` records starting at offset `skip`, in service order.
    fn list_page(
        &self,
        skip: usize,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<Record>, StoreError>> + Send;

    /// Fails with `StoreError::NotFound` if no such record exists.
    fn get_one(&self, id: RecordId) -> impl Future<Output = Result<Record, StoreError>> + Send;

    /// Deleting an id twice yields `StoreError::NotFound` the second time.
    fn delete_one(&self, id: RecordId) -> impl Future<Output = Result<(), StoreError>> + Send;
}

/// HTTP client for the collection service.
#[derive(Debug, Clone)]
pub struct HttpRecordStore {
    client: reqwest::Client,
    base_url: String,
}

impl HttpRecordStore {
    pub fn new(config: &ServiceConfig) -> Result<Self, StoreError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()?;
        Ok(Self::with_client(client, &config.base_url))
    }

    pub fn with_client(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn record_url(&self, id: RecordId) -> String {
        format!("{}/{}", self.base_url, id)
    }
}

impl RecordStore for HttpRecordStore {
    async fn list_page(&self, skip: usize, limit: usize) -> Result<Vec<Record>, StoreError> {
        trace!("GET {}?skip={}&limit={}", self.base_url, skip, limit);
        let response = self
            .client
            .get(&self.base_url)
            .query(&[("skip", skip), ("limit", limit)])
            .header("Accept", "application/json")
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(StoreError::NetworkFailure(format!(
                "list returned status: {}",
                response.status()
            )));
        }

        let page: Vec<Record> = response.json().await?;
        Ok(page)
    }

    async fn get_one(&self, id: RecordId) -> Result<Record, StoreError> {
        let response = self
            .client
            .get(self.record_url(id))
            .header("Accept", "application/json")
            .send()
            .await?;

        match response.status() {
            StatusCode::NOT_FOUND => Err(StoreError::NotFound(id)),
            status if !status.is_success() => Err(StoreError::NetworkFailure(format!(
                "get {} returned status: {}",
                id, status
            ))),
            _ => Ok(response.json().await?),
        }
    }

    async fn delete_one(&self, id: RecordId) -> Result<(), StoreError> {
        let response = self.client.delete(self.record_url(id)).send().await?;

        match response.status() {
            StatusCode::NOT_FOUND => Err(StoreError::NotFound(id)),
            status if !status.is_success() => Err(StoreError::NetworkFailure(format!(
                "delete {} returned status: {}",
                id, status
            ))),
            StatusCode::NO_CONTENT => Ok(()),
            _ => {
                // Some deployments answer 200 with a JSON boolean instead of 204/404.
                let body = response.text().await?;
                if body.trim() == "false" {
                    debug!("delete {}: service reported nothing to delete", id);
                    Err(StoreError::NotFound(id))
                } else {
                    Ok(())
                }
            }
        }
    }
}
