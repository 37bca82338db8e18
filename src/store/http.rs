//! HTTP implementation of the catalog store contract.

use std::time::Duration;

use tracing::{debug, warn};

use super::{CatalogStore, StoreError};
use crate::config::Settings;
use crate::model::{Item, ItemId, MutationKind, PartitionKey};
use crate::util::percent_encode;

/// Reqwest-backed client for the catalog REST API.
///
/// All item traffic goes through `/api/v1/items`; order writes and
/// mutations are narrow `PATCH`/`DELETE` calls that never touch the rest of
/// the item payload.
pub struct HttpCatalogStore {
    /// Service root, without a trailing slash.
    base_url: String,
    /// Shared connection pool with the configured request timeout.
    client: reqwest::Client,
}

impl HttpCatalogStore {
    /// Build a client from [`Settings`].
    ///
    /// # Errors
    /// Propagates reqwest builder failures (TLS backend init).
    pub fn new(settings: &Settings) -> Result<Self, StoreError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(settings.request_timeout_ms))
            .build()?;
        Ok(Self {
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    /// Collection endpoint for all items.
    fn items_url(&self) -> String {
        format!("{}/api/v1/items", self.base_url)
    }

    /// Item endpoint for a single id.
    fn item_url(&self, id: &ItemId) -> String {
        format!("{}/api/v1/items/{}", self.base_url, percent_encode(id.as_str()))
    }

    /// Collection endpoint filtered to one partition.
    fn partition_url(&self, key: &PartitionKey) -> String {
        let mut url = format!(
            "{}/api/v1/items?category={}",
            self.base_url,
            percent_encode(&key.category.0)
        );
        if let Some(section) = &key.section {
            url.push_str("&section=");
            url.push_str(&percent_encode(&section.0));
        }
        url
    }

    /// Issue a GET and decode the JSON item list.
    async fn fetch_list(&self, url: String) -> Result<Vec<Item>, StoreError> {
        let resp = self.client.get(&url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), url = %url, "item list request failed");
            return Err(StoreError::Status {
                code: status.as_u16(),
                url,
            });
        }
        let items: Vec<Item> = resp.json().await?;
        debug!(count = items.len(), url = %url, "fetched catalog items");
        Ok(items)
    }
}

/// Map a write response status to the store error taxonomy.
///
/// 404 resolves to [`StoreError::NotFound`] so callers can distinguish a
/// vanished item from a service fault.
fn check_write_status(
    status: reqwest::StatusCode,
    url: String,
    id: &ItemId,
) -> Result<(), StoreError> {
    if status == reqwest::StatusCode::NOT_FOUND {
        return Err(StoreError::NotFound { id: id.clone() });
    }
    if !status.is_success() {
        return Err(StoreError::Status {
            code: status.as_u16(),
            url,
        });
    }
    Ok(())
}

impl CatalogStore for HttpCatalogStore {
    async fn fetch_items(&self) -> Result<Vec<Item>, StoreError> {
        self.fetch_list(self.items_url()).await
    }

    async fn fetch_partition(&self, key: &PartitionKey) -> Result<Vec<Item>, StoreError> {
        self.fetch_list(self.partition_url(key)).await
    }

    async fn set_order(&self, id: &ItemId, order: i64) -> Result<(), StoreError> {
        let url = self.item_url(id);
        let resp = self
            .client
            .patch(&url)
            .json(&serde_json::json!({ "order": order }))
            .send()
            .await?;
        debug!(item = %id, order, status = resp.status().as_u16(), "order write");
        check_write_status(resp.status(), url, id)
    }

    async fn apply_mutation(&self, id: &ItemId, kind: MutationKind) -> Result<(), StoreError> {
        let url = self.item_url(id);
        let resp = match kind {
            MutationKind::Activate => {
                self.client
                    .patch(&url)
                    .json(&serde_json::json!({ "active": true }))
                    .send()
                    .await?
            }
            MutationKind::Deactivate => {
                self.client
                    .patch(&url)
                    .json(&serde_json::json!({ "active": false }))
                    .send()
                    .await?
            }
            MutationKind::Delete => self.client.delete(&url).send().await?,
        };
        debug!(item = %id, mutation = %kind, status = resp.status().as_u16(), "mutation call");
        check_write_status(resp.status(), url, id)
    }
}
