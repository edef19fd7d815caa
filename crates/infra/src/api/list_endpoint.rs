//! REST implementations of the table ports

use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use evdash_core::{DetailProvider, ListEndpoint};
use evdash_domain::{FetchError, ListQuery, Page, TableRecord};
use serde_json::Value;
use tracing::debug;

use super::client::ApiClient;

/// List endpoint backed by a central server collection.
///
/// Every fetch is one GET of `path` with the query's parameters; the response
/// is the `{count, result}` page shape.
pub struct RestListEndpoint<R> {
    client: Arc<ApiClient>,
    path: String,
    _record: PhantomData<fn() -> R>,
}

impl<R> RestListEndpoint<R> {
    pub fn new(client: Arc<ApiClient>, path: impl Into<String>) -> Self {
        Self { client, path: path.into(), _record: PhantomData }
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

#[async_trait]
impl<R: TableRecord> ListEndpoint<R> for RestListEndpoint<R> {
    async fn fetch(&self, query: &ListQuery) -> Result<Page<R>, FetchError> {
        let page: Page<R> = self.client.get_list(&self.path, &query.to_params()).await?;
        debug!(path = %self.path, count = page.count, rows = page.result.len(), "page fetched");
        Ok(page)
    }
}

/// Detail provider fetching `{path}/{record id}`.
pub struct RestDetailProvider {
    client: Arc<ApiClient>,
    path: String,
}

impl RestDetailProvider {
    pub fn new(client: Arc<ApiClient>, path: impl Into<String>) -> Self {
        Self { client, path: path.into() }
    }
}

#[async_trait]
impl DetailProvider for RestDetailProvider {
    async fn fetch_details(&self, record_id: &str) -> Result<Value, FetchError> {
        let path = format!("{}/{}", self.path.trim_end_matches('/'), record_id);
        Ok(self.client.get(&path).await?)
    }
}
