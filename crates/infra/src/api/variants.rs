//! Saved filter variants on the central server

use std::sync::Arc;

use async_trait::async_trait;
use evdash_core::VariantStore;
use evdash_domain::{FetchError, Page, Variant};
use tracing::{debug, info};

use super::client::ApiClient;

const VARIANTS_PATH: &str = "variants";

/// [`VariantStore`] over the `/variants` resource.
pub struct RestVariantStore {
    client: Arc<ApiClient>,
}

impl RestVariantStore {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl VariantStore for RestVariantStore {
    async fn list(
        &self,
        view_id: &str,
        user_id: &str,
        with_global: bool,
    ) -> Result<Vec<Variant>, FetchError> {
        let params = vec![
            ("ViewID".to_string(), view_id.to_string()),
            ("UserID".to_string(), user_id.to_string()),
            ("WithGlobal".to_string(), with_global.to_string()),
        ];
        let page: Page<Variant> = self.client.get_list(VARIANTS_PATH, &params).await?;
        debug!(view_id, count = page.result.len(), "variants listed");
        Ok(page.result)
    }

    async fn create(&self, variant: &Variant) -> Result<Variant, FetchError> {
        let created: Variant = self.client.post(VARIANTS_PATH, variant).await?;
        info!(view_id = %created.view_id, id = %created.id, "variant created");
        Ok(created)
    }

    async fn update(&self, variant: &Variant) -> Result<Variant, FetchError> {
        Ok(self.client.put(VARIANTS_PATH, variant).await?)
    }

    async fn delete(&self, variant_id: &str) -> Result<(), FetchError> {
        self.client.delete(&format!("{VARIANTS_PATH}/{variant_id}")).await?;
        info!(id = variant_id, "variant deleted");
        Ok(())
    }
}
