//! Saved filter variants of a table
//!
//! A variant stores the filter values of a view for the current user (or
//! globally). Saving with no variant selected creates one; saving with a
//! variant selected updates it.

use std::sync::Arc;

use evdash_domain::{DashError, FetchError, TableRecord, Variant};
use tracing::{debug, info};

use super::data_source::DataSource;
use super::errors::TableError;
use super::ports::VariantStore;

impl<R: TableRecord> DataSource<R> {
    fn variant_context(&self) -> Result<(Arc<dyn VariantStore>, String, String), TableError> {
        let store = self
            .shared
            .variant_store
            .clone()
            .ok_or_else(|| DashError::Config("no variant store configured".into()))?;
        let view_id = self
            .shared
            .definition
            .def()
            .view_id
            .clone()
            .ok_or_else(|| DashError::Config("table has no view id".into()))?;
        let user_id = self
            .shared
            .session
            .as_ref()
            .map(|session| session.user_id.clone())
            .ok_or_else(|| DashError::Auth("no session to own variants".into()))?;
        Ok((store, view_id, user_id))
    }

    /// Report a store failure to the user, then hand it back.
    async fn store_failed(&self, err: FetchError) -> TableError {
        let message_key = self.shared.definition.error_message_key().to_string();
        self.shared.errors.handle(&err, &message_key).await;
        err.into()
    }

    /// Fetch the user's and the global variants of this view.
    pub async fn load_variants(&self) -> Result<Vec<Variant>, TableError> {
        let (store, view_id, user_id) = self.variant_context()?;
        let variants = match store.list(&view_id, &user_id, true).await {
            Ok(variants) => variants,
            Err(err) => return Err(self.store_failed(err).await),
        };
        debug!(view_id = %view_id, count = variants.len(), "variants loaded");

        let mut state = self.shared.state.lock();
        let still_listed = state
            .active_variant
            .as_ref()
            .map_or(true, |active| variants.iter().any(|variant| &variant.id == active));
        if !still_listed {
            state.active_variant = None;
        }
        state.variants = variants.clone();
        Ok(variants)
    }

    /// Store the current filter values under `name`.
    pub async fn save_variant(&self, name: &str) -> Result<Variant, TableError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DashError::InvalidInput("variant name is empty".into()).into());
        }
        let (store, view_id, user_id) = self.variant_context()?;

        let (mut variant, values) = {
            let state = self.shared.state.lock();
            let selected = state
                .active_variant
                .as_ref()
                .and_then(|id| state.variants.iter().find(|variant| &variant.id == id))
                .cloned();
            (selected.unwrap_or_else(|| Variant::new(name, &view_id, &user_id)), state.filters.values())
        };
        variant.name = name.to_string();
        variant.set_filters(&values);

        let saved = if variant.is_persisted() {
            store.update(&variant).await
        } else {
            store.create(&variant).await
        };
        let saved = match saved {
            Ok(saved) => saved,
            Err(err) => return Err(self.store_failed(err).await),
        };
        info!(variant = %saved.id, view_id = %view_id, "variant saved");

        let mut state = self.shared.state.lock();
        match state.variants.iter().position(|variant| variant.id == saved.id) {
            Some(index) => state.variants[index] = saved.clone(),
            None => state.variants.push(saved.clone()),
        }
        state.active_variant = Some(saved.id.clone());
        Ok(saved)
    }

    /// Apply the filters stored in a loaded variant. Filters the variant
    /// does not mention are reset; unknown filter ids are ignored.
    pub fn select_variant(&self, variant_id: &str) -> Result<(), TableError> {
        let mut state = self.shared.state.lock();
        let values = state
            .variants
            .iter()
            .find(|variant| variant.id == variant_id)
            .map(Variant::filter_values)
            .ok_or_else(|| DashError::NotFound(format!("variant '{variant_id}'")))?;
        state.filters.apply_values(&values);
        state.sync_filters();
        state.active_variant = Some(variant_id.to_string());
        debug!(variant = variant_id, "variant selected");
        Ok(())
    }

    /// Forget the selected variant without touching the filters.
    pub fn unselect_variant(&self) {
        self.shared.state.lock().active_variant = None;
    }

    /// Delete the selected variant from the store.
    pub async fn delete_variant(&self) -> Result<(), TableError> {
        let (store, _, _) = self.variant_context()?;
        let active = self
            .shared
            .state
            .lock()
            .active_variant
            .clone()
            .ok_or_else(|| DashError::InvalidInput("no variant selected".into()))?;

        if let Err(err) = store.delete(&active).await {
            return Err(self.store_failed(err).await);
        }
        info!(variant = %active, "variant deleted");

        let mut state = self.shared.state.lock();
        state.variants.retain(|variant| variant.id != active);
        state.active_variant = None;
        Ok(())
    }

    pub fn variants(&self) -> Vec<Variant> {
        self.shared.state.lock().variants.clone()
    }

    pub fn active_variant(&self) -> Option<String> {
        self.shared.state.lock().active_variant.clone()
    }
}
