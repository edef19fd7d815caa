//! Port interfaces for the table layer
//!
//! These traits define the boundaries between the table logic and the
//! backend, the UI shell and the stores behind it.

use std::sync::Arc;

use async_trait::async_trait;
use evdash_domain::{FetchError, FilterValue, ListQuery, Page, Variant};
use serde_json::Value;

/// Paginated list endpoint of one entity
#[async_trait]
pub trait ListEndpoint<R>: Send + Sync {
    /// Fetch one page for the given query
    async fn fetch(&self, query: &ListQuery) -> Result<Page<R>, FetchError>;
}

/// Lazily fetched row details
#[async_trait]
pub trait DetailProvider: Send + Sync {
    async fn fetch_details(&self, record_id: &str) -> Result<Value, FetchError>;
}

/// User-facing messages
pub trait Notifier: Send + Sync {
    /// Show a translated error message
    fn show_error(&self, message_key: &str);

    /// Show the "connection lost" banner
    fn show_connection_lost(&self);
}

pub trait Navigator: Send + Sync {
    fn navigate(&self, route: &str);
}

#[async_trait]
pub trait AuthSession: Send + Sync {
    fn is_authenticated(&self) -> bool;

    async fn logout(&self);
}

/// Global busy indicator
pub trait Spinner: Send + Sync {
    fn show(&self);
    fn hide(&self);
}

/// Modal listing entities (sites, users, ...) to pick a filter value from
#[async_trait]
pub trait EntityPicker: Send + Sync {
    /// `None` when the dialog was cancelled.
    async fn pick(&self, dialog: &str, current: &FilterValue) -> Option<FilterValue>;
}

/// Persistence of saved filter variants
#[async_trait]
pub trait VariantStore: Send + Sync {
    async fn list(
        &self,
        view_id: &str,
        user_id: &str,
        with_global: bool,
    ) -> Result<Vec<Variant>, FetchError>;

    async fn create(&self, variant: &Variant) -> Result<Variant, FetchError>;

    async fn update(&self, variant: &Variant) -> Result<Variant, FetchError>;

    async fn delete(&self, variant_id: &str) -> Result<(), FetchError>;
}

/// UI collaborators a data source reports to
#[derive(Clone)]
pub struct Collaborators {
    pub notifier: Arc<dyn Notifier>,
    pub navigator: Arc<dyn Navigator>,
    pub auth: Arc<dyn AuthSession>,
    pub spinner: Option<Arc<dyn Spinner>>,
}

impl Collaborators {
    pub fn new(
        notifier: Arc<dyn Notifier>,
        navigator: Arc<dyn Navigator>,
        auth: Arc<dyn AuthSession>,
    ) -> Self {
        Self { notifier, navigator, auth, spinner: None }
    }

    pub fn with_spinner(mut self, spinner: Arc<dyn Spinner>) -> Self {
        self.spinner = Some(spinner);
        self
    }
}
