//! In-memory implementations of the table ports.
//!
//! Each mock records how it was called so tests can assert on the
//! interaction, not only on the resulting state.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use evdash_core::{
    AuthSession, Collaborators, DetailProvider, EntityPicker, ListEndpoint, Navigator, Notifier,
    Spinner, VariantStore,
};
use evdash_domain::{FetchError, FilterValue, ListQuery, Page, Variant};
use serde_json::{json, Value};

/// List endpoint serving a fixed row set, paged by the query.
///
/// Latency and failures can be scripted per call; every received query is
/// recorded.
#[derive(Default)]
pub struct RecordingEndpoint {
    rows: Mutex<Vec<Value>>,
    latency: Mutex<Duration>,
    scripted_latency: Mutex<VecDeque<Duration>>,
    failures: Mutex<VecDeque<FetchError>>,
    queries: Mutex<Vec<ListQuery>>,
}

impl RecordingEndpoint {
    pub fn new(rows: Vec<Value>) -> Self {
        Self { rows: Mutex::new(rows), ..Self::default() }
    }

    /// Latency of every call without a scripted one.
    pub fn with_latency(self, latency: Duration) -> Self {
        *self.latency.lock().unwrap() = latency;
        self
    }

    /// Latency of the next calls, in order.
    pub fn script_latency(&self, latencies: impl IntoIterator<Item = Duration>) {
        self.scripted_latency.lock().unwrap().extend(latencies);
    }

    /// Make the next call fail with `error`.
    pub fn fail_next(&self, error: FetchError) {
        self.failures.lock().unwrap().push_back(error);
    }

    pub fn set_rows(&self, rows: Vec<Value>) {
        *self.rows.lock().unwrap() = rows;
    }

    pub fn calls(&self) -> usize {
        self.queries.lock().unwrap().len()
    }

    pub fn queries(&self) -> Vec<ListQuery> {
        self.queries.lock().unwrap().clone()
    }

    pub fn last_query(&self) -> Option<ListQuery> {
        self.queries.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl ListEndpoint<Value> for RecordingEndpoint {
    async fn fetch(&self, query: &ListQuery) -> Result<Page<Value>, FetchError> {
        self.queries.lock().unwrap().push(query.clone());
        let latency = self
            .scripted_latency
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| *self.latency.lock().unwrap());
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }

        if let Some(error) = self.failures.lock().unwrap().pop_front() {
            return Err(error);
        }

        let rows = self.rows.lock().unwrap();
        let result = rows
            .iter()
            .skip(query.paging.skip as usize)
            .take(query.paging.limit as usize)
            .cloned()
            .collect();
        Ok(Page::new(rows.len() as u64, result))
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    errors: Mutex<Vec<String>>,
    connection_lost: AtomicUsize,
}

impl RecordingNotifier {
    pub fn errors(&self) -> Vec<String> {
        self.errors.lock().unwrap().clone()
    }

    pub fn connection_lost(&self) -> usize {
        self.connection_lost.load(Ordering::SeqCst)
    }
}

impl Notifier for RecordingNotifier {
    fn show_error(&self, message_key: &str) {
        self.errors.lock().unwrap().push(message_key.to_string());
    }

    fn show_connection_lost(&self) {
        self.connection_lost.fetch_add(1, Ordering::SeqCst);
    }
}

#[derive(Default)]
pub struct RecordingNavigator {
    routes: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    pub fn routes(&self) -> Vec<String> {
        self.routes.lock().unwrap().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, route: &str) {
        self.routes.lock().unwrap().push(route.to_string());
    }
}

pub struct FakeAuth {
    authenticated: AtomicBool,
    logouts: AtomicUsize,
}

impl FakeAuth {
    pub fn signed_in() -> Self {
        Self { authenticated: AtomicBool::new(true), logouts: AtomicUsize::new(0) }
    }

    pub fn logouts(&self) -> usize {
        self.logouts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AuthSession for FakeAuth {
    fn is_authenticated(&self) -> bool {
        self.authenticated.load(Ordering::SeqCst)
    }

    async fn logout(&self) {
        self.authenticated.store(false, Ordering::SeqCst);
        self.logouts.fetch_add(1, Ordering::SeqCst);
    }
}

#[derive(Default)]
pub struct CountingSpinner {
    shown: AtomicUsize,
    hidden: AtomicUsize,
}

impl CountingSpinner {
    pub fn shown(&self) -> usize {
        self.shown.load(Ordering::SeqCst)
    }

    pub fn hidden(&self) -> usize {
        self.hidden.load(Ordering::SeqCst)
    }
}

impl Spinner for CountingSpinner {
    fn show(&self) {
        self.shown.fetch_add(1, Ordering::SeqCst);
    }

    fn hide(&self) {
        self.hidden.fetch_add(1, Ordering::SeqCst);
    }
}

/// Detail provider echoing the record id, optionally failing.
#[derive(Default)]
pub struct CountingDetails {
    calls: AtomicUsize,
    fail_with: Mutex<Option<FetchError>>,
}

impl CountingDetails {
    pub fn failing(error: FetchError) -> Self {
        Self { fail_with: Mutex::new(Some(error)), ..Self::default() }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DetailProvider for CountingDetails {
    async fn fetch_details(&self, record_id: &str) -> Result<Value, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(error) = self.fail_with.lock().unwrap().clone() {
            return Err(error);
        }
        Ok(json!({"id": record_id, "connectors": 2}))
    }
}

/// Entity picker answering with a fixed choice (`None` = cancelled).
pub struct FixedPicker(pub Option<FilterValue>);

#[async_trait]
impl EntityPicker for FixedPicker {
    async fn pick(&self, _dialog: &str, _current: &FilterValue) -> Option<FilterValue> {
        self.0.clone()
    }
}

/// `(view id, user id, with global)` of a list call
pub type ListCall = (String, String, bool);

#[derive(Default)]
pub struct MemoryVariantStore {
    variants: Mutex<Vec<Variant>>,
    list_calls: Mutex<Vec<ListCall>>,
    next_id: AtomicUsize,
}

impl MemoryVariantStore {
    pub fn stored(&self) -> Vec<Variant> {
        self.variants.lock().unwrap().clone()
    }

    pub fn list_calls(&self) -> Vec<ListCall> {
        self.list_calls.lock().unwrap().clone()
    }

    /// Seed a variant as if another session had saved it.
    pub fn seed(&self, mut variant: Variant) -> String {
        variant.id = format!("v{}", self.next_id.fetch_add(1, Ordering::SeqCst) + 1);
        let id = variant.id.clone();
        self.variants.lock().unwrap().push(variant);
        id
    }
}

#[async_trait]
impl VariantStore for MemoryVariantStore {
    async fn list(
        &self,
        view_id: &str,
        user_id: &str,
        with_global: bool,
    ) -> Result<Vec<Variant>, FetchError> {
        self.list_calls.lock().unwrap().push((view_id.to_string(), user_id.to_string(), with_global));
        Ok(self
            .variants
            .lock()
            .unwrap()
            .iter()
            .filter(|variant| variant.view_id == view_id)
            .filter(|variant| variant.user_id == user_id || (with_global && variant.user_id.is_empty()))
            .cloned()
            .collect())
    }

    async fn create(&self, variant: &Variant) -> Result<Variant, FetchError> {
        let mut created = variant.clone();
        created.id = format!("v{}", self.next_id.fetch_add(1, Ordering::SeqCst) + 1);
        self.variants.lock().unwrap().push(created.clone());
        Ok(created)
    }

    async fn update(&self, variant: &Variant) -> Result<Variant, FetchError> {
        let mut variants = self.variants.lock().unwrap();
        let stored = variants
            .iter_mut()
            .find(|stored| stored.id == variant.id)
            .ok_or_else(|| FetchError::from_status(404, "variant not found"))?;
        *stored = variant.clone();
        Ok(variant.clone())
    }

    async fn delete(&self, variant_id: &str) -> Result<(), FetchError> {
        self.variants.lock().unwrap().retain(|variant| variant.id != variant_id);
        Ok(())
    }
}

/// The UI collaborators of one test, kept so assertions can inspect them.
pub struct Ui {
    pub notifier: Arc<RecordingNotifier>,
    pub navigator: Arc<RecordingNavigator>,
    pub auth: Arc<FakeAuth>,
    pub spinner: Arc<CountingSpinner>,
}

impl Ui {
    pub fn new() -> Self {
        Self {
            notifier: Arc::new(RecordingNotifier::default()),
            navigator: Arc::new(RecordingNavigator::default()),
            auth: Arc::new(FakeAuth::signed_in()),
            spinner: Arc::new(CountingSpinner::default()),
        }
    }

    pub fn collaborators(&self) -> Collaborators {
        Collaborators::new(self.notifier.clone(), self.navigator.clone(), self.auth.clone())
            .with_spinner(self.spinner.clone())
    }
}
