//! Data source of a table
//!
//! Owns the current page of rows, the list query and the filter values of
//! one table, and issues the list requests. Cloning a [`DataSource`] yields
//! another handle to the same table.
//!
//! Every fetch is tagged with a generation number. How a response that
//! arrives after a newer request was issued is treated depends on the
//! [`StaleResponsePolicy`]; in-flight requests are never cancelled.

use std::sync::{Arc, Weak};
use std::time::{Duration, Instant};

use evdash_domain::{
    ActionDef, ButtonAction, DashError, FetchError, FetchStatus, FilterDef, FilterValue,
    ListQuery, Paging, RowState, Session, Sort, SortDirection, TableRecord, Variant,
};
use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument};

use super::definition::TableDefinition;
use super::errors::{HttpErrorHandler, TableError};
use super::filters::FilterRegistry;
use super::polling::PollingController;
use super::ports::{Collaborators, DetailProvider, EntityPicker, ListEndpoint, VariantStore};
use super::selection::SelectionModel;
use super::view::resolve_path;

/// What to do with a response that resolves after a newer request was
/// issued.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StaleResponsePolicy {
    /// Only the response of the latest issued request replaces the rows.
    #[default]
    LatestIssuedWins,
    /// Whichever response resolves last replaces the rows.
    LastResolvedWins,
}

/// Result of a toolbar action routed through the data source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    Handled,
    /// Left to the page (create, edit, export, ...)
    Unhandled(ButtonAction),
}

/// Read-only copy of a table's state for the rendering layer
#[derive(Clone)]
pub struct TableSnapshot<R> {
    pub definition: Arc<TableDefinition>,
    pub rows: Vec<RowState<R>>,
    pub count: u64,
    pub query: ListQuery,
    pub status: FetchStatus,
    pub filters: Vec<FilterDef>,
    /// Toolbar actions, the auto-refresh slide reflecting the polling state
    pub actions: Vec<ActionDef>,
    pub polling: bool,
    /// Generation of the response the rows come from
    pub generation: u64,
    pub active_variant: Option<String>,
}

impl<R> TableSnapshot<R> {
    pub fn selected_indices(&self) -> Vec<usize> {
        SelectionModel::selected_indices(&self.rows)
    }
}

pub(crate) struct State<R> {
    pub(crate) rows: Vec<RowState<R>>,
    pub(crate) count: u64,
    pub(crate) query: ListQuery,
    pub(crate) filters: FilterRegistry,
    pub(crate) status: FetchStatus,
    /// Latest issued generation
    pub(crate) issued: u64,
    /// Generation the rows come from
    pub(crate) applied: u64,
    pub(crate) variants: Vec<Variant>,
    pub(crate) active_variant: Option<String>,
}

impl<R> State<R> {
    /// Mirror the filter registry into the query; resets skip.
    pub(crate) fn sync_filters(&mut self) {
        let values = self.filters.fragments();
        self.query.replace_filters(values);
    }
}

pub(crate) struct Shared<R> {
    pub(crate) definition: Arc<TableDefinition>,
    pub(crate) endpoint: Arc<dyn ListEndpoint<R>>,
    pub(crate) details: Option<Arc<dyn DetailProvider>>,
    pub(crate) variant_store: Option<Arc<dyn VariantStore>>,
    pub(crate) session: Option<Session>,
    pub(crate) collaborators: Collaborators,
    pub(crate) errors: HttpErrorHandler,
    pub(crate) policy: StaleResponsePolicy,
    pub(crate) selection: SelectionModel,
    pub(crate) polling: PollingController,
    pub(crate) state: Mutex<State<R>>,
    /// Cancelled when the last handle to the table goes away.
    pub(crate) closed: CancellationToken,
}

impl<R> Drop for Shared<R> {
    fn drop(&mut self) {
        self.closed.cancel();
    }
}

/// Handle to a table's rows and list query
pub struct DataSource<R: TableRecord> {
    pub(crate) shared: Arc<Shared<R>>,
}

impl<R: TableRecord> Clone for DataSource<R> {
    fn clone(&self) -> Self {
        Self { shared: self.shared.clone() }
    }
}

/// Non-owning handle held by background tasks (polling, change watch,
/// search debounce) so they never keep a closed table alive.
pub(crate) struct WeakDataSource<R: TableRecord>(Weak<Shared<R>>);

impl<R: TableRecord> Clone for WeakDataSource<R> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<R: TableRecord> WeakDataSource<R> {
    pub(crate) fn upgrade(&self) -> Option<DataSource<R>> {
        self.0.upgrade().map(|shared| DataSource { shared })
    }
}

/// Builder for [`DataSource`]
pub struct DataSourceBuilder<R: TableRecord> {
    definition: Arc<TableDefinition>,
    endpoint: Arc<dyn ListEndpoint<R>>,
    collaborators: Collaborators,
    details: Option<Arc<dyn DetailProvider>>,
    variant_store: Option<Arc<dyn VariantStore>>,
    session: Option<Session>,
    policy: StaleResponsePolicy,
}

impl<R: TableRecord> DataSourceBuilder<R> {
    pub fn with_details(mut self, details: Arc<dyn DetailProvider>) -> Self {
        self.details = Some(details);
        self
    }

    pub fn with_variant_store(mut self, store: Arc<dyn VariantStore>) -> Self {
        self.variant_store = Some(store);
        self
    }

    pub fn with_session(mut self, session: Session) -> Self {
        self.session = Some(session);
        self
    }

    pub fn with_policy(mut self, policy: StaleResponsePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn build(self) -> DataSource<R> {
        let state = State {
            rows: Vec::new(),
            count: 0,
            query: self.definition.initial_query(),
            filters: self.definition.filter_registry(),
            status: FetchStatus::Idle,
            issued: 0,
            applied: 0,
            variants: Vec::new(),
            active_variant: None,
        };
        let shared = Shared {
            selection: self.definition.selection_model(),
            errors: HttpErrorHandler::new(self.collaborators.clone()),
            definition: self.definition,
            endpoint: self.endpoint,
            details: self.details,
            variant_store: self.variant_store,
            session: self.session,
            collaborators: self.collaborators,
            policy: self.policy,
            polling: PollingController::new(),
            state: Mutex::new(state),
            closed: CancellationToken::new(),
        };
        DataSource { shared: Arc::new(shared) }
    }
}

impl<R: TableRecord> DataSource<R> {
    pub fn builder(
        definition: Arc<TableDefinition>,
        endpoint: Arc<dyn ListEndpoint<R>>,
        collaborators: Collaborators,
    ) -> DataSourceBuilder<R> {
        DataSourceBuilder {
            definition,
            endpoint,
            collaborators,
            details: None,
            variant_store: None,
            session: None,
            policy: StaleResponsePolicy::default(),
        }
    }

    /// Data source with default settings and no optional ports.
    pub fn new(
        definition: Arc<TableDefinition>,
        endpoint: Arc<dyn ListEndpoint<R>>,
        collaborators: Collaborators,
    ) -> Self {
        Self::builder(definition, endpoint, collaborators).build()
    }

    pub fn definition(&self) -> &Arc<TableDefinition> {
        &self.shared.definition
    }

    pub(crate) fn downgrade(&self) -> WeakDataSource<R> {
        WeakDataSource(Arc::downgrade(&self.shared))
    }

    // ------------------------------------------------------------------
    // Loading
    // ------------------------------------------------------------------

    /// Fetch the page described by the current query, showing the spinner.
    ///
    /// Exactly one endpoint call per invocation. On failure the rows are
    /// left unchanged and the error has already been reported to the user.
    pub async fn load(&self) -> Result<(Vec<R>, u64), FetchError> {
        self.fetch(true).await
    }

    /// Adopt `query` as the current query, then load.
    pub async fn load_with(&self, query: ListQuery) -> Result<(Vec<R>, u64), TableError> {
        Paging::new(query.paging.skip, query.paging.limit)?;
        self.shared.state.lock().query = query;
        Ok(self.fetch(true).await?)
    }

    /// Reload without the spinner (refresh action, polling, change
    /// notifications).
    pub async fn refresh_data(&self) -> Result<(Vec<R>, u64), FetchError> {
        self.fetch(false).await
    }

    #[instrument(skip(self), fields(generation))]
    async fn fetch(&self, with_spinner: bool) -> Result<(Vec<R>, u64), FetchError> {
        let (generation, query) = {
            let mut state = self.shared.state.lock();
            state.issued += 1;
            state.status = FetchStatus::Loading;
            (state.issued, state.query.clone())
        };
        tracing::Span::current().record("generation", generation);

        let spinner = if with_spinner { self.shared.collaborators.spinner.as_ref() } else { None };
        if let Some(spinner) = spinner {
            spinner.show();
        }
        let started = Instant::now();
        let result = self.shared.endpoint.fetch(&query).await;
        if let Some(spinner) = spinner {
            spinner.hide();
        }
        let elapsed = started.elapsed();

        match result {
            Ok(page) => {
                let applied = self.apply_page(generation, page.count, &page.result);
                debug!(count = page.count, rows = page.result.len(), ?elapsed, applied, "page fetched");
                Ok((page.result, page.count))
            }
            Err(err) => {
                {
                    let mut state = self.shared.state.lock();
                    if generation >= state.issued {
                        state.status = FetchStatus::Error;
                    }
                }
                let message_key = self.shared.definition.error_message_key().to_string();
                self.shared.errors.handle(&err, &message_key).await;
                Err(err)
            }
        }
    }

    /// Replace the rows unless the response is stale under the policy.
    fn apply_page(&self, generation: u64, count: u64, rows: &[R]) -> bool {
        let mut state = self.shared.state.lock();
        let stale = match self.shared.policy {
            StaleResponsePolicy::LatestIssuedWins => generation < state.issued,
            StaleResponsePolicy::LastResolvedWins => false,
        };
        if stale {
            debug!(generation, latest = state.issued, "discarding stale response");
            return false;
        }

        state.rows = rows.iter().cloned().map(RowState::new).collect();
        state.count = count;
        state.applied = generation;
        if generation >= state.issued {
            state.status = FetchStatus::Loaded;
        }
        true
    }

    // ------------------------------------------------------------------
    // Query mutations (none of them reloads)
    // ------------------------------------------------------------------

    pub fn apply_filter(&self, filter_id: &str, value: FilterValue) -> Result<(), TableError> {
        let mut state = self.shared.state.lock();
        state.filters.set(filter_id, value)?;
        state.sync_filters();
        debug!(filter = filter_id, "filter applied");
        Ok(())
    }

    /// Open the filter's entity dialog; a picked value is applied, a
    /// cancelled dialog changes nothing. Returns whether the filter changed.
    pub async fn apply_dialog_filter(
        &self,
        filter_id: &str,
        picker: &dyn EntityPicker,
    ) -> Result<bool, TableError> {
        let mut registry = self.shared.state.lock().filters.clone();
        if !registry.pick_from_dialog(filter_id, picker).await? {
            return Ok(false);
        }
        let value = registry.get(filter_id).map(|filter| filter.current.clone()).unwrap_or_default();
        self.apply_filter(filter_id, value)?;
        Ok(true)
    }

    pub fn reset_filter(&self, filter_id: &str) -> Result<(), TableError> {
        let mut state = self.shared.state.lock();
        state.filters.reset(filter_id)?;
        state.sync_filters();
        Ok(())
    }

    pub fn reset_filters(&self) {
        let mut state = self.shared.state.lock();
        state.filters.reset_all();
        state.sync_filters();
    }

    fn sortable_column(&self, column_id: &str) -> Result<SortDirection, TableError> {
        self.shared
            .definition
            .column(column_id)
            .filter(|column| column.sortable)
            .map(|column| column.direction)
            .ok_or_else(|| {
                DashError::InvalidInput(format!("column '{column_id}' is not sortable")).into()
            })
    }

    pub fn apply_sort(&self, column_id: &str, direction: SortDirection) -> Result<(), TableError> {
        self.sortable_column(column_id)?;
        let mut state = self.shared.state.lock();
        state.query.set_sort(Sort::new(column_id, direction));
        SelectionModel::clear(&mut state.rows);
        Ok(())
    }

    /// Header click: the active column flips its direction, another column
    /// starts with its declared default.
    pub fn sort_clicked(&self, column_id: &str) -> Result<SortDirection, TableError> {
        let default_direction = self.sortable_column(column_id)?;
        let mut state = self.shared.state.lock();
        let direction = match &state.query.sort {
            Some(sort) if sort.column == column_id => sort.direction.toggle(),
            _ => default_direction,
        };
        state.query.set_sort(Sort::new(column_id, direction));
        SelectionModel::clear(&mut state.rows);
        Ok(direction)
    }

    pub fn apply_search(&self, text: &str) {
        self.shared.state.lock().query.set_search(text);
    }

    pub fn set_paging(&self, skip: u32, limit: u32) -> Result<(), TableError> {
        let mut state = self.shared.state.lock();
        state.query.set_paging(Paging { skip, limit })?;
        SelectionModel::clear(&mut state.rows);
        Ok(())
    }

    pub fn set_page_index(&self, index: u32) {
        let mut state = self.shared.state.lock();
        state.query.paging = state.query.paging.with_page_index(index);
        SelectionModel::clear(&mut state.rows);
    }

    /// Change the page size, keeping `skip` on a page boundary.
    pub fn set_page_size(&self, limit: u32) -> Result<(), TableError> {
        let mut state = self.shared.state.lock();
        state.query.set_page_size(limit)?;
        SelectionModel::clear(&mut state.rows);
        Ok(())
    }

    /// Advance to the next page and load it, returning the new rows.
    pub async fn display_more_records(&self) -> Result<(Vec<R>, u64), FetchError> {
        {
            let mut state = self.shared.state.lock();
            state.query.paging = state.query.paging.next();
        }
        self.load().await
    }

    /// Whether the backend holds rows past the current page.
    pub fn has_more_records(&self) -> bool {
        let state = self.shared.state.lock();
        let paging = state.query.paging;
        u64::from(paging.skip) + u64::from(paging.limit) < state.count
    }

    // ------------------------------------------------------------------
    // Polling
    // ------------------------------------------------------------------

    /// Refresh every `interval`, replacing a running timer. A tick never
    /// waits for the previous refresh.
    pub fn set_polling(&self, interval: Duration) -> Result<(), TableError> {
        let source = self.downgrade();
        self.shared.polling.start(interval, move || {
            let source = source.clone();
            async move {
                if let Some(source) = source.upgrade() {
                    // Failures were already reported to the user.
                    let _ = source.refresh_data().await;
                }
            }
        })?;
        Ok(())
    }

    pub async fn clear_polling(&self) -> Result<(), TableError> {
        self.shared.polling.stop().await?;
        Ok(())
    }

    pub fn is_polling(&self) -> bool {
        self.shared.polling.is_running()
    }

    // ------------------------------------------------------------------
    // Row details
    // ------------------------------------------------------------------

    /// Expand or collapse a row. Returns whether the row is now expanded.
    ///
    /// A row expands without a fetch when its details are cached, when the
    /// table's details field holds a value on the row, or when the table
    /// draws details through a renderer. Otherwise the detail provider is
    /// asked once; a failed fetch leaves the row collapsed.
    pub async fn toggle_row_details(&self, row_index: usize) -> Result<bool, TableError> {
        let def = self.shared.definition.def();
        if !def.row_details_enabled {
            return Err(DashError::InvalidInput("row details are disabled".into()).into());
        }

        let (record_id, generation) = {
            let mut state = self.shared.state.lock();
            let applied = state.applied;
            let row = row_at(&mut state.rows, row_index)?;
            if row.expanded {
                row.expanded = false;
                return Ok(false);
            }
            if row.details.is_none() {
                if let Some(path) = def.details_field.as_deref() {
                    let value = row.row.to_value();
                    row.details = resolve_path(&value, path).filter(|v| !v.is_null()).cloned();
                }
            }
            if row.details.is_some() || def.detail_renderer.is_some() {
                row.expanded = true;
                return Ok(true);
            }
            (row.row.record_id(), applied)
        };

        let provider = self
            .shared
            .details
            .clone()
            .ok_or_else(|| DashError::Config("no detail provider configured".into()))?;
        let details = match provider.fetch_details(&record_id).await {
            Ok(details) => details,
            Err(err) => {
                let message_key = self.shared.definition.error_message_key().to_string();
                self.shared.errors.handle(&err, &message_key).await;
                return Err(err.into());
            }
        };

        let mut state = self.shared.state.lock();
        if state.applied != generation {
            debug!(record_id = %record_id, "rows replaced while fetching details");
            return Ok(false);
        }
        let row = row_at(&mut state.rows, row_index)?;
        row.details = Some(details);
        row.expanded = true;
        Ok(true)
    }

    // ------------------------------------------------------------------
    // Selection
    // ------------------------------------------------------------------

    pub fn select_row(&self, row_index: usize) -> Result<(), TableError> {
        let mut state = self.shared.state.lock();
        Ok(self.shared.selection.select(&mut state.rows, row_index)?)
    }

    pub fn deselect_row(&self, row_index: usize) -> Result<(), TableError> {
        let mut state = self.shared.state.lock();
        Ok(self.shared.selection.deselect(&mut state.rows, row_index)?)
    }

    pub fn toggle_row_selection(&self, row_index: usize) -> Result<bool, TableError> {
        let mut state = self.shared.state.lock();
        Ok(self.shared.selection.toggle(&mut state.rows, row_index)?)
    }

    pub fn master_toggle(&self) -> Result<(), TableError> {
        let mut state = self.shared.state.lock();
        Ok(self.shared.selection.master_toggle(&mut state.rows)?)
    }

    pub fn is_all_selected(&self) -> bool {
        SelectionModel::all_selected(&self.shared.state.lock().rows)
    }

    pub fn selected_rows(&self) -> Vec<R> {
        let state = self.shared.state.lock();
        state.rows.iter().filter(|row| row.selected).map(|row| row.row.clone()).collect()
    }

    pub fn clear_selection(&self) {
        SelectionModel::clear(&mut self.shared.state.lock().rows);
    }

    // ------------------------------------------------------------------
    // Actions
    // ------------------------------------------------------------------

    /// Handle the toolbar actions every table shares; anything else is
    /// handed back to the page.
    pub async fn action_triggered(&self, action: ButtonAction) -> Result<ActionOutcome, TableError> {
        match action {
            ButtonAction::Refresh => {
                self.refresh_data().await?;
            }
            ButtonAction::AutoRefresh => {
                if self.is_polling() {
                    self.clear_polling().await?;
                } else {
                    self.set_polling(self.shared.definition.polling_interval())?;
                }
            }
            ButtonAction::ResetFilters => {
                self.reset_filters();
                self.load().await?;
            }
            other => return Ok(ActionOutcome::Unhandled(other)),
        }
        info!(action = %action, "table action handled");
        Ok(ActionOutcome::Handled)
    }

    /// Row actions visible for the row at `row_index`.
    pub fn row_actions(&self, row_index: usize) -> Result<Vec<ActionDef>, TableError> {
        let value = {
            let state = self.shared.state.lock();
            let row = state.rows.get(row_index).ok_or_else(|| out_of_range(row_index, state.rows.len()))?;
            row.row.to_value()
        };
        Ok(self.shared.definition.row_actions_for(&value))
    }

    // ------------------------------------------------------------------
    // Read access
    // ------------------------------------------------------------------

    pub fn snapshot(&self) -> TableSnapshot<R> {
        let polling = self.is_polling();
        let state = self.shared.state.lock();
        let actions = self
            .shared
            .definition
            .actions()
            .iter()
            .cloned()
            .map(|mut action| {
                if action.id == ButtonAction::AutoRefresh {
                    action.current_value = polling;
                }
                action
            })
            .collect();

        TableSnapshot {
            definition: self.shared.definition.clone(),
            rows: state.rows.clone(),
            count: state.count,
            query: state.query.clone(),
            status: state.status,
            filters: state.filters.iter().cloned().collect(),
            actions,
            polling,
            generation: state.applied,
            active_variant: state.active_variant.clone(),
        }
    }

    pub fn query(&self) -> ListQuery {
        self.shared.state.lock().query.clone()
    }

    pub fn status(&self) -> FetchStatus {
        self.shared.state.lock().status
    }

    pub fn count(&self) -> u64 {
        self.shared.state.lock().count
    }

    pub fn rows(&self) -> Vec<R> {
        self.shared.state.lock().rows.iter().map(|row| row.row.clone()).collect()
    }

    pub fn filter_value(&self, filter_id: &str) -> Option<FilterValue> {
        self.shared.state.lock().filters.get(filter_id).map(|filter| filter.current.clone())
    }
}

fn out_of_range(row_index: usize, len: usize) -> DashError {
    DashError::InvalidInput(format!("row {row_index} out of range ({len} rows)"))
}

fn row_at<R>(rows: &mut [RowState<R>], row_index: usize) -> Result<&mut RowState<R>, DashError> {
    let len = rows.len();
    rows.get_mut(row_index).ok_or_else(|| out_of_range(row_index, len))
}
