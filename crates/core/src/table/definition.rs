//! Table definitions
//!
//! A [`TableDefinition`] is the frozen, validated description of one table:
//! columns, filters, actions and tuning. Page code assembles it with
//! [`TableDefinitionBuilder`]; nothing in it changes once built.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use evdash_domain::constants::{DEFAULT_LIMIT, MESSAGE_ERROR_BACKEND};
use evdash_domain::{
    ActionDef, AdvancedConfig, ColumnDef, DashError, FilterDef, ListQuery, Paging, Result, Sort,
    TableDef,
};
use serde_json::Value;

use super::filters::FilterRegistry;
use super::renderers::{RenderFn, RendererRegistry};
use super::selection::SelectionModel;

/// Builds the row actions of a row from its serialized value.
pub type RowActionsBuilder = Arc<dyn Fn(&Value) -> Vec<ActionDef> + Send + Sync>;

#[derive(Clone)]
pub struct TableDefinition {
    def: TableDef,
    columns: Vec<ColumnDef>,
    filters: Vec<FilterDef>,
    actions: Vec<ActionDef>,
    row_actions: Vec<ActionDef>,
    dynamic_row_actions: Option<RowActionsBuilder>,
    renderers: HashMap<String, RenderFn>,
    detail_renderer: Option<RenderFn>,
    static_filters: BTreeMap<String, String>,
    page_size: u32,
    page_sizes: Vec<u32>,
    polling_interval: Duration,
    search_debounce: Duration,
    error_message_key: String,
}

impl TableDefinition {
    pub fn builder(def: TableDef) -> TableDefinitionBuilder {
        TableDefinitionBuilder::new(def)
    }

    pub fn def(&self) -> &TableDef {
        &self.def
    }

    pub fn columns(&self) -> &[ColumnDef] {
        &self.columns
    }

    pub fn column(&self, column_id: &str) -> Option<&ColumnDef> {
        self.columns.iter().find(|column| column.id == column_id)
    }

    /// Filters with their default values.
    pub fn filters(&self) -> &[FilterDef] {
        &self.filters
    }

    /// A fresh registry seeded with the default filter values.
    pub fn filter_registry(&self) -> FilterRegistry {
        // Ids were checked for duplicates at build time.
        FilterRegistry::new(self.filters.clone()).unwrap_or_default()
    }

    pub fn actions(&self) -> &[ActionDef] {
        &self.actions
    }

    /// Static row actions plus the dynamic ones, restricted to those
    /// visible for `row`.
    pub fn row_actions_for(&self, row: &Value) -> Vec<ActionDef> {
        let dynamic = self
            .dynamic_row_actions
            .as_ref()
            .map(|build| build(row))
            .unwrap_or_default();
        self.row_actions
            .iter()
            .cloned()
            .chain(dynamic)
            .filter(|action| action.is_visible_for(row))
            .collect()
    }

    pub fn renderer(&self, column_id: &str) -> Option<RenderFn> {
        self.renderers.get(column_id).cloned()
    }

    /// Renderer of expanded rows, resolved from `TableDef::detail_renderer`.
    pub fn detail_renderer(&self) -> Option<RenderFn> {
        self.detail_renderer.clone()
    }

    pub fn static_filters(&self) -> &BTreeMap<String, String> {
        &self.static_filters
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn page_sizes(&self) -> &[u32] {
        &self.page_sizes
    }

    pub fn polling_interval(&self) -> Duration {
        self.polling_interval
    }

    pub fn search_debounce(&self) -> Duration {
        self.search_debounce
    }

    pub fn error_message_key(&self) -> &str {
        &self.error_message_key
    }

    pub fn selection_model(&self) -> SelectionModel {
        SelectionModel::new(self.def.row_selection_enabled, self.def.multiple_row_selection)
    }

    /// Query of a freshly opened table: first page, initial sort column,
    /// static filters and the filters whose default restricts the list.
    pub fn initial_query(&self) -> ListQuery {
        let sort = self
            .columns
            .iter()
            .find(|column| column.sorted)
            .map(|column| Sort::new(column.id.clone(), column.direction));
        ListQuery {
            filters: self.filter_registry().fragments(),
            static_filters: self.static_filters.clone(),
            sort,
            paging: Paging { skip: 0, limit: self.page_size },
            search: None,
        }
    }
}

impl fmt::Debug for TableDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TableDefinition")
            .field("def", &self.def)
            .field("columns", &self.columns)
            .field("filters", &self.filters)
            .field("actions", &self.actions.len())
            .field("row_actions", &self.row_actions.len())
            .field("page_size", &self.page_size)
            .field("polling_interval", &self.polling_interval)
            .finish_non_exhaustive()
    }
}

/// Builder for [`TableDefinition`]
pub struct TableDefinitionBuilder {
    def: TableDef,
    columns: Vec<ColumnDef>,
    filters: Vec<FilterDef>,
    actions: Vec<ActionDef>,
    row_actions: Vec<ActionDef>,
    dynamic_row_actions: Option<RowActionsBuilder>,
    static_filters: BTreeMap<String, String>,
    page_size: u32,
    page_sizes: Vec<u32>,
    polling_interval: Duration,
    search_debounce: Duration,
    error_message_key: String,
}

impl TableDefinitionBuilder {
    pub fn new(def: TableDef) -> Self {
        Self::from_config(def, &AdvancedConfig::default())
    }

    /// Start from the tuning values of the console configuration.
    pub fn from_config(def: TableDef, config: &AdvancedConfig) -> Self {
        Self {
            def,
            columns: Vec::new(),
            filters: Vec::new(),
            actions: Vec::new(),
            row_actions: Vec::new(),
            dynamic_row_actions: None,
            static_filters: BTreeMap::new(),
            page_size: if config.default_page_size == 0 { DEFAULT_LIMIT } else { config.default_page_size },
            page_sizes: config.page_sizes.clone(),
            polling_interval: Duration::from_millis(config.polling_interval_millis),
            search_debounce: Duration::from_millis(config.debounce_time_search_millis),
            error_message_key: MESSAGE_ERROR_BACKEND.to_string(),
        }
    }

    pub fn column(mut self, column: ColumnDef) -> Self {
        self.columns.push(column);
        self
    }

    pub fn columns(mut self, columns: impl IntoIterator<Item = ColumnDef>) -> Self {
        self.columns.extend(columns);
        self
    }

    pub fn filter(mut self, filter: FilterDef) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn action(mut self, action: ActionDef) -> Self {
        self.actions.push(action);
        self
    }

    pub fn row_action(mut self, action: ActionDef) -> Self {
        self.row_actions.push(action);
        self
    }

    pub fn dynamic_row_actions<F>(mut self, build: F) -> Self
    where
        F: Fn(&Value) -> Vec<ActionDef> + Send + Sync + 'static,
    {
        self.def.has_dynamic_row_action = true;
        self.dynamic_row_actions = Some(Arc::new(build));
        self
    }

    /// Parameter sent with every list request (e.g. `WithSite=true`).
    pub fn static_filter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.static_filters.insert(key.into(), value.into());
        self
    }

    pub fn page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn polling_interval(mut self, interval: Duration) -> Self {
        self.polling_interval = interval;
        self
    }

    pub fn search_debounce(mut self, quiet: Duration) -> Self {
        self.search_debounce = quiet;
        self
    }

    /// Message key shown when a fetch fails for a reason with no dedicated
    /// reaction.
    pub fn error_message_key(mut self, key: impl Into<String>) -> Self {
        self.error_message_key = key.into();
        self
    }

    /// Validate and freeze the definition, resolving column and detail
    /// renderers.
    ///
    /// # Errors
    /// Returns `DashError::InvalidInput` for duplicate column or filter ids,
    /// more than one initially sorted column, a zero page size, an unknown
    /// renderer key, or dynamic row actions flagged without a builder.
    pub fn build(self, renderers: &RendererRegistry) -> Result<TableDefinition> {
        if self.page_size == 0 {
            return Err(DashError::InvalidInput("page size must be greater than 0".into()));
        }

        let mut seen = HashSet::new();
        for column in &self.columns {
            if !seen.insert(column.id.as_str()) {
                return Err(DashError::InvalidInput(format!("duplicate column '{}'", column.id)));
            }
        }

        let sorted = self.columns.iter().filter(|column| column.sorted).count();
        if sorted > 1 {
            return Err(DashError::InvalidInput(format!(
                "{sorted} columns are flagged as initially sorted"
            )));
        }

        if self.def.has_dynamic_row_action && self.dynamic_row_actions.is_none() {
            return Err(DashError::InvalidInput(
                "dynamic row actions enabled without a builder".into(),
            ));
        }

        FilterRegistry::new(self.filters.clone())?;

        let mut resolved = HashMap::new();
        for column in &self.columns {
            if let Some(key) = &column.renderer {
                resolved.insert(column.id.clone(), renderers.resolve(key)?);
            }
        }
        let detail_renderer = match &self.def.detail_renderer {
            Some(key) => Some(renderers.resolve(key)?),
            None => None,
        };

        Ok(TableDefinition {
            def: self.def,
            columns: self.columns,
            filters: self.filters,
            actions: self.actions,
            row_actions: self.row_actions,
            dynamic_row_actions: self.dynamic_row_actions,
            renderers: resolved,
            detail_renderer,
            static_filters: self.static_filters,
            page_size: self.page_size,
            page_sizes: self.page_sizes,
            polling_interval: self.polling_interval,
            search_debounce: self.search_debounce,
            error_message_key: self.error_message_key,
        })
    }
}
