//! # evdash Core
//!
//! Table abstraction layer of the console - no infrastructure dependencies.
//!
//! This crate contains:
//! - The data source owning a table's rows and list query
//! - Filter registry, polling controller, search debounce and selection
//! - The presentation contract consumed by the rendering layer
//! - Port interfaces (traits) for the endpoint, UI collaborators and stores
//!
//! ## Architecture Principles
//! - Only depends on `evdash-common` and `evdash-domain`
//! - No HTTP or platform code
//! - All external dependencies via traits

pub mod table;

// Re-export specific items to avoid ambiguity
pub use table::data_source::{
    ActionOutcome, DataSource, DataSourceBuilder, StaleResponsePolicy, TableSnapshot,
};
pub use table::definition::{RowActionsBuilder, TableDefinition, TableDefinitionBuilder};
pub use table::errors::{HttpErrorHandler, TableError};
pub use table::filters::FilterRegistry;
pub use table::polling::{PollingController, PollingError};
pub use table::ports::{
    AuthSession, Collaborators, DetailProvider, EntityPicker, ListEndpoint, Navigator, Notifier,
    Spinner, VariantStore,
};
pub use table::renderers::{RenderFn, RendererRegistry};
pub use table::search::SearchDebouncer;
pub use table::selection::SelectionModel;
pub use table::view::TableView;
