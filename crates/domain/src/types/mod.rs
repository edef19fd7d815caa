//! Domain types and models
//!
//! Everything the table layer needs to describe one list view: the query
//! driving a fetch, the declarative column/action/filter descriptors, the
//! rows with their transient UI flags, and the session they are shown to.

pub mod filter;
pub mod notification;
pub mod query;
pub mod row;
pub mod session;
pub mod table;
pub mod variant;

pub use filter::{FilterDef, FilterKind, FilterValue, KeyValue};
pub use notification::{ChangeNotification, NotificationAction};
pub use query::{ListQuery, Paging, Sort, SortDirection};
pub use row::{FetchStatus, Page, RowState, TableRecord};
pub use session::{Session, UserRole};
pub use table::{
    ActionDef, ActionKind, ButtonAction, ButtonColor, ColumnDef, Formatter, RowPredicate,
    TableDef, ValueType,
};
pub use variant::{Variant, VariantFilter};
