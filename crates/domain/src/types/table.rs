//! Declarative table descriptors: columns, actions and table-wide flags.
//!
//! Descriptors are built once when a page sets up its table and are not
//! mutated afterwards.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::impl_domain_status_conversions;
use crate::types::query::SortDirection;

/// Cell formatter: `(converted value, whole row) -> display text`.
pub type Formatter = Arc<dyn Fn(&Value, &Value) -> String + Send + Sync>;

/// Per-row predicate evaluated on the serialized row.
pub type RowPredicate = Arc<dyn Fn(&Value) -> bool + Send + Sync>;

/// How a raw cell value is converted before formatting
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    #[default]
    Text,
    Date,
    Integer,
    Float,
}

/// Column descriptor.
///
/// `id` is a dotted path into the serialized row (`"address.city"`).
#[derive(Clone)]
pub struct ColumnDef {
    pub id: String,
    /// Translation key of the header.
    pub name: String,
    pub sortable: bool,
    /// Direction used when the column becomes the active sort.
    pub direction: SortDirection,
    /// Column holding the initial sort.
    pub sorted: bool,
    pub value_type: ValueType,
    pub formatter: Option<Formatter>,
    /// Key into the renderer registry.
    pub renderer: Option<String>,
    pub header_class: Option<String>,
    pub class: Option<String>,
}

impl ColumnDef {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            sortable: false,
            direction: SortDirection::Asc,
            sorted: false,
            value_type: ValueType::Text,
            formatter: None,
            renderer: None,
            header_class: None,
            class: None,
        }
    }

    pub fn sortable(mut self) -> Self {
        self.sortable = true;
        self
    }

    pub fn direction(mut self, direction: SortDirection) -> Self {
        self.direction = direction;
        self
    }

    /// Mark as the initially sorted column; implies sortable.
    pub fn sorted(mut self) -> Self {
        self.sortable = true;
        self.sorted = true;
        self
    }

    pub fn value_type(mut self, value_type: ValueType) -> Self {
        self.value_type = value_type;
        self
    }

    pub fn formatter<F>(mut self, formatter: F) -> Self
    where
        F: Fn(&Value, &Value) -> String + Send + Sync + 'static,
    {
        self.formatter = Some(Arc::new(formatter));
        self
    }

    pub fn renderer(mut self, key: impl Into<String>) -> Self {
        self.renderer = Some(key.into());
        self
    }

    pub fn classes(mut self, header: impl Into<String>, cell: impl Into<String>) -> Self {
        self.header_class = Some(header.into());
        self.class = Some(cell.into());
        self
    }
}

impl fmt::Debug for ColumnDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnDef")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("sortable", &self.sortable)
            .field("direction", &self.direction)
            .field("sorted", &self.sorted)
            .field("value_type", &self.value_type)
            .field("formatter", &self.formatter.as_ref().map(|_| "<fn>"))
            .field("renderer", &self.renderer)
            .finish_non_exhaustive()
    }
}

/// Identifier of a table or row action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ButtonAction {
    Create,
    Edit,
    Delete,
    View,
    Refresh,
    AutoRefresh,
    MultiCreate,
    OpenInMaps,
    ResetFilters,
    Export,
    More,
    Start,
    Stop,
}

impl_domain_status_conversions!(ButtonAction {
    Create => "create",
    Edit => "edit",
    Delete => "delete",
    View => "view",
    Refresh => "refresh",
    AutoRefresh => "auto-refresh",
    MultiCreate => "multi-create",
    OpenInMaps => "open_in_maps",
    ResetFilters => "reset-filters",
    Export => "export",
    More => "more",
    Start => "start",
    Stop => "stop",
});

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ActionKind {
    #[default]
    Button,
    /// On/off toggle carrying `current_value`.
    Slide,
    DropdownButton,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ButtonColor {
    #[default]
    Primary,
    Accent,
    Warn,
}

/// Action descriptor, shown in the table header or on each row.
#[derive(Clone)]
pub struct ActionDef {
    pub id: ButtonAction,
    pub kind: ActionKind,
    pub icon: String,
    pub color: ButtonColor,
    pub name: String,
    pub tooltip: String,
    pub disabled: bool,
    pub current_value: bool,
    pub dropdown_actions: Vec<ActionDef>,
    /// Row actions only: hidden when this returns false.
    pub visible_when: Option<RowPredicate>,
}

impl ActionDef {
    pub fn button(
        id: ButtonAction,
        icon: impl Into<String>,
        color: ButtonColor,
        name: impl Into<String>,
        tooltip: impl Into<String>,
    ) -> Self {
        Self {
            id,
            kind: ActionKind::Button,
            icon: icon.into(),
            color,
            name: name.into(),
            tooltip: tooltip.into(),
            disabled: false,
            current_value: false,
            dropdown_actions: Vec::new(),
            visible_when: None,
        }
    }

    pub fn create() -> Self {
        Self::button(
            ButtonAction::Create,
            "add",
            ButtonColor::Primary,
            "general.create",
            "general.tooltips.create",
        )
    }

    pub fn edit() -> Self {
        Self::button(
            ButtonAction::Edit,
            "edit",
            ButtonColor::Primary,
            "general.edit",
            "general.tooltips.edit",
        )
    }

    pub fn delete() -> Self {
        Self::button(
            ButtonAction::Delete,
            "delete",
            ButtonColor::Warn,
            "general.remove",
            "general.tooltips.delete",
        )
    }

    pub fn view() -> Self {
        Self::button(
            ButtonAction::View,
            "remove_red_eye",
            ButtonColor::Primary,
            "general.view",
            "general.tooltips.view",
        )
    }

    pub fn refresh() -> Self {
        Self::button(
            ButtonAction::Refresh,
            "refresh",
            ButtonColor::Primary,
            "general.refresh",
            "general.tooltips.refresh",
        )
    }

    /// Slide toggling periodic refresh.
    pub fn auto_refresh(enabled: bool) -> Self {
        Self {
            kind: ActionKind::Slide,
            current_value: enabled,
            ..Self::button(
                ButtonAction::AutoRefresh,
                "",
                ButtonColor::Primary,
                "general.auto_refresh",
                "general.tooltips.auto_refresh",
            )
        }
    }

    pub fn multi_create(dropdown_actions: Vec<ActionDef>) -> Self {
        Self {
            kind: ActionKind::DropdownButton,
            dropdown_actions,
            ..Self::button(
                ButtonAction::MultiCreate,
                "more_vert",
                ButtonColor::Primary,
                "general.create",
                "general.tooltips.create",
            )
        }
    }

    pub fn open_in_maps() -> Self {
        Self::button(
            ButtonAction::OpenInMaps,
            "location_on",
            ButtonColor::Primary,
            "general.open_in_maps",
            "general.tooltips.open_in_maps",
        )
    }

    pub fn reset_filters() -> Self {
        Self::button(
            ButtonAction::ResetFilters,
            "settings_backup_restore",
            ButtonColor::Primary,
            "general.reset_filters",
            "general.tooltips.reset_filters",
        )
    }

    pub fn visible_when<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        self.visible_when = Some(Arc::new(predicate));
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    pub fn is_visible_for(&self, row: &Value) -> bool {
        self.visible_when.as_ref().map_or(true, |predicate| predicate(row))
    }
}

impl fmt::Debug for ActionDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionDef")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("disabled", &self.disabled)
            .field("current_value", &self.current_value)
            .field("dropdown_actions", &self.dropdown_actions)
            .field("visible_when", &self.visible_when.as_ref().map(|_| "<fn>"))
            .finish_non_exhaustive()
    }
}

/// Table-wide behaviour flags
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableDef {
    pub class: Option<String>,
    pub search_enabled: bool,
    pub row_selection_enabled: bool,
    pub multiple_row_selection: bool,
    pub row_details_enabled: bool,
    /// Row actions depend on the row and are rebuilt per row.
    pub has_dynamic_row_action: bool,
    /// Entity name matched against change notifications.
    pub entity: Option<String>,
    /// View identifier under which filter variants are stored.
    pub view_id: Option<String>,
    /// Dotted path of a row field that already carries the row details.
    pub details_field: Option<String>,
    /// Renderer key drawing the expanded row from the row itself.
    pub detail_renderer: Option<String>,
}

impl TableDef {
    pub fn with_search(mut self) -> Self {
        self.search_enabled = true;
        self
    }

    pub fn with_row_selection(mut self, multiple: bool) -> Self {
        self.row_selection_enabled = true;
        self.multiple_row_selection = multiple;
        self
    }

    pub fn with_row_details(mut self) -> Self {
        self.row_details_enabled = true;
        self
    }

    pub fn with_dynamic_row_action(mut self) -> Self {
        self.has_dynamic_row_action = true;
        self
    }

    pub fn with_entity(mut self, entity: impl Into<String>) -> Self {
        self.entity = Some(entity.into());
        self
    }

    pub fn with_view_id(mut self, view_id: impl Into<String>) -> Self {
        self.view_id = Some(view_id.into());
        self
    }

    /// Expand rows from `path` on the row when it holds a value.
    pub fn with_details_field(mut self, path: impl Into<String>) -> Self {
        self.row_details_enabled = true;
        self.details_field = Some(path.into());
        self
    }

    /// Expand rows through a registered renderer, with no fetch.
    pub fn with_detail_renderer(mut self, key: impl Into<String>) -> Self {
        self.row_details_enabled = true;
        self.detail_renderer = Some(key.into());
        self
    }
}
