//! Charger table fixture shared by the integration tests.

use std::sync::Arc;
use std::time::Duration;

use evdash_core::{DataSource, RendererRegistry, TableDefinition, TableDefinitionBuilder};
use evdash_domain::{
    ActionDef, ColumnDef, FilterDef, KeyValue, SortDirection, TableDef, ValueType,
};
use serde_json::{json, Value};

use super::ports::{RecordingEndpoint, Ui};

pub const ENTITY: &str = "ChargingStation";
pub const VIEW_ID: &str = "chargers";

/// `count` chargers with ids `CS-01`, `CS-02`, ...
pub fn chargers(count: usize) -> Vec<Value> {
    (1..=count)
        .map(|n| {
            json!({
                "id": format!("CS-{n:02}"),
                "name": format!("Charger {n}"),
                "inactive": n % 2 == 0,
                "siteArea": {"name": "Depot"},
                "lastSeen": "2024-03-01T10:00:00Z"
            })
        })
        .collect()
}

pub fn charger_def() -> TableDef {
    TableDef::default()
        .with_search()
        .with_row_selection(true)
        .with_row_details()
        .with_entity(ENTITY)
        .with_view_id(VIEW_ID)
}

pub fn builder(def: TableDef, page_size: u32) -> TableDefinitionBuilder {
    TableDefinitionBuilder::new(def)
        .column(ColumnDef::new("id", "chargers.name").sorted())
        .column(ColumnDef::new("name", "general.name").sortable())
        .column(ColumnDef::new("siteArea.name", "chargers.site_area"))
        .column(
            ColumnDef::new("lastSeen", "chargers.last_seen")
                .sortable()
                .direction(SortDirection::Desc)
                .value_type(ValueType::Date),
        )
        .filter(FilterDef::dropdown(
            "status",
            "Status",
            "chargers.status",
            vec![
                KeyValue::new("all", "general.all"),
                KeyValue::new("Available", "chargers.status_available"),
                KeyValue::new("Faulted", "chargers.status_faulted"),
            ],
        ))
        .filter(FilterDef::dialog("site", "SiteID", "sites.title", "sites"))
        .filter(FilterDef::date("from", "StartDateTime", "general.from"))
        .action(ActionDef::create())
        .action(ActionDef::refresh())
        .action(ActionDef::auto_refresh(false))
        .action(ActionDef::reset_filters())
        .row_action(ActionDef::edit())
        .row_action(ActionDef::delete().visible_when(|row| row["inactive"] == json!(true)))
        .static_filter("WithSite", "true")
        .page_size(page_size)
        .polling_interval(Duration::from_secs(10))
        .search_debounce(Duration::from_millis(500))
        .error_message_key("chargers.load_error")
}

pub fn definition(page_size: u32) -> Arc<TableDefinition> {
    Arc::new(builder(charger_def(), page_size).build(&RendererRegistry::new()).unwrap())
}

/// Data source over `rows` with the default charger definition.
pub fn source(rows: Vec<Value>, page_size: u32) -> (DataSource<Value>, Arc<RecordingEndpoint>, Ui) {
    let endpoint = Arc::new(RecordingEndpoint::new(rows));
    let ui = Ui::new();
    let source = DataSource::<Value>::new(definition(page_size), endpoint.clone(), ui.collaborators());
    (source, endpoint, ui)
}
