//! Rows as held by a table: the backend record plus transient UI flags.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::impl_domain_status_conversions;

/// A record the table can display.
///
/// Records are serialized to JSON for cell value lookup, so any serde type
/// works; `record_id` identifies the row for details and notifications.
pub trait TableRecord: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    fn record_id(&self) -> String;

    fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

impl TableRecord for Value {
    fn record_id(&self) -> String {
        match self.get("id") {
            Some(Value::String(id)) => id.clone(),
            Some(Value::Number(id)) => id.to_string(),
            _ => String::new(),
        }
    }

    fn to_value(&self) -> Value {
        self.clone()
    }
}

/// One displayed row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowState<R> {
    pub row: R,
    pub expanded: bool,
    pub selected: bool,
    /// Lazily fetched detail payload, cached once loaded.
    pub details: Option<Value>,
}

impl<R> RowState<R> {
    pub fn new(row: R) -> Self {
        Self { row, expanded: false, selected: false, details: None }
    }
}

/// Wire shape of a list response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<R> {
    pub count: u64,
    pub result: Vec<R>,
}

impl<R> Page<R> {
    pub fn new(count: u64, result: Vec<R>) -> Self {
        Self { count, result }
    }

    pub fn empty() -> Self {
        Self { count: 0, result: Vec::new() }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FetchStatus {
    #[default]
    Idle,
    Loading,
    Loaded,
    Error,
}

impl_domain_status_conversions!(FetchStatus {
    Idle => "idle",
    Loading => "loading",
    Loaded => "loaded",
    Error => "error",
});
