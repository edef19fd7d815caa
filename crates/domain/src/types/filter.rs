//! Filter descriptors
//!
//! A filter is a self-contained value holder: it knows its kind, its
//! current value, the value it resets to, and how it renders into the
//! outgoing list query.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::FILTER_ALL_KEY;
use crate::errors::{DashError, Result};

/// Current value of a filter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum FilterValue {
    #[default]
    None,
    Key(String),
    Keys(Vec<String>),
    Date(DateTime<Utc>),
    Entity { key: String, label: String },
}

impl FilterValue {
    /// Render the value as a query parameter, `None` when it does not
    /// restrict the list.
    pub fn to_param(&self) -> Option<String> {
        match self {
            Self::None => None,
            Self::Key(key) if key == FILTER_ALL_KEY || key.is_empty() => None,
            Self::Key(key) => Some(key.clone()),
            Self::Keys(keys) => {
                let keys: Vec<&str> = keys
                    .iter()
                    .map(String::as_str)
                    .filter(|k| *k != FILTER_ALL_KEY && !k.is_empty())
                    .collect();
                if keys.is_empty() {
                    None
                } else {
                    Some(keys.join("|"))
                }
            }
            Self::Date(date) => Some(date.to_rfc3339_opts(SecondsFormat::Millis, true)),
            Self::Entity { key, .. } => Some(key.clone()),
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}

/// Dropdown entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyValue {
    pub key: String,
    pub value: String,
}

impl KeyValue {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self { key: key.into(), value: value.into() }
    }
}

/// The three filter flavours the console knows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FilterKind {
    Dropdown { items: Vec<KeyValue>, multiple: bool },
    Date,
    /// Value chosen in a modal listing entities (sites, users, chargers).
    DialogEntity { dialog: String },
}

/// Declarative filter with its current value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterDef {
    pub id: String,
    /// Query parameter name on the list endpoint.
    pub http_id: String,
    /// Translation key of the label.
    pub name: String,
    pub kind: FilterKind,
    pub current: FilterValue,
    pub default: FilterValue,
}

impl FilterDef {
    /// Dropdown filter defaulting to the "all" entry.
    pub fn dropdown(
        id: impl Into<String>,
        http_id: impl Into<String>,
        name: impl Into<String>,
        items: Vec<KeyValue>,
    ) -> Self {
        let default = FilterValue::Key(FILTER_ALL_KEY.to_string());
        Self {
            id: id.into(),
            http_id: http_id.into(),
            name: name.into(),
            kind: FilterKind::Dropdown { items, multiple: false },
            current: default.clone(),
            default,
        }
    }

    pub fn date(id: impl Into<String>, http_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            http_id: http_id.into(),
            name: name.into(),
            kind: FilterKind::Date,
            current: FilterValue::None,
            default: FilterValue::None,
        }
    }

    pub fn dialog(
        id: impl Into<String>,
        http_id: impl Into<String>,
        name: impl Into<String>,
        dialog: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            http_id: http_id.into(),
            name: name.into(),
            kind: FilterKind::DialogEntity { dialog: dialog.into() },
            current: FilterValue::None,
            default: FilterValue::None,
        }
    }

    /// Allow several dropdown entries at once.
    pub fn multiple(mut self) -> Self {
        if let FilterKind::Dropdown { multiple, .. } = &mut self.kind {
            *multiple = true;
        }
        self
    }

    /// Change the reset value; the current value follows.
    pub fn with_default(mut self, value: FilterValue) -> Self {
        self.current = value.clone();
        self.default = value;
        self
    }

    /// Set the current value after checking it suits the filter kind.
    pub fn set(&mut self, value: FilterValue) -> Result<()> {
        let accepted = match (&self.kind, &value) {
            (_, FilterValue::None)
            | (FilterKind::Dropdown { .. }, FilterValue::Key(_))
            | (FilterKind::Dropdown { multiple: true, .. }, FilterValue::Keys(_))
            | (FilterKind::Date, FilterValue::Date(_))
            | (FilterKind::DialogEntity { .. }, FilterValue::Entity { .. }) => true,
            _ => false,
        };
        if !accepted {
            return Err(DashError::InvalidInput(format!(
                "filter '{}' does not accept value {:?}",
                self.id, value
            )));
        }
        self.current = value;
        Ok(())
    }

    pub fn reset(&mut self) {
        self.current = self.default.clone();
    }

    /// `(http_id, value)` merged into the outgoing query, `None` when the
    /// current value does not restrict the list. The value is rendered by
    /// [`FilterValue::to_param`] when the query is sent.
    pub fn to_query_fragment(&self) -> Option<(String, FilterValue)> {
        self.current.to_param().map(|_| (self.http_id.clone(), self.current.clone()))
    }

    pub fn is_dialog(&self) -> bool {
        matches!(self.kind, FilterKind::DialogEntity { .. })
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn status_filter() -> FilterDef {
        FilterDef::dropdown(
            "status",
            "Status",
            "chargers.status",
            vec![KeyValue::new("all", "All"), KeyValue::new("Faulted", "Faulted")],
        )
    }

    #[test]
    fn dropdown_all_contributes_nothing() {
        let filter = status_filter();
        assert_eq!(filter.current, FilterValue::Key("all".into()));
        assert_eq!(filter.to_query_fragment(), None);
    }

    #[test]
    fn dropdown_value_renders_under_http_id() {
        let mut filter = status_filter();
        filter.set(FilterValue::Key("Faulted".into())).unwrap();
        assert_eq!(
            filter.to_query_fragment(),
            Some(("Status".into(), FilterValue::Key("Faulted".into())))
        );
    }

    #[test]
    fn multi_values_are_pipe_separated() {
        let mut filter = status_filter().multiple();
        filter.set(FilterValue::Keys(vec!["Faulted".into(), "Unavailable".into()])).unwrap();
        assert_eq!(filter.current.to_param().as_deref(), Some("Faulted|Unavailable"));
        assert_eq!(filter.to_query_fragment().unwrap().0, "Status");
    }

    #[test]
    fn single_dropdown_rejects_multiple_keys() {
        let mut filter = status_filter();
        assert!(filter.set(FilterValue::Keys(vec!["a".into()])).is_err());
        assert_eq!(filter.current, FilterValue::Key("all".into()));
    }

    #[test]
    fn date_filter_renders_rfc3339() {
        let mut filter = FilterDef::date("dateFrom", "StartDateTime", "general.from");
        let date = Utc.with_ymd_and_hms(2019, 1, 1, 0, 0, 0).unwrap();
        filter.set(FilterValue::Date(date)).unwrap();
        assert_eq!(filter.current.to_param().as_deref(), Some("2019-01-01T00:00:00.000Z"));
        assert!(filter.set(FilterValue::Key("x".into())).is_err());
    }

    #[test]
    fn reset_restores_default() {
        let mut filter = FilterDef::dialog("site", "SiteID", "sites.title", "sites")
            .with_default(FilterValue::Entity { key: "s1".into(), label: "HQ".into() });
        filter.set(FilterValue::Entity { key: "s2".into(), label: "Depot".into() }).unwrap();
        filter.reset();
        assert_eq!(
            filter.to_query_fragment(),
            Some(("SiteID".into(), FilterValue::Entity { key: "s1".into(), label: "HQ".into() }))
        );
    }
}
