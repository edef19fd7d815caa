//! Presentation contract of a table
//!
//! [`TableView`] answers what the rendering layer asks while drawing one
//! snapshot: which columns to show, what text goes in a cell, which
//! renderer draws it and where the paginator stands. It holds no state of
//! its own.

use chrono::{DateTime, SecondsFormat, Utc};
use evdash_domain::constants::{DETAILS_COLUMN_ID, SELECT_COLUMN_ID};
use evdash_domain::{ColumnDef, RowState, SortDirection, TableRecord, ValueType};
use serde_json::{Number, Value};

use super::data_source::TableSnapshot;
use super::renderers::RenderFn;

pub struct TableView<R> {
    snapshot: TableSnapshot<R>,
}

impl<R: TableRecord> TableView<R> {
    pub fn new(snapshot: TableSnapshot<R>) -> Self {
        Self { snapshot }
    }

    pub fn snapshot(&self) -> &TableSnapshot<R> {
        &self.snapshot
    }

    pub fn rows(&self) -> &[RowState<R>] {
        &self.snapshot.rows
    }

    pub fn columns(&self) -> &[ColumnDef] {
        self.snapshot.definition.columns()
    }

    /// Column ids in display order, including the details expander and the
    /// selection checkbox when enabled.
    pub fn displayed_columns(&self) -> Vec<String> {
        let def = self.snapshot.definition.def();
        let mut displayed = Vec::with_capacity(self.columns().len() + 2);
        if def.row_details_enabled {
            displayed.push(DETAILS_COLUMN_ID.to_string());
        }
        if def.row_selection_enabled {
            displayed.push(SELECT_COLUMN_ID.to_string());
        }
        displayed.extend(self.columns().iter().map(|column| column.id.clone()));
        displayed
    }

    /// Text of a cell: the value at the column's path, converted to the
    /// column's type and passed through its formatter. `None` for an
    /// unknown row or column.
    pub fn cell_value(&self, row_index: usize, column_id: &str) -> Option<String> {
        let column = self.snapshot.definition.column(column_id)?;
        let row = self.snapshot.rows.get(row_index)?.row.to_value();
        let value = convert(resolve_path(&row, &column.id).unwrap_or(&Value::Null), column.value_type);
        Some(match &column.formatter {
            Some(format) => format(&value, &row),
            None => plain_text(&value),
        })
    }

    pub fn cell_renderer(&self, column_id: &str) -> Option<RenderFn> {
        self.snapshot.definition.renderer(column_id)
    }

    /// Cell content through the column's renderer, or its text.
    pub fn render_cell(&self, row_index: usize, column_id: &str) -> Option<String> {
        let Some(render) = self.cell_renderer(column_id) else {
            return self.cell_value(row_index, column_id);
        };
        let row = self.snapshot.rows.get(row_index)?.row.to_value();
        let value = resolve_path(&row, column_id).cloned().unwrap_or(Value::Null);
        Some(render(&value, &row))
    }

    /// Expanded content of a row through the table's detail renderer,
    /// given the cached details (or null) and the row.
    pub fn render_details(&self, row_index: usize) -> Option<String> {
        let render = self.snapshot.definition.detail_renderer()?;
        let state = self.snapshot.rows.get(row_index)?;
        let details = state.details.clone().unwrap_or(Value::Null);
        Some(render(&details, &state.row.to_value()))
    }

    /// Number of pages; zero for an empty table.
    pub fn page_count(&self) -> u64 {
        let limit = u64::from(self.snapshot.query.paging.limit.max(1));
        self.snapshot.count.div_ceil(limit)
    }

    pub fn page_index(&self) -> u32 {
        self.snapshot.query.paging.page_index()
    }

    pub fn sort_indicator(&self, column_id: &str) -> Option<SortDirection> {
        self.snapshot
            .query
            .sort
            .as_ref()
            .filter(|sort| sort.column == column_id)
            .map(|sort| sort.direction)
    }
}

/// Resolve a dotted path (`siteArea.site.name`, `connectors.0.status`).
pub fn resolve_path<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(value, |current, segment| match current {
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|index| items.get(index)),
        _ => current.get(segment),
    })
}

fn convert(value: &Value, value_type: ValueType) -> Value {
    match value_type {
        ValueType::Text => value.clone(),
        ValueType::Date => parse_date(value)
            .map(|date| Value::String(date.to_rfc3339_opts(SecondsFormat::Secs, true)))
            .unwrap_or(Value::Null),
        ValueType::Integer => match value {
            Value::Number(number) => number
                .as_i64()
                .or_else(|| number.as_f64().map(|float| float.trunc() as i64))
                .map(Value::from)
                .unwrap_or(Value::Null),
            Value::String(text) => text.trim().parse::<i64>().map(Value::from).unwrap_or(Value::Null),
            _ => Value::Null,
        },
        ValueType::Float => {
            let float = match value {
                Value::Number(number) => number.as_f64(),
                Value::String(text) => text.trim().parse::<f64>().ok(),
                _ => None,
            };
            float.and_then(Number::from_f64).map(Value::Number).unwrap_or(Value::Null)
        }
    }
}

/// RFC 3339 strings or epoch milliseconds.
fn parse_date(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(text) => DateTime::parse_from_rfc3339(text).ok().map(|date| date.with_timezone(&Utc)),
        Value::Number(number) => number.as_i64().and_then(DateTime::from_timestamp_millis),
        _ => None,
    }
}

fn plain_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
