//! Filter registry
//!
//! Ordered set of filter descriptors keyed by id, with the current value of
//! each one.

use std::collections::BTreeMap;

use evdash_domain::{DashError, FilterDef, FilterKind, FilterValue, Result};
use tracing::debug;

use super::ports::EntityPicker;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterRegistry {
    filters: Vec<FilterDef>,
}

impl FilterRegistry {
    /// # Errors
    /// Returns `DashError::InvalidInput` when two filters share an id or an
    /// HTTP id.
    pub fn new(filters: Vec<FilterDef>) -> Result<Self> {
        for (index, filter) in filters.iter().enumerate() {
            let duplicate = filters[..index]
                .iter()
                .any(|other| other.id == filter.id || other.http_id == filter.http_id);
            if duplicate {
                return Err(DashError::InvalidInput(format!(
                    "duplicate filter '{}' ({})",
                    filter.id, filter.http_id
                )));
            }
        }
        Ok(Self { filters })
    }

    pub fn get(&self, filter_id: &str) -> Option<&FilterDef> {
        self.filters.iter().find(|filter| filter.id == filter_id)
    }

    fn get_mut(&mut self, filter_id: &str) -> Result<&mut FilterDef> {
        self.filters
            .iter_mut()
            .find(|filter| filter.id == filter_id)
            .ok_or_else(|| DashError::NotFound(format!("filter '{filter_id}'")))
    }

    pub fn set(&mut self, filter_id: &str, value: FilterValue) -> Result<()> {
        self.get_mut(filter_id)?.set(value)
    }

    pub fn reset(&mut self, filter_id: &str) -> Result<()> {
        self.get_mut(filter_id)?.reset();
        Ok(())
    }

    pub fn reset_all(&mut self) {
        for filter in &mut self.filters {
            filter.reset();
        }
    }

    /// Current values keyed by filter id (the shape stored in variants).
    pub fn values(&self) -> BTreeMap<String, FilterValue> {
        self.filters.iter().map(|filter| (filter.id.clone(), filter.current.clone())).collect()
    }

    /// Query fragments of the filters restricting the list, keyed by HTTP
    /// id (the shape carried by the list query).
    pub fn fragments(&self) -> BTreeMap<String, FilterValue> {
        self.filters.iter().filter_map(FilterDef::to_query_fragment).collect()
    }

    /// Apply a `filter id -> value` map, skipping ids this registry does
    /// not know. Filters missing from the map are reset.
    pub fn apply_values(&mut self, values: &BTreeMap<String, FilterValue>) {
        for filter in &mut self.filters {
            match values.get(&filter.id) {
                Some(value) => {
                    if let Err(err) = filter.set(value.clone()) {
                        debug!(filter = %filter.id, error = %err, "ignoring stored filter value");
                        filter.reset();
                    }
                }
                None => filter.reset(),
            }
        }
        for id in values.keys().filter(|id| self.get(id).is_none()) {
            debug!(filter = %id, "stored value for unknown filter ignored");
        }
    }

    /// Let the user pick a value for a dialog filter. Returns whether the
    /// value changed; a cancelled dialog leaves the filter untouched.
    pub async fn pick_from_dialog(
        &mut self,
        filter_id: &str,
        picker: &dyn EntityPicker,
    ) -> Result<bool> {
        let filter = self.get_mut(filter_id)?;
        let FilterKind::DialogEntity { dialog } = &filter.kind else {
            return Err(DashError::InvalidInput(format!("filter '{filter_id}' has no dialog")));
        };

        let Some(picked) = picker.pick(dialog, &filter.current).await else {
            debug!(filter = %filter_id, "filter dialog cancelled");
            return Ok(false);
        };
        if picked == filter.current {
            return Ok(false);
        }
        filter.set(picked)?;
        Ok(true)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FilterDef> {
        self.filters.iter()
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }
}
