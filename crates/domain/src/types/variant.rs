//! Saved filter sets ("variants")

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::filter::FilterValue;

/// A named set of filter values stored for a view.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variant {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(rename = "viewID")]
    pub view_id: String,
    /// Empty for global variants.
    #[serde(rename = "userID", default)]
    pub user_id: String,
    #[serde(default)]
    pub filters: Vec<VariantFilter>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantFilter {
    #[serde(rename = "filterID")]
    pub filter_id: String,
    #[serde(rename = "filterContent")]
    pub filter_content: FilterValue,
}

impl Variant {
    pub fn new(
        name: impl Into<String>,
        view_id: impl Into<String>,
        user_id: impl Into<String>,
    ) -> Self {
        Self {
            id: String::new(),
            name: name.into(),
            view_id: view_id.into(),
            user_id: user_id.into(),
            filters: Vec::new(),
        }
    }

    /// Replace the stored filters with the given `filter id -> value` map.
    pub fn set_filters(&mut self, values: &BTreeMap<String, FilterValue>) {
        self.filters = values
            .iter()
            .map(|(filter_id, value)| VariantFilter {
                filter_id: filter_id.clone(),
                filter_content: value.clone(),
            })
            .collect();
    }

    pub fn filter_values(&self) -> BTreeMap<String, FilterValue> {
        self.filters.iter().map(|f| (f.filter_id.clone(), f.filter_content.clone())).collect()
    }

    pub fn is_persisted(&self) -> bool {
        !self.id.is_empty()
    }
}
