//! List query: the combined filter/sort/paging/search state driving one
//! fetch.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_LIMIT, DEFAULT_SKIP, PARAM_LIMIT, PARAM_SEARCH, PARAM_SKIP, PARAM_SORT_DIR,
    PARAM_SORT_FIELD,
};
use crate::errors::{DashError, Result};
use crate::impl_domain_status_conversions;
use crate::types::filter::FilterValue;

/// Sort direction of a column
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn toggle(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }
}

impl_domain_status_conversions!(SortDirection {
    Asc => "asc",
    Desc => "desc",
});

/// Active sort column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sort {
    pub column: String,
    pub direction: SortDirection,
}

impl Sort {
    pub fn new(column: impl Into<String>, direction: SortDirection) -> Self {
        Self { column: column.into(), direction }
    }
}

/// Offset/limit window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paging {
    pub skip: u32,
    pub limit: u32,
}

impl Default for Paging {
    fn default() -> Self {
        Self { skip: DEFAULT_SKIP, limit: DEFAULT_LIMIT }
    }
}

impl Paging {
    /// # Errors
    /// Returns `DashError::InvalidInput` when `limit` is zero.
    pub fn new(skip: u32, limit: u32) -> Result<Self> {
        if limit == 0 {
            return Err(DashError::InvalidInput("page size must be greater than 0".into()));
        }
        Ok(Self { skip, limit })
    }

    /// First page of the given size.
    pub fn first(limit: u32) -> Result<Self> {
        Self::new(0, limit)
    }

    pub fn page_index(&self) -> u32 {
        self.skip / self.limit
    }

    /// Change the page size, keeping `skip` on a page boundary at or before
    /// the current offset.
    pub fn with_page_size(self, limit: u32) -> Result<Self> {
        let resized = Self::new(0, limit)?;
        Ok(Self { skip: (self.skip / limit) * limit, ..resized })
    }

    pub fn with_page_index(self, index: u32) -> Self {
        Self { skip: index.saturating_mul(self.limit), ..self }
    }

    /// Window right after this one.
    pub fn next(self) -> Self {
        Self { skip: self.skip.saturating_add(self.limit), ..self }
    }

    pub fn reset(&mut self) {
        self.skip = 0;
    }
}

/// Combined query state of one table.
///
/// Every mutation of filters, sort or search puts the window back on the
/// first page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListQuery {
    /// Current filter values keyed by query parameter name.
    pub filters: BTreeMap<String, FilterValue>,
    /// Filters fixed by the view (e.g. `WithLogo=true`), never reset.
    pub static_filters: BTreeMap<String, String>,
    pub sort: Option<Sort>,
    pub paging: Paging,
    pub search: Option<String>,
}

impl ListQuery {
    pub fn new(limit: u32) -> Result<Self> {
        Ok(Self { paging: Paging::first(limit)?, ..Self::default() })
    }

    pub fn with_sort(mut self, sort: Sort) -> Self {
        self.sort = Some(sort);
        self
    }

    pub fn with_static_filter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.static_filters.insert(key.into(), value.into());
        self
    }

    pub fn set_filter(&mut self, key: impl Into<String>, value: FilterValue) {
        let key = key.into();
        if value.is_none() {
            self.filters.remove(&key);
        } else {
            self.filters.insert(key, value);
        }
        self.paging.reset();
    }

    pub fn replace_filters(&mut self, filters: BTreeMap<String, FilterValue>) {
        self.filters = filters;
        self.paging.reset();
    }

    pub fn set_sort(&mut self, sort: Sort) {
        self.sort = Some(sort);
        self.paging.reset();
    }

    /// Blank text clears the search.
    pub fn set_search(&mut self, text: &str) {
        let trimmed = text.trim();
        self.search = if trimmed.is_empty() { None } else { Some(trimmed.to_string()) };
        self.paging.reset();
    }

    pub fn set_page_size(&mut self, limit: u32) -> Result<()> {
        self.paging = self.paging.with_page_size(limit)?;
        Ok(())
    }

    pub fn set_paging(&mut self, paging: Paging) -> Result<()> {
        self.paging = Paging::new(paging.skip, paging.limit)?;
        Ok(())
    }

    /// Query parameters of the list endpoint, in a stable order.
    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params = Vec::new();
        if let Some(search) = &self.search {
            params.push((PARAM_SEARCH.to_string(), search.clone()));
        }
        for (key, value) in &self.filters {
            if let Some(value) = value.to_param() {
                params.push((key.clone(), value));
            }
        }
        for (key, value) in &self.static_filters {
            params.push((key.clone(), value.clone()));
        }
        params.push((PARAM_SKIP.to_string(), self.paging.skip.to_string()));
        params.push((PARAM_LIMIT.to_string(), self.paging.limit.to_string()));
        if let Some(sort) = &self.sort {
            params.push((PARAM_SORT_FIELD.to_string(), sort.column.clone()));
            params.push((PARAM_SORT_DIR.to_string(), sort.direction.to_string()));
        }
        params
    }
}
