//! Console constants
//!
//! Centralized location for the domain-level constants used by the table
//! layer.

use std::ops::RangeInclusive;

// Paging
pub const DEFAULT_LIMIT: u32 = 100;
pub const DEFAULT_SKIP: u32 = 0;
pub const DEFAULT_PAGE_SIZES: [u32; 4] = [25, 50, 100, 250];

// Filters
pub const FILTER_ALL_KEY: &str = "all";

// Search
pub const DEFAULT_DEBOUNCE_TIME_SEARCH_MS: u64 = 500;

// Polling
pub const DEFAULT_POLLING_INTERVAL_MS: u64 = 30_000;

// Routes
pub const LOGIN_ROUTE: &str = "/auth/login";

// Message keys
pub const MESSAGE_ERROR_BACKEND: &str = "general.error_backend";
pub const MESSAGE_NOT_AUTHORIZED: &str = "general.not_authorized";

// HTTP statuses with a dedicated reaction
pub const HTTP_STATUS_UNAUTHORIZED: u16 = 401;
pub const HTTP_STATUS_APP_UNAUTHORIZED_RANGE: RangeInclusive<u16> = 550..=559;

// Extra table columns
pub const SELECT_COLUMN_ID: &str = "select";
pub const DETAILS_COLUMN_ID: &str = "details";

// Query parameter names of the list endpoint
pub const PARAM_SEARCH: &str = "Search";
pub const PARAM_SKIP: &str = "Skip";
pub const PARAM_LIMIT: &str = "Limit";
pub const PARAM_SORT_FIELD: &str = "SortField";
pub const PARAM_SORT_DIR: &str = "SortDir";
