//! Configuration management

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_DEBOUNCE_TIME_SEARCH_MS, DEFAULT_LIMIT, DEFAULT_PAGE_SIZES,
    DEFAULT_POLLING_INTERVAL_MS,
};

/// Console configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsoleConfig {
    pub central_server: CentralServerConfig,
    #[serde(default)]
    pub advanced: AdvancedConfig,
}

/// Central server (REST backend) configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CentralServerConfig {
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Table behaviour tuning
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdvancedConfig {
    pub debounce_time_search_millis: u64,
    pub polling_interval_millis: u64,
    pub page_sizes: Vec<u32>,
    pub default_page_size: u32,
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for CentralServerConfig {
    fn default() -> Self {
        Self { base_url: "http://localhost:8090/client/api".to_string(), timeout_secs: 30 }
    }
}

impl Default for AdvancedConfig {
    fn default() -> Self {
        Self {
            debounce_time_search_millis: DEFAULT_DEBOUNCE_TIME_SEARCH_MS,
            polling_interval_millis: DEFAULT_POLLING_INTERVAL_MS,
            page_sizes: DEFAULT_PAGE_SIZES.to_vec(),
            default_page_size: DEFAULT_LIMIT,
        }
    }
}
