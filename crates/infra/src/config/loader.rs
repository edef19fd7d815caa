//! Configuration loader
//!
//! Loads the console configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. A `.env` file in the working directory is applied to the environment
//! 2. Attempts to load from environment variables
//! 3. If `EVDASH_CENTRAL_SERVER_URL` is missing, falls back to a file
//! 4. Probes multiple paths for config files (JSON or TOML)
//!
//! ## Environment Variables
//! - `EVDASH_CENTRAL_SERVER_URL`: REST base URL (required)
//! - `EVDASH_CENTRAL_SERVER_TIMEOUT_SECS`: request timeout in seconds
//! - `EVDASH_DEBOUNCE_TIME_SEARCH_MS`: search box quiet period
//! - `EVDASH_POLLING_INTERVAL_MS`: auto-refresh interval
//! - `EVDASH_PAGE_SIZES`: comma separated page size choices
//! - `EVDASH_DEFAULT_PAGE_SIZE`: page size of a fresh table
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./config.{json,toml}` then `./evdash.{json,toml}`
//! 2. `../config.{json,toml}` and `../../config.{json,toml}`
//! 3. The same names relative to the executable

use std::path::{Path, PathBuf};
use std::str::FromStr;

use evdash_domain::{AdvancedConfig, CentralServerConfig, ConsoleConfig, DashError, Result};

use crate::errors::InfraError;

const ENV_CENTRAL_SERVER_URL: &str = "EVDASH_CENTRAL_SERVER_URL";
const ENV_CENTRAL_SERVER_TIMEOUT: &str = "EVDASH_CENTRAL_SERVER_TIMEOUT_SECS";
const ENV_DEBOUNCE_TIME_SEARCH: &str = "EVDASH_DEBOUNCE_TIME_SEARCH_MS";
const ENV_POLLING_INTERVAL: &str = "EVDASH_POLLING_INTERVAL_MS";
const ENV_PAGE_SIZES: &str = "EVDASH_PAGE_SIZES";
const ENV_DEFAULT_PAGE_SIZE: &str = "EVDASH_DEFAULT_PAGE_SIZE";

const CONFIG_FILE_NAMES: [&str; 4] = ["config.json", "config.toml", "evdash.json", "evdash.toml"];
const PARENT_FILE_NAMES: [&str; 4] =
    ["../config.json", "../config.toml", "../../config.json", "../../config.toml"];

/// Load configuration with automatic fallback strategy
///
/// # Errors
/// Returns `DashError::Config` if:
/// - Configuration cannot be loaded from either source
/// - File format is invalid
/// - The loaded values are inconsistent (see [`validate`])
pub fn load() -> Result<ConsoleConfig> {
    if let Ok(path) = dotenvy::dotenv() {
        tracing::debug!(path = %path.display(), "Applied .env file");
    }

    match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            Ok(config)
        }
        Err(e) => {
            tracing::debug!(error = ?e, "Failed to load from environment, trying file");
            load_from_file(None)
        }
    }
}

/// Load configuration from environment variables
///
/// Only the central server URL is required; every other value falls back to
/// its default.
///
/// # Errors
/// Returns `DashError::Config` if the URL is missing or a value is invalid.
pub fn load_from_env() -> Result<ConsoleConfig> {
    let base_url = env_var(ENV_CENTRAL_SERVER_URL)?;
    let defaults = AdvancedConfig::default();

    let config = ConsoleConfig {
        central_server: CentralServerConfig {
            base_url,
            timeout_secs: env_parse(ENV_CENTRAL_SERVER_TIMEOUT)?
                .unwrap_or(CentralServerConfig::default().timeout_secs),
        },
        advanced: AdvancedConfig {
            debounce_time_search_millis: env_parse(ENV_DEBOUNCE_TIME_SEARCH)?
                .unwrap_or(defaults.debounce_time_search_millis),
            polling_interval_millis: env_parse(ENV_POLLING_INTERVAL)?
                .unwrap_or(defaults.polling_interval_millis),
            page_sizes: env_list(ENV_PAGE_SIZES)?.unwrap_or(defaults.page_sizes),
            default_page_size: env_parse(ENV_DEFAULT_PAGE_SIZE)?
                .unwrap_or(defaults.default_page_size),
        },
    };

    validate(&config)?;
    Ok(config)
}

/// Load configuration from a file
///
/// If `path` is `None`, probes multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Errors
/// Returns `DashError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
pub fn load_from_file(path: Option<PathBuf>) -> Result<ConsoleConfig> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(DashError::Config(format!("Config file not found: {}", p.display())));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            DashError::Config("No config file found in any of the standard locations".to_string())
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| DashError::from(InfraError::from(e)))?;

    let config = parse_config(&contents, &config_path)?;
    validate(&config)?;
    Ok(config)
}

/// Check the values the table layer relies on.
///
/// # Errors
/// Returns `DashError::Config` when the default page size is zero or not one
/// of the offered page sizes, or when the polling interval is zero.
pub fn validate(config: &ConsoleConfig) -> Result<()> {
    let advanced = &config.advanced;
    if advanced.default_page_size == 0 || advanced.page_sizes.contains(&0) {
        return Err(DashError::Config("page sizes must be greater than zero".into()));
    }
    if !advanced.page_sizes.is_empty() && !advanced.page_sizes.contains(&advanced.default_page_size)
    {
        return Err(DashError::Config(format!(
            "default page size {} is not one of {:?}",
            advanced.default_page_size, advanced.page_sizes
        )));
    }
    if advanced.polling_interval_millis == 0 {
        return Err(DashError::Config("polling interval must be greater than zero".into()));
    }
    Ok(())
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
fn parse_config(contents: &str, path: &Path) -> Result<ConsoleConfig> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents).map_err(|e| DashError::from(InfraError::from(e))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| DashError::Config(format!("Invalid JSON format: {e}"))),
        _ => Err(DashError::Config(format!("Unsupported config format: {extension}"))),
    }
}

/// Probe multiple paths for configuration files
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut candidates = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        candidates.extend(candidates_in(&cwd));
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            candidates.extend(candidates_in(exe_dir));
        }
    }

    candidates.into_iter().find(|path| path.exists())
}

fn candidates_in(dir: &Path) -> impl Iterator<Item = PathBuf> + '_ {
    CONFIG_FILE_NAMES.iter().chain(PARENT_FILE_NAMES.iter()).map(move |name| dir.join(name))
}

/// Get required environment variable
fn env_var(key: &str) -> Result<String> {
    std::env::var(key)
        .map_err(|_| DashError::Config(format!("Missing required environment variable: {key}")))
}

/// Parse an optional environment variable
fn env_parse<T>(key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| DashError::Config(format!("Invalid value for {key}: {e}"))),
        Err(_) => Ok(None),
    }
}

/// Parse an optional comma separated list, e.g. `25,50,100`
fn env_list(key: &str) -> Result<Option<Vec<u32>>> {
    let Ok(raw) = std::env::var(key) else {
        return Ok(None);
    };
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(|item| {
            item.parse::<u32>()
                .map_err(|e| DashError::Config(format!("Invalid value for {key}: {e}")))
        })
        .collect::<Result<Vec<_>>>()
        .map(Some)
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use once_cell::sync::Lazy;

    use super::*;

    static ENV_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

    const ALL_VARS: [&str; 6] = [
        ENV_CENTRAL_SERVER_URL,
        ENV_CENTRAL_SERVER_TIMEOUT,
        ENV_DEBOUNCE_TIME_SEARCH,
        ENV_POLLING_INTERVAL,
        ENV_PAGE_SIZES,
        ENV_DEFAULT_PAGE_SIZE,
    ];

    fn clear_env() {
        for key in ALL_VARS {
            std::env::remove_var(key);
        }
    }

    #[test]
    fn test_load_from_env_all_vars_set() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        std::env::set_var(ENV_CENTRAL_SERVER_URL, "https://ev.example/client/api");
        std::env::set_var(ENV_CENTRAL_SERVER_TIMEOUT, "10");
        std::env::set_var(ENV_DEBOUNCE_TIME_SEARCH, "300");
        std::env::set_var(ENV_POLLING_INTERVAL, "5000");
        std::env::set_var(ENV_PAGE_SIZES, "10, 20,50");
        std::env::set_var(ENV_DEFAULT_PAGE_SIZE, "20");

        let result = load_from_env();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.central_server.base_url, "https://ev.example/client/api");
        assert_eq!(config.central_server.timeout_secs, 10);
        assert_eq!(config.advanced.debounce_time_search_millis, 300);
        assert_eq!(config.advanced.polling_interval_millis, 5000);
        assert_eq!(config.advanced.page_sizes, vec![10, 20, 50]);
        assert_eq!(config.advanced.default_page_size, 20);
    }

    #[test]
    fn test_load_from_env_defaults_optional_values() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();
        std::env::set_var(ENV_CENTRAL_SERVER_URL, "https://ev.example");

        let result = load_from_env();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.central_server.timeout_secs, 30);
        assert_eq!(config.advanced, AdvancedConfig::default());
    }

    #[test]
    fn test_load_from_env_missing_url() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        let err = load_from_env().unwrap_err();
        assert!(matches!(err, DashError::Config(msg) if msg.contains(ENV_CENTRAL_SERVER_URL)));
    }

    #[test]
    fn test_load_from_env_invalid_number() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();
        std::env::set_var(ENV_CENTRAL_SERVER_URL, "https://ev.example");
        std::env::set_var(ENV_POLLING_INTERVAL, "soon");

        let result = load_from_env();
        clear_env();

        assert!(matches!(result, Err(DashError::Config(_))));
    }

    #[test]
    fn test_validate_rejects_unknown_default_page_size() {
        let mut config = ConsoleConfig::default();
        config.advanced.default_page_size = 30;
        assert!(validate(&config).is_err());

        config.advanced.default_page_size = 50;
        assert!(validate(&config).is_ok());

        config.advanced.polling_interval_millis = 0;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_parse_config_json() {
        let json_content = r#"{
            "central_server": {"base_url": "https://ev.example", "timeout_secs": 15},
            "advanced": {"polling_interval_millis": 10000}
        }"#;

        let config = parse_config(json_content, Path::new("test.json")).unwrap();
        assert_eq!(config.central_server.timeout_secs, 15);
        assert_eq!(config.advanced.polling_interval_millis, 10000);
    }

    #[test]
    fn test_parse_config_toml() {
        let toml_content = r#"
[central_server]
base_url = "https://ev.example"

[advanced]
page_sizes = [10, 20]
default_page_size = 10
"#;

        let config = parse_config(toml_content, Path::new("test.toml")).unwrap();
        assert_eq!(config.central_server.timeout_secs, 30);
        assert_eq!(config.advanced.page_sizes, vec![10, 20]);
    }

    #[test]
    fn test_parse_config_unsupported_format() {
        let result = parse_config("some content", Path::new("test.yaml"));
        assert!(result.is_err(), "Should fail with unsupported format");
    }

    #[test]
    fn test_load_from_file_not_found() {
        let result = load_from_file(Some(PathBuf::from("/nonexistent/config.json")));
        assert!(matches!(result, Err(DashError::Config(_))));
    }
}
