//! Integration tests for configuration loader
//!
//! Tests the end-to-end behavior of loading configuration from files.

use std::io::Write;

use evdash_domain::{AdvancedConfig, DashError};
use evdash_infra::config;
use tempfile::NamedTempFile;

fn config_file(suffix: &str, contents: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .prefix("evdash")
        .suffix(suffix)
        .tempfile()
        .expect("Failed to create temp file");
    file.write_all(contents.as_bytes()).expect("Failed to write to temp file");
    file
}

#[test]
fn test_load_config_from_json_file() -> anyhow::Result<()> {
    let file = config_file(
        ".json",
        r#"{
            "central_server": {
                "base_url": "https://ev.example/client/api",
                "timeout_secs": 20
            },
            "advanced": {
                "debounce_time_search_millis": 250,
                "polling_interval_millis": 15000,
                "page_sizes": [10, 25, 50],
                "default_page_size": 25
            }
        }"#,
    );

    let config = config::load_from_file(Some(file.path().to_path_buf()))?;

    assert_eq!(config.central_server.base_url, "https://ev.example/client/api");
    assert_eq!(config.central_server.timeout_secs, 20);
    assert_eq!(config.advanced.debounce_time_search_millis, 250);
    assert_eq!(config.advanced.polling_interval_millis, 15000);
    assert_eq!(config.advanced.page_sizes, vec![10, 25, 50]);
    assert_eq!(config.advanced.default_page_size, 25);
    Ok(())
}

#[test]
fn test_load_config_from_toml_file() -> anyhow::Result<()> {
    let file = config_file(
        ".toml",
        r#"
[central_server]
base_url = "https://ev.example/client/api"
"#,
    );

    let config = config::load_from_file(Some(file.path().to_path_buf()))?;

    assert_eq!(config.central_server.timeout_secs, 30);
    assert_eq!(config.advanced, AdvancedConfig::default());
    Ok(())
}

#[test]
fn test_inconsistent_file_is_rejected() {
    let file = config_file(
        ".json",
        r#"{
            "central_server": {"base_url": "https://ev.example"},
            "advanced": {"page_sizes": [10, 20], "default_page_size": 15}
        }"#,
    );

    let result = config::load_from_file(Some(file.path().to_path_buf()));
    assert!(matches!(result, Err(DashError::Config(msg)) if msg.contains("15")));
}

#[test]
fn test_malformed_toml_is_a_config_error() {
    let file = config_file(".toml", "[central_server\nbase_url = ");

    let result = config::load_from_file(Some(file.path().to_path_buf()));
    assert!(matches!(result, Err(DashError::Config(msg)) if msg.contains("TOML")));
}

#[test]
fn test_missing_central_server_section_fails() {
    let file = config_file(".json", r#"{"advanced": {}}"#);

    let result = config::load_from_file(Some(file.path().to_path_buf()));
    assert!(result.is_err());
}
