//! Integration tests for configuration loader
//!
//! Tests the end-to-end behavior of loading configuration from files and
//! the environment, and building a client from the result.

use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;

use once_cell::sync::Lazy;
use tempfile::NamedTempFile;
use zeropush_domain::{AuthStatus, ClientConfig, PushError};
use zeropush_infra::config::{self, loader};
use zeropush_infra::ZeroPushBuilder;

static ENV_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

fn write_config(contents: &str, extension: &str) -> PathBuf {
    let mut temp_file = NamedTempFile::new().expect("Failed to create temp file");
    temp_file.write_all(contents.as_bytes()).expect("Failed to write to temp file");

    let path = temp_file.path().with_extension(extension);
    std::fs::copy(temp_file.path(), &path).expect("Failed to copy file");
    path
}

#[test]
fn test_load_config_from_json_file() {
    let path = write_config(
        r#"{
        "auth_token": "json-token",
        "base_url": "https://push.example.com",
        "timeout_secs": 10,
        "fan_out_concurrency": 8,
        "default_per_page": 50
    }"#,
        "json",
    );

    let config = config::load_from_file(Some(path.clone())).expect("Failed to load JSON config");

    assert_eq!(config.auth_token.as_deref(), Some("json-token"));
    assert_eq!(config.base_url, "https://push.example.com");
    assert_eq!(config.timeout_secs, 10);
    assert_eq!(config.fan_out_concurrency, 8);
    assert_eq!(config.default_per_page, 50);
    assert_eq!(config.user_agent, ClientConfig::default().user_agent);

    std::fs::remove_file(path).ok();
}

#[test]
fn test_load_config_from_toml_file() {
    let path = write_config(
        r#"
auth_token = "toml-token"
timeout_secs = 5
user_agent = "acme-backend/2.1"
"#,
        "toml",
    );

    let config = config::load_from_file(Some(path.clone())).expect("Failed to load TOML config");

    assert_eq!(config.auth_token.as_deref(), Some("toml-token"));
    assert_eq!(config.timeout_secs, 5);
    assert_eq!(config.user_agent, "acme-backend/2.1");
    assert_eq!(config.base_url, ClientConfig::default().base_url);

    std::fs::remove_file(path).ok();
}

#[test]
fn test_invalid_file_values_are_rejected() {
    let path = write_config(r#"{ "auth_token": "abc", "fan_out_concurrency": 0 }"#, "json");

    let result = config::load_from_file(Some(path.clone()));
    assert!(
        matches!(result, Err(PushError::Config(ref msg)) if msg.contains("fan_out_concurrency"))
    );

    std::fs::remove_file(path).ok();
}

#[test]
fn test_malformed_json_is_config_error() {
    let path = write_config(r#"{ "auth_token": "#, "json");

    let result = config::load_from_file(Some(path.clone()));
    assert!(matches!(result, Err(PushError::Config(_))));

    std::fs::remove_file(path).ok();
}

#[test]
fn test_file_config_builds_client() {
    let path = write_config(r#"{ "auth_token": "file-token" }"#, "json");

    let config = config::load_from_file(Some(path.clone())).unwrap();
    let client = ZeroPushBuilder::from_config(config).build().unwrap();
    assert_eq!(client.auth_status(), AuthStatus::Unknown);

    std::fs::remove_file(path).ok();
}

#[test]
fn test_builder_from_env() {
    let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
    std::env::set_var(loader::ENV_AUTH_TOKEN, "env-token");
    std::env::set_var(loader::ENV_FAN_OUT_CONCURRENCY, "3");

    let builder = ZeroPushBuilder::from_env().expect("Failed to load config from env");
    assert_eq!(builder.config().auth_token.as_deref(), Some("env-token"));
    assert_eq!(builder.config().fan_out_concurrency, 3);
    assert!(builder.build().is_ok());

    std::env::remove_var(loader::ENV_AUTH_TOKEN);
    std::env::remove_var(loader::ENV_FAN_OUT_CONCURRENCY);
}
