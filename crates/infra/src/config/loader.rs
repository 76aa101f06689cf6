//! Configuration loader
//!
//! Loads client configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If the auth token is not set there, falls back to loading from file
//! 3. Searches multiple paths for config files
//! 4. Supports JSON and TOML formats
//!
//! ## Environment Variables
//! - `ZEROPUSH_AUTH_TOKEN`: Server or application auth token (required)
//! - `ZEROPUSH_BASE_URL`: Service base URL
//! - `ZEROPUSH_TIMEOUT_SECS`: Per-request timeout in seconds
//! - `ZEROPUSH_FAN_OUT_CONCURRENCY`: Maximum in-flight requests per bulk call
//! - `ZEROPUSH_DEFAULT_PER_PAGE`: Page size for list operations
//!
//! ## File Locations
//! The loader searches the following paths (in order):
//! 1. `./zeropush.json` or `./zeropush.toml` (current working directory)
//! 2. `./config.json` or `./config.toml` (current working directory)
//! 3. The same names in the parent and grandparent directories
//! 4. Relative to executable location

use std::path::{Path, PathBuf};
use std::str::FromStr;

use zeropush_domain::{ClientConfig, PushError, Result};

use crate::errors::InfraError;

pub const ENV_AUTH_TOKEN: &str = "ZEROPUSH_AUTH_TOKEN";
pub const ENV_BASE_URL: &str = "ZEROPUSH_BASE_URL";
pub const ENV_TIMEOUT_SECS: &str = "ZEROPUSH_TIMEOUT_SECS";
pub const ENV_FAN_OUT_CONCURRENCY: &str = "ZEROPUSH_FAN_OUT_CONCURRENCY";
pub const ENV_DEFAULT_PER_PAGE: &str = "ZEROPUSH_DEFAULT_PER_PAGE";

const CONFIG_FILE_NAMES: [&str; 4] =
    ["zeropush.json", "zeropush.toml", "config.json", "config.toml"];

/// Load configuration with automatic fallback strategy
///
/// First attempts to load from environment variables. If the auth token is
/// missing there, falls back to loading from a config file.
///
/// # Errors
/// Returns `PushError::Config` if:
/// - Configuration cannot be loaded from either source
/// - File format is invalid
/// - The loaded configuration fails validation
pub fn load() -> Result<ClientConfig> {
    match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            Ok(config)
        }
        Err(e) => {
            tracing::debug!(error = %e, "Failed to load from environment, trying file");
            load_from_file(None)
        }
    }
}

/// Load configuration from environment variables
///
/// `ZEROPUSH_AUTH_TOKEN` must be set; every other variable falls back to the
/// default when absent.
///
/// # Errors
/// Returns `PushError::Config` if the token is missing or a numeric variable
/// does not parse.
pub fn load_from_env() -> Result<ClientConfig> {
    let defaults = ClientConfig::default();

    let config = ClientConfig {
        auth_token: Some(env_var(ENV_AUTH_TOKEN)?),
        base_url: std::env::var(ENV_BASE_URL).unwrap_or(defaults.base_url),
        timeout_secs: env_parse(ENV_TIMEOUT_SECS, defaults.timeout_secs)?,
        user_agent: defaults.user_agent,
        fan_out_concurrency: env_parse(ENV_FAN_OUT_CONCURRENCY, defaults.fan_out_concurrency)?,
        default_per_page: env_parse(ENV_DEFAULT_PER_PAGE, defaults.default_per_page)?,
    };

    config.validate()?;
    Ok(config)
}

/// Load configuration from a file
///
/// If `path` is `None`, searches multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Errors
/// Returns `PushError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
/// - The configuration fails validation
pub fn load_from_file(path: Option<PathBuf>) -> Result<ClientConfig> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(PushError::Config(format!("Config file not found: {}", p.display())));
            }
            p
        }
        None => search_config_paths().ok_or_else(|| {
            PushError::Config("No config file found in any of the standard locations".to_string())
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path).map_err(InfraError::from)?;

    let config = parse_config(&contents, &config_path)?;
    config.validate()?;
    Ok(config)
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
fn parse_config(contents: &str, path: &Path) -> Result<ClientConfig> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => Ok(toml::from_str(contents).map_err(InfraError::from)?),
        "json" => Ok(serde_json::from_str(contents).map_err(InfraError::from)?),
        _ => Err(PushError::Config(format!("Unsupported config format: {}", extension))),
    }
}

/// Search multiple paths for configuration files
///
/// Searches the current working directory, its parent and grandparent, then
/// the same locations relative to the executable.
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn search_config_paths() -> Option<PathBuf> {
    let mut roots = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        roots.push(cwd);
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            roots.push(exe_dir.to_path_buf());
        }
    }

    roots
        .iter()
        .flat_map(|root| [root.clone(), root.join(".."), root.join("../..")])
        .flat_map(|dir| CONFIG_FILE_NAMES.map(|name| dir.join(name)))
        .find(|path| path.exists())
}

/// Get required environment variable
///
/// # Errors
/// Returns `PushError::Config` if the variable is not set or blank.
fn env_var(key: &str) -> Result<String> {
    match std::env::var(key) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(PushError::Config(format!("Missing required environment variable: {}", key))),
    }
}

/// Parse an optional environment variable, using `default` when unset.
fn env_parse<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| PushError::Config(format!("Invalid value for {}: {}", key, e))),
        Err(_) => Ok(default),
    }
}
