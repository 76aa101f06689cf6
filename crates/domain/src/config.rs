//! Client configuration
//!
//! Every field has a default so partial JSON/TOML documents deserialize.

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_BASE_URL, DEFAULT_FAN_OUT_CONCURRENCY, DEFAULT_PER_PAGE, DEFAULT_TIMEOUT_SECS,
    DEFAULT_USER_AGENT, MAX_PER_PAGE,
};
use crate::errors::{PushError, Result};

/// Configuration for a ZeroPush client
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of the service (e.g., "https://api.zeropush.com")
    pub base_url: String,
    /// Server or application auth token
    pub auth_token: Option<String>,
    /// Per-request timeout applied by the transport
    pub timeout_secs: u64,
    pub user_agent: String,
    /// Maximum number of in-flight requests for one fan-out operation
    pub fan_out_concurrency: usize,
    /// Page size used by list operations when the caller gives none
    pub default_per_page: u32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            auth_token: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            fan_out_concurrency: DEFAULT_FAN_OUT_CONCURRENCY,
            default_per_page: DEFAULT_PER_PAGE,
        }
    }
}

impl ClientConfig {
    /// Default configuration carrying the given auth token.
    pub fn with_token(token: impl Into<String>) -> Self {
        Self { auth_token: Some(token.into()), ..Self::default() }
    }

    /// Check the configuration for values no client can run with.
    ///
    /// # Errors
    ///
    /// Returns [`PushError::Config`] when the base URL is blank, the timeout
    /// or fan-out concurrency is zero, or the default page size is outside
    /// `1..=100`.
    pub fn validate(&self) -> Result<()> {
        if self.base_url.trim().is_empty() {
            return Err(PushError::Config("base_url cannot be empty".into()));
        }
        if self.timeout_secs == 0 {
            return Err(PushError::Config("timeout_secs must be greater than zero".into()));
        }
        if self.fan_out_concurrency == 0 {
            return Err(PushError::Config("fan_out_concurrency must be greater than zero".into()));
        }
        if self.default_per_page == 0 || self.default_per_page > MAX_PER_PAGE {
            return Err(PushError::Config(format!(
                "default_per_page must be between 1 and {MAX_PER_PAGE}"
            )));
        }
        Ok(())
    }
}

// Keeps the token out of logs.
impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("auth_token", &self.auth_token.as_ref().map(|_| "<redacted>"))
            .field("timeout_secs", &self.timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("fan_out_concurrency", &self.fan_out_concurrency)
            .field("default_per_page", &self.default_per_page)
            .finish()
    }
}
