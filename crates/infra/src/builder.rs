//! One-stop construction of a ready [`PushClient`]

use std::sync::Arc;
use std::time::Duration;

use tracing::info;
use zeropush_common::validation::SchemaValidator;
use zeropush_core::{PushClient, Transport};
use zeropush_domain::{ClientConfig, Result};

use crate::config;
use crate::http::HttpClientBuilder;

/// Builds a [`PushClient`] over the `reqwest` transport.
///
/// ```no_run
/// # async fn run() -> zeropush_domain::Result<()> {
/// use zeropush_infra::ZeroPushBuilder;
///
/// let client = ZeroPushBuilder::new().auth_token("server-token").build()?;
/// client.verify_credentials().await?;
/// # Ok(())
/// # }
/// ```
pub struct ZeroPushBuilder {
    config: ClientConfig,
    connect_attempts: usize,
    system_proxy: bool,
    transport: Option<Arc<dyn Transport>>,
    validator: Option<Arc<SchemaValidator>>,
}

impl Default for ZeroPushBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ZeroPushBuilder {
    pub fn new() -> Self {
        Self::from_config(ClientConfig::default())
    }

    pub fn from_config(config: ClientConfig) -> Self {
        Self { config, connect_attempts: 1, system_proxy: true, transport: None, validator: None }
    }

    /// Start from [`config::load`] (environment first, then config files).
    pub fn from_env() -> Result<Self> {
        Ok(Self::from_config(config::load()?))
    }

    pub fn auth_token(mut self, token: impl Into<String>) -> Self {
        self.config.auth_token = Some(token.into());
        self
    }

    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config.base_url = base_url.into();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout_secs = timeout.as_secs().max(1);
        self
    }

    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = agent.into();
        self
    }

    pub fn fan_out_concurrency(mut self, concurrency: usize) -> Self {
        self.config.fan_out_concurrency = concurrency;
        self
    }

    pub fn default_per_page(mut self, per_page: u32) -> Self {
        self.config.default_per_page = per_page;
        self
    }

    /// Attempts for requests that fail to connect. Defaults to 1 (no retry).
    pub fn connect_attempts(mut self, attempts: usize) -> Self {
        self.connect_attempts = attempts.max(1);
        self
    }

    /// Ignore `HTTP_PROXY`/`HTTPS_PROXY` and connect directly.
    pub fn no_proxy(mut self) -> Self {
        self.system_proxy = false;
        self
    }

    /// Use a custom transport instead of the `reqwest` one.
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Share one compiled schema validator across clients.
    pub fn validator(mut self, validator: Arc<SchemaValidator>) -> Self {
        self.validator = Some(validator);
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// # Errors
    ///
    /// [`PushError::Config`](zeropush_domain::PushError::Config) when the
    /// configuration is invalid or the HTTP client cannot be built.
    pub fn build(self) -> Result<PushClient> {
        self.config.validate()?;

        let transport = match self.transport {
            Some(transport) => transport,
            None => {
                let mut http = HttpClientBuilder::from_config(&self.config)
                    .max_attempts(self.connect_attempts);
                if !self.system_proxy {
                    http = http.no_proxy();
                }
                Arc::new(http.build()?) as Arc<dyn Transport>
            }
        };

        let mut client = PushClient::new(transport, &self.config)?;
        if let Some(validator) = self.validator {
            client = client.with_validator(validator);
        }

        info!(base_url = %self.config.base_url, "ZeroPush client ready");
        Ok(client)
    }
}
