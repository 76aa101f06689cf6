//! ZeroPush client: every endpoint operation of the service
//!
//! Each operation follows the same pipeline:
//! validate arguments, pass the credential gate, execute the request(s),
//! record quota headers. Bulk operations fan out and return a
//! [`FanOutResult`](zeropush_domain::FanOutResult).

mod channels;
mod devices;
mod notifications;

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;
use zeropush_common::validation::{SchemaName, SchemaValidator, ValidationError};
use zeropush_domain::{AuthStatus, ClientConfig, PushError, QuotaSnapshot, Quotas, Result, Violation};

use crate::auth::{AuthToken, CredentialGate};
use crate::executor::{ApiResponse, RequestExecutor};
use crate::ports::{HttpRequest, Transport};
use crate::quota::QuotaTracker;

/// Options for [`PushClient::register`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegisterOptions {
    /// Subscribe every token to each of these channels while registering
    pub channels: Option<Vec<String>>,
}

impl RegisterOptions {
    pub fn with_channels<I, S>(channels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { channels: Some(channels.into_iter().map(Into::into).collect()) }
    }
}

/// Client for the ZeroPush service
pub struct PushClient {
    executor: RequestExecutor,
    gate: CredentialGate,
    quotas: QuotaTracker,
    validator: Arc<SchemaValidator>,
    fan_out_concurrency: usize,
    default_per_page: u32,
}

impl PushClient {
    /// Create a client sending requests through `transport`.
    ///
    /// # Errors
    ///
    /// Returns [`PushError::Config`] if `config` is invalid. A missing token
    /// is not an error here; operations fail with
    /// [`PushError::MissingCredential`] instead.
    pub fn new(transport: Arc<dyn Transport>, config: &ClientConfig) -> Result<Self> {
        config.validate()?;
        let token = config.auth_token.clone().and_then(AuthToken::new);

        Ok(Self {
            executor: RequestExecutor::new(transport, token),
            gate: CredentialGate::new(),
            quotas: QuotaTracker::new(),
            validator: Arc::new(SchemaValidator::new()),
            fan_out_concurrency: config.fan_out_concurrency,
            default_per_page: config.default_per_page,
        })
    }

    /// Share an already built schema validator
    pub fn with_validator(mut self, validator: Arc<SchemaValidator>) -> Self {
        self.validator = validator;
        self
    }

    /// Check the auth token against the service.
    ///
    /// Only the first call (per client) reaches the network.
    pub async fn verify_credentials(&self) -> Result<()> {
        self.gate.verify(&self.executor).await
    }

    pub fn auth_status(&self) -> AuthStatus {
        self.gate.status()
    }

    pub fn device_quota(&self) -> QuotaSnapshot {
        self.quotas.device_quota()
    }

    pub fn push_quota(&self) -> QuotaSnapshot {
        self.quotas.push_quota()
    }

    pub fn quotas(&self) -> Quotas {
        self.quotas.quotas()
    }

    /// Execute an authenticated request and record its quota headers.
    async fn send<T: DeserializeOwned>(&self, request: HttpRequest) -> Result<T> {
        Ok(self.send_with_headers(request).await?.body)
    }

    async fn send_with_headers<T: DeserializeOwned>(
        &self,
        request: HttpRequest,
    ) -> Result<ApiResponse<T>> {
        let response = self.executor.execute::<T>(request).await?;
        self.quotas.update_from_headers(&response.headers);
        Ok(response)
    }

    fn check(&self, value: &Value, schema: SchemaName, message: &str) -> Result<()> {
        match self.validator.validate(value, schema) {
            None => Ok(()),
            Some(errors) => Err(invalid_payload(message, errors)),
        }
    }

    fn check_tokens(&self, tokens: &[String]) -> Result<()> {
        self.check(&string_list(tokens), SchemaName::DeviceTokens, DEVICE_TOKENS_MESSAGE)
    }

    fn check_channels(&self, channels: &[String]) -> Result<()> {
        self.check(&string_list(channels), SchemaName::Channels, CHANNELS_MESSAGE)
    }

    fn check_token(&self, token: &str) -> Result<()> {
        self.check(&Value::from(token), SchemaName::String, DEVICE_TOKEN_MESSAGE)
    }

    fn check_channel(&self, channel: &str) -> Result<()> {
        self.check(&Value::from(channel), SchemaName::Channel, CHANNEL_MESSAGE)
    }
}

const DEVICE_TOKENS_MESSAGE: &str =
    "Device tokens must be an array with at least one item or unique items of type string";
const DEVICE_TOKEN_MESSAGE: &str = "Device token must be a non-empty string";
const CHANNELS_MESSAGE: &str =
    "Channels must be an array with at least one item or unique items of type string";
const CHANNEL_MESSAGE: &str = "Channel must be a non-empty string";

fn invalid_payload(message: &str, errors: ValidationError) -> PushError {
    let violations =
        errors.errors.into_iter().map(|error| Violation::new(error.field, error.message)).collect();
    PushError::invalid_payload(message, violations)
}

fn to_strings<S: AsRef<str>>(items: &[S]) -> Vec<String> {
    items.iter().map(|item| item.as_ref().to_string()).collect()
}

fn string_list(items: &[String]) -> Value {
    Value::Array(items.iter().cloned().map(Value::String).collect())
}

/// Percent-encode one path segment
fn segment(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}
