//! Conversions from external infrastructure errors into SDK errors.

use reqwest::Error as HttpError;
use zeropush_core::TransportError;
use zeropush_domain::PushError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub PushError);

impl From<InfraError> for PushError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<PushError> for InfraError {
    fn from(value: PushError) -> Self {
        InfraError(value)
    }
}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoPushError {
    fn into_push_error(self) -> PushError;
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → TransportError / PushError */
/* -------------------------------------------------------------------------- */

/// Describe a failed request that never produced a response.
pub fn transport_error(err: &HttpError) -> TransportError {
    if err.is_timeout() {
        return TransportError::timeout(format!("HTTP request timed out: {err}"));
    }

    #[cfg(not(target_arch = "wasm32"))]
    if err.is_connect() {
        return TransportError::new(format!("HTTP connection failure: {err}"));
    }

    if err.is_builder() {
        return TransportError::new(format!("invalid HTTP request: {err}"));
    }

    TransportError::new(err.to_string())
}

impl IntoPushError for HttpError {
    fn into_push_error(self) -> PushError {
        // Building the client is the only place a reqwest error surfaces
        // outside a request.
        if self.is_builder() {
            return PushError::Config(format!("failed to build HTTP client: {self}"));
        }
        PushError::Transport(transport_error(&self).to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_push_error())
    }
}

/* -------------------------------------------------------------------------- */
/* Configuration sources → PushError::Config */
/* -------------------------------------------------------------------------- */

impl IntoPushError for std::io::Error {
    fn into_push_error(self) -> PushError {
        PushError::Config(format!("Failed to read config file: {self}"))
    }
}

impl IntoPushError for toml::de::Error {
    fn into_push_error(self) -> PushError {
        PushError::Config(format!("Invalid TOML format: {self}"))
    }
}

impl IntoPushError for serde_json::Error {
    fn into_push_error(self) -> PushError {
        PushError::Config(format!("Invalid JSON format: {self}"))
    }
}

impl IntoPushError for url::ParseError {
    fn into_push_error(self) -> PushError {
        PushError::Config(format!("Invalid base URL: {self}"))
    }
}

impl From<std::io::Error> for InfraError {
    fn from(value: std::io::Error) -> Self {
        InfraError(value.into_push_error())
    }
}

impl From<toml::de::Error> for InfraError {
    fn from(value: toml::de::Error) -> Self {
        InfraError(value.into_push_error())
    }
}

impl From<serde_json::Error> for InfraError {
    fn from(value: serde_json::Error) -> Self {
        InfraError(value.into_push_error())
    }
}

impl From<url::ParseError> for InfraError {
    fn from(value: url::ParseError) -> Self {
        InfraError(value.into_push_error())
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */
