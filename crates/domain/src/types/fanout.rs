//! Result set for operations applied to many device tokens or channels

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::PushError;

/// Identifies one item of a fan-out operation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FanOutKey {
    Device { device_token: String },
    Channel { channel: String },
    DeviceChannel { device_token: String, channel: String },
}

impl FanOutKey {
    pub fn device(token: impl Into<String>) -> Self {
        Self::Device { device_token: token.into() }
    }

    pub fn channel(name: impl Into<String>) -> Self {
        Self::Channel { channel: name.into() }
    }

    pub fn device_channel(token: impl Into<String>, channel: impl Into<String>) -> Self {
        Self::DeviceChannel { device_token: token.into(), channel: channel.into() }
    }

    pub fn device_token(&self) -> Option<&str> {
        match self {
            Self::Device { device_token } | Self::DeviceChannel { device_token, .. } => {
                Some(device_token)
            }
            Self::Channel { .. } => None,
        }
    }

    pub fn channel_name(&self) -> Option<&str> {
        match self {
            Self::Channel { channel } | Self::DeviceChannel { channel, .. } => Some(channel),
            Self::Device { .. } => None,
        }
    }
}

impl fmt::Display for FanOutKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Device { device_token } => write!(f, "device:{device_token}"),
            Self::Channel { channel } => write!(f, "channel:{channel}"),
            Self::DeviceChannel { device_token, channel } => {
                write!(f, "device:{device_token}@channel:{channel}")
            }
        }
    }
}

/// An item that completed successfully, with the server response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FanOutSuccess<R> {
    pub key: FanOutKey,
    pub response: R,
}

/// An item that failed, with its classified error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FanOutFailure {
    pub key: FanOutKey,
    pub error: PushError,
}

/// Outcome of a fan-out operation.
///
/// Every input key appears exactly once, in either `successes` or
/// `failures`. Entries are recorded in completion order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FanOutResult<R> {
    pub successes: Vec<FanOutSuccess<R>>,
    pub failures: Vec<FanOutFailure>,
}

impl<R> Default for FanOutResult<R> {
    fn default() -> Self {
        Self { successes: Vec::new(), failures: Vec::new() }
    }
}

impl<R> FanOutResult<R> {
    pub fn with_capacity(capacity: usize) -> Self {
        Self { successes: Vec::with_capacity(capacity), failures: Vec::new() }
    }

    /// Record the outcome for one key.
    pub fn record(&mut self, key: FanOutKey, outcome: Result<R, PushError>) {
        match outcome {
            Ok(response) => self.successes.push(FanOutSuccess { key, response }),
            Err(error) => self.failures.push(FanOutFailure { key, error }),
        }
    }

    /// Total number of items processed.
    pub fn len(&self) -> usize {
        self.successes.len() + self.failures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// `true` when no item failed.
    pub fn is_complete_success(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn success_keys(&self) -> impl Iterator<Item = &FanOutKey> {
        self.successes.iter().map(|s| &s.key)
    }

    pub fn failure_keys(&self) -> impl Iterator<Item = &FanOutKey> {
        self.failures.iter().map(|f| &f.key)
    }

    /// Convert the responses while keeping keys and failures intact.
    pub fn map<T, F>(self, mut f: F) -> FanOutResult<T>
    where
        F: FnMut(R) -> T,
    {
        FanOutResult {
            successes: self
                .successes
                .into_iter()
                .map(|s| FanOutSuccess { key: s.key, response: f(s.response) })
                .collect(),
            failures: self.failures,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_splits_outcomes() {
        let mut result = FanOutResult::default();
        result.record(FanOutKey::device("a"), Ok(1));
        result.record(FanOutKey::device("b"), Err(PushError::NotFound("b".into())));
        result.record(FanOutKey::device("c"), Ok(3));

        assert_eq!(result.len(), 3);
        assert!(!result.is_complete_success());
        assert_eq!(result.failure_keys().collect::<Vec<_>>(), vec![&FanOutKey::device("b")]);
        assert_eq!(result.success_keys().count(), 2);
    }

    #[test]
    fn test_key_accessors() {
        let key = FanOutKey::device_channel("tok", "news");
        assert_eq!(key.device_token(), Some("tok"));
        assert_eq!(key.channel_name(), Some("news"));
        assert_eq!(key.to_string(), "device:tok@channel:news");
        assert_eq!(FanOutKey::channel("news").device_token(), None);
    }

    #[test]
    fn test_map_preserves_keys() {
        let mut result = FanOutResult::default();
        result.record(FanOutKey::channel("x"), Ok(2));
        let mapped = result.map(|n| n * 10);
        assert_eq!(mapped.successes[0].response, 20);
        assert_eq!(mapped.successes[0].key, FanOutKey::channel("x"));
    }
}
