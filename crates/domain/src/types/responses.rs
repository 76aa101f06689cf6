//! Response bodies returned by the service
//!
//! All fields default so that sparse or evolving responses still decode.

use serde::{Deserialize, Serialize};

/// Generic `{ "message": ... }` acknowledgement
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MessageResponse {
    pub message: Option<String>,
}

/// Result of a targeted notify call
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotifyResponse {
    pub sent_count: u64,
    /// Tokens the service has marked inactive
    pub inactive_tokens: Vec<String>,
    /// Tokens that are not registered with the service
    pub unregistered_tokens: Vec<String>,
    pub message: Option<String>,
}

/// Result of a broadcast call
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BroadcastResponse {
    pub sent_count: u64,
    pub message: Option<String>,
}

/// Registered device as reported by the service
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceInfo {
    pub token: String,
    pub active: bool,
    pub marked_inactive_at: Option<String>,
    pub badge: Option<i64>,
    pub channels: Vec<String>,
}

/// Channel with its subscribed device tokens
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelInfo {
    pub channel: String,
    pub device_tokens: Vec<String>,
}

/// Device token the service stopped delivering to
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InactiveToken {
    pub device_token: String,
    pub marked_inactive_at: Option<String>,
}
