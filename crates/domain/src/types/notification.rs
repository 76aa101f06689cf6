//! Notification payloads per platform
//!
//! The SDK forwards payloads as-is after validation; it never interprets
//! their content.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Target platform of a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    Android,
    IosMacos,
    Safari,
}

crate::impl_wire_name_conversions!(Platform {
    Android => "android",
    IosMacos => "ios_macos",
    Safari => "safari",
});

impl Platform {
    /// Every supported platform, in wire-name order.
    pub const ALL: [Platform; 3] = [Platform::Android, Platform::IosMacos, Platform::Safari];
}

/// `alert` field of an iOS/macOS notification: plain text or an APNs
/// alert dictionary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IosAlert {
    Text(String),
    Dictionary(Map<String, Value>),
}

/// iOS / macOS (APNs) notification
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IosMacosNotification {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alert: Option<IosAlert>,
    /// Absolute (`"5"`) or relative (`"+1"`, `"-1"`) badge value
    #[serde(skip_serializing_if = "Option::is_none")]
    pub badge: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sound: Option<String>,
    /// Custom data delivered alongside the notification
    #[serde(skip_serializing_if = "Option::is_none")]
    pub info: Option<Value>,
    /// Expiry as a unix timestamp in seconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiry: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_available: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl IosMacosNotification {
    /// Notification with a plain-text alert.
    pub fn alert(text: impl Into<String>) -> Self {
        Self { alert: Some(IosAlert::Text(text.into())), ..Self::default() }
    }

    pub fn with_badge(mut self, badge: impl Into<String>) -> Self {
        self.badge = Some(badge.into());
        self
    }

    pub fn with_sound(mut self, sound: impl Into<String>) -> Self {
        self.sound = Some(sound.into());
        self
    }

    pub fn with_info(mut self, info: Value) -> Self {
        self.info = Some(info);
        self
    }

    pub fn with_expiry(mut self, expiry: i64) -> Self {
        self.expiry = Some(expiry);
        self
    }

    /// Mark the notification as a silent background update.
    pub fn content_available(mut self) -> Self {
        self.content_available = Some(true);
        self
    }
}

/// Safari web push notification
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SafariNotification {
    pub title: String,
    pub body: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Values substituted into the website's URL format string
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub url_args: Vec<String>,
}

impl SafariNotification {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self { title: title.into(), body: body.into(), ..Self::default() }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_url_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.url_args = args.into_iter().map(Into::into).collect();
        self
    }
}

/// Android (GCM) notification
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AndroidNotification {
    pub data: Map<String, Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collapse_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delay_while_idle: Option<bool>,
    /// Seconds the message is kept if the device is offline
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_to_live: Option<i64>,
}

impl AndroidNotification {
    pub fn new(data: Map<String, Value>) -> Self {
        Self { data, ..Self::default() }
    }

    pub fn with_collapse_key(mut self, key: impl Into<String>) -> Self {
        self.collapse_key = Some(key.into());
        self
    }

    pub fn with_time_to_live(mut self, seconds: i64) -> Self {
        self.time_to_live = Some(seconds);
        self
    }
}

/// A notification tagged with its platform.
#[derive(Debug, Clone, PartialEq)]
pub enum Notification {
    Android(AndroidNotification),
    IosMacos(IosMacosNotification),
    Safari(SafariNotification),
}

impl Notification {
    pub fn platform(&self) -> Platform {
        match self {
            Self::Android(_) => Platform::Android,
            Self::IosMacos(_) => Platform::IosMacos,
            Self::Safari(_) => Platform::Safari,
        }
    }

    /// The payload as a JSON object, ready for validation and encoding.
    ///
    /// # Errors
    ///
    /// Fails only if a custom `info`/`data` value cannot be represented as
    /// JSON.
    pub fn to_payload(&self) -> serde_json::Result<Value> {
        match self {
            Self::Android(n) => serde_json::to_value(n),
            Self::IosMacos(n) => serde_json::to_value(n),
            Self::Safari(n) => serde_json::to_value(n),
        }
    }
}

impl From<AndroidNotification> for Notification {
    fn from(value: AndroidNotification) -> Self {
        Self::Android(value)
    }
}

impl From<IosMacosNotification> for Notification {
    fn from(value: IosMacosNotification) -> Self {
        Self::IosMacos(value)
    }
}

impl From<SafariNotification> for Notification {
    fn from(value: SafariNotification) -> Self {
        Self::Safari(value)
    }
}
