//! Domain types and models

pub mod fanout;
pub mod notification;
pub mod quota;
pub mod responses;

use serde::{Deserialize, Serialize};

pub use fanout::{FanOutFailure, FanOutKey, FanOutResult, FanOutSuccess};
pub use notification::{
    AndroidNotification, IosAlert, IosMacosNotification, Notification, Platform,
    SafariNotification,
};
pub use quota::{QuotaDomain, QuotaSnapshot, Quotas};
pub use responses::{
    BroadcastResponse, ChannelInfo, DeviceInfo, InactiveToken, MessageResponse, NotifyResponse,
};

/// Authentication state of a client session.
///
/// Moves from `Unknown` to `Authenticated` or `Denied` at most once per
/// client; it never reverts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthStatus {
    Unknown,
    Authenticated,
    Denied,
}

crate::impl_wire_name_conversions!(AuthStatus {
    Unknown => "unknown",
    Authenticated => "authenticated",
    Denied => "denied",
});
