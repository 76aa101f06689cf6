//! Service constants
//!
//! Centralized location for wire-level names and defaults shared by every
//! layer of the SDK.

// Service endpoint
pub const DEFAULT_BASE_URL: &str = "https://api.zeropush.com";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_USER_AGENT: &str = concat!("zeropush-rs/", env!("CARGO_PKG_VERSION"));

// Credential check
pub const AUTH_TOKEN_PARAM: &str = "auth_token";
pub const AUTHENTICATED_MESSAGE: &str = "authenticated";

// Pagination
pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_PER_PAGE: u32 = 25;
pub const MAX_PER_PAGE: u32 = 100;

// Fan-out
pub const DEFAULT_FAN_OUT_CONCURRENCY: usize = 16;

// Quota response headers (lowercase, matched case-insensitively)
pub const HEADER_DEVICE_QUOTA: &str = "x-device-quota";
pub const HEADER_DEVICE_QUOTA_REMAINING: &str = "x-device-quota-remaining";
pub const HEADER_DEVICE_QUOTA_OVERAGE: &str = "x-device-quota-overage";
pub const HEADER_PUSH_QUOTA: &str = "x-push-quota";
pub const HEADER_PUSH_QUOTA_REMAINING: &str = "x-push-quota-remaining";
pub const HEADER_PUSH_QUOTA_OVERAGE: &str = "x-push-quota-overage";
pub const HEADER_PUSH_QUOTA_RESET: &str = "x-push-quota-reset";

// Pagination header
pub const HEADER_LINK: &str = "link";
