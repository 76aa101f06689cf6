//! Quota tracking from response headers

use parking_lot::RwLock;
use tracing::warn;
use zeropush_domain::constants::{
    HEADER_DEVICE_QUOTA, HEADER_DEVICE_QUOTA_OVERAGE, HEADER_DEVICE_QUOTA_REMAINING,
    HEADER_PUSH_QUOTA, HEADER_PUSH_QUOTA_OVERAGE, HEADER_PUSH_QUOTA_REMAINING,
    HEADER_PUSH_QUOTA_RESET,
};
use zeropush_domain::{QuotaSnapshot, Quotas};

use crate::ports::ResponseHeaders;

/// Latest quota values reported by the service.
///
/// Values only ever move from unknown to known or from one known value to
/// another; a response that omits a header leaves the previous value alone.
#[derive(Debug, Default)]
pub struct QuotaTracker {
    quotas: RwLock<Quotas>,
}

impl QuotaTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge any quota headers present in `headers`.
    pub fn update_from_headers(&self, headers: &ResponseHeaders) {
        let device = read_snapshot(
            headers,
            HEADER_DEVICE_QUOTA,
            HEADER_DEVICE_QUOTA_REMAINING,
            HEADER_DEVICE_QUOTA_OVERAGE,
            None,
        );
        let push = read_snapshot(
            headers,
            HEADER_PUSH_QUOTA,
            HEADER_PUSH_QUOTA_REMAINING,
            HEADER_PUSH_QUOTA_OVERAGE,
            Some(HEADER_PUSH_QUOTA_RESET),
        );

        if device.is_empty() && push.is_empty() {
            return;
        }

        let mut quotas = self.quotas.write();
        merge(&mut quotas.device, device);
        merge(&mut quotas.push, push);
    }

    pub fn device_quota(&self) -> QuotaSnapshot {
        self.quotas.read().device
    }

    pub fn push_quota(&self) -> QuotaSnapshot {
        self.quotas.read().push
    }

    pub fn quotas(&self) -> Quotas {
        *self.quotas.read()
    }
}

fn read_snapshot(
    headers: &ResponseHeaders,
    limit: &str,
    remaining: &str,
    overage: &str,
    reset: Option<&str>,
) -> QuotaSnapshot {
    QuotaSnapshot {
        limit: read_header(headers, limit),
        remaining: read_header(headers, remaining),
        overage: read_header(headers, overage),
        reset: reset.and_then(|name| read_header(headers, name)),
    }
}

fn read_header(headers: &ResponseHeaders, name: &str) -> Option<i64> {
    match headers.get_i64(name)? {
        Ok(value) => Some(value),
        Err(raw) => {
            warn!(header = name, value = raw, "Ignoring unparseable quota header");
            None
        }
    }
}

fn merge(target: &mut QuotaSnapshot, update: QuotaSnapshot) {
    if update.limit.is_some() {
        target.limit = update.limit;
    }
    if update.remaining.is_some() {
        target.remaining = update.remaining;
    }
    if update.overage.is_some() {
        target.overage = update.overage;
    }
    if update.reset.is_some() {
        target.reset = update.reset;
    }
}
