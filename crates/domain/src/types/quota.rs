//! Usage quota snapshots reported by the service

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// The two independently tracked quota domains
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuotaDomain {
    Device,
    Push,
}

/// Latest known counters for one quota domain.
///
/// Every field is individually optional: a value stays `None` until the
/// first response carrying the matching header.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotaSnapshot {
    pub limit: Option<i64>,
    pub remaining: Option<i64>,
    pub overage: Option<i64>,
    /// Unix timestamp (seconds) at which the quota resets
    pub reset: Option<i64>,
}

impl QuotaSnapshot {
    /// `true` until any header for this domain has been seen.
    pub fn is_empty(&self) -> bool {
        self.limit.is_none()
            && self.remaining.is_none()
            && self.overage.is_none()
            && self.reset.is_none()
    }

    /// Reset instant as a UTC date-time, if known and representable.
    pub fn reset_at(&self) -> Option<DateTime<Utc>> {
        self.reset.and_then(|secs| Utc.timestamp_opt(secs, 0).single())
    }

    /// Whether the service reported usage beyond the limit.
    pub fn is_over_quota(&self) -> bool {
        self.overage.is_some_and(|overage| overage > 0)
    }
}

/// Snapshot of both quota domains
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quotas {
    pub device: QuotaSnapshot,
    pub push: QuotaSnapshot,
}

impl Quotas {
    pub fn get(&self, domain: QuotaDomain) -> QuotaSnapshot {
        match domain {
            QuotaDomain::Device => self.device,
            QuotaDomain::Push => self.push,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_snapshot() {
        let snapshot = QuotaSnapshot::default();
        assert!(snapshot.is_empty());
        assert!(snapshot.reset_at().is_none());
        assert!(!snapshot.is_over_quota());
    }

    #[test]
    fn test_reset_at_converts_epoch_seconds() {
        let snapshot = QuotaSnapshot { reset: Some(1_700_000_000), ..QuotaSnapshot::default() };
        let reset = snapshot.reset_at().unwrap();
        assert_eq!(reset.timestamp(), 1_700_000_000);
        assert!(!snapshot.is_empty());
    }

    #[test]
    fn test_overage_flag() {
        let snapshot = QuotaSnapshot { overage: Some(3), ..QuotaSnapshot::default() };
        assert!(snapshot.is_over_quota());
        let quotas = Quotas { push: snapshot, ..Quotas::default() };
        assert!(quotas.get(QuotaDomain::Push).is_over_quota());
        assert!(quotas.get(QuotaDomain::Device).is_empty());
    }
}
