//! Concurrent fan-out over device tokens and channels
//!
//! One logical call becomes one request per key. Every key runs to
//! completion; a failure is recorded against its key and never stops the
//! siblings.

use std::future::Future;

use futures::stream::{self, StreamExt};
use tracing::{debug, info};
use zeropush_domain::{FanOutKey, FanOutResult, Result};

/// Run `op` for every key with at most `concurrency` requests in flight.
///
/// Returns after every key resolved. Outcomes are recorded in completion
/// order.
pub async fn fan_out<R, F, Fut>(keys: Vec<FanOutKey>, concurrency: usize, op: F) -> FanOutResult<R>
where
    F: Fn(FanOutKey) -> Fut,
    Fut: Future<Output = Result<R>>,
{
    let total = keys.len();
    let mut result = FanOutResult::with_capacity(total);

    let mut outcomes = stream::iter(keys)
        .map(|key| {
            let pending = op(key.clone());
            async move { (key, pending.await) }
        })
        .buffer_unordered(concurrency.max(1));

    while let Some((key, outcome)) = outcomes.next().await {
        if let Err(err) = &outcome {
            debug!(key = %key, error = %err, "Fan-out item failed");
        }
        result.record(key, outcome);
    }

    info!(total, failed = result.failures.len(), "Fan-out completed");
    result
}

/// One key per device token
pub fn device_keys(tokens: &[String]) -> Vec<FanOutKey> {
    tokens.iter().map(FanOutKey::device).collect()
}

/// One key per channel
pub fn channel_keys(channels: &[String]) -> Vec<FanOutKey> {
    channels.iter().map(FanOutKey::channel).collect()
}

/// One key per (device token, channel) pair, token-major
pub fn cross_product(tokens: &[String], channels: &[String]) -> Vec<FanOutKey> {
    tokens
        .iter()
        .flat_map(|token| {
            channels.iter().map(move |channel| FanOutKey::device_channel(token, channel))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use zeropush_domain::PushError;

    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_cross_product() {
        let keys = cross_product(&strings(&["a", "b"]), &strings(&["x", "y"]));
        assert_eq!(keys.len(), 4);
        assert_eq!(keys[0], FanOutKey::device_channel("a", "x"));
        assert_eq!(keys[3], FanOutKey::device_channel("b", "y"));
        assert!(cross_product(&strings(&["a"]), &[]).is_empty());
    }

    #[tokio::test]
    async fn test_failure_is_isolated() {
        let keys = device_keys(&strings(&["a", "b", "c"]));
        let result = fan_out(keys, 2, |key| async move {
            match key.device_token() {
                Some("b") => Err(PushError::NotFound("b".into())),
                _ => Ok(key.to_string()),
            }
        })
        .await;

        let successes: HashSet<_> = result.success_keys().cloned().collect();
        assert_eq!(
            successes,
            HashSet::from([FanOutKey::device("a"), FanOutKey::device("c")])
        );
        assert_eq!(result.failure_keys().collect::<Vec<_>>(), vec![&FanOutKey::device("b")]);
    }

    #[tokio::test]
    async fn test_every_key_runs_once() {
        let calls = AtomicUsize::new(0);
        let keys = channel_keys(&strings(&["1", "2", "3", "4", "5"]));
        let result = fan_out(keys, 0, |_| {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Ok(()) }
        })
        .await;

        assert_eq!(calls.load(Ordering::SeqCst), 5);
        assert_eq!(result.len(), 5);
        assert!(result.is_complete_success());
    }

    #[tokio::test]
    async fn test_empty_input() {
        let result: FanOutResult<()> = fan_out(Vec::new(), 4, |_| async { Ok(()) }).await;
        assert!(result.is_empty());
    }
}
