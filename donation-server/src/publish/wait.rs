//! Confirmation wait loop
//!
//! Fixed-interval polling against one shared deadline. The deadline is fixed
//! when the wait starts; "not yet" answers never move it. Cancellation and
//! the deadline are both checked while a poll round is in flight.

use futures::{StreamExt, stream};
use std::time::Duration;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use super::outcome::{Confirmation, LedgerBinding};
use crate::confirmation::{ChannelError, ConfirmationChannel, Lookup};

/// Upper bound on channel lookups in flight during one poll round
pub const MAX_CONCURRENT_LOOKUPS: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfirmationSettings {
    pub poll_interval: Duration,
    pub deadline_per_record: Duration,
}

impl Default for ConfirmationSettings {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(1),
            deadline_per_record: Duration::from_secs(60),
        }
    }
}

impl ConfirmationSettings {
    /// Shared deadline for a request of `records` records
    pub fn deadline_for(&self, records: usize) -> Duration {
        let n = u32::try_from(records).unwrap_or(u32::MAX);
        self.deadline_per_record.saturating_mul(n)
    }
}

#[derive(Debug)]
pub(crate) enum WaitResult {
    AllConfirmed(Vec<Confirmation>),
    TimedOut {
        confirmed: Vec<Confirmation>,
        pending: Vec<LedgerBinding>,
        waited: Duration,
    },
    Cancelled {
        pending: Vec<LedgerBinding>,
    },
    ChannelFailed(ChannelError),
}

/// Wait until every binding is confirmed, the deadline passes, or `cancel` fires.
///
/// `started` is the instant the publisher returned.
pub(crate) async fn await_confirmations(
    channel: &dyn ConfirmationChannel,
    settings: &ConfirmationSettings,
    bindings: Vec<LedgerBinding>,
    started: Instant,
    cancel: &CancellationToken,
) -> WaitResult {
    let window = settings.deadline_for(bindings.len());
    // Duration::MAX 之类的配置不能让 Instant 溢出
    let deadline = started
        .checked_add(window)
        .unwrap_or_else(|| started + Duration::from_secs(86_400 * 365));

    let mut pending = bindings;
    let mut confirmed: Vec<Confirmation> = Vec::with_capacity(pending.len());

    let mut ticker = tokio::time::interval(settings.poll_interval.max(Duration::from_millis(1)));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let expired = tokio::time::sleep_until(deadline);
    tokio::pin!(expired);

    let mut round: u32 = 0;
    loop {
        tokio::select! {
            biased;

            _ = cancel.cancelled() => {
                tracing::info!(pending = pending.len(), "Confirmation wait cancelled");
                return WaitResult::Cancelled { pending };
            }
            _ = &mut expired => {
                tracing::warn!(
                    pending = pending.len(),
                    confirmed = confirmed.len(),
                    waited_ms = window.as_millis() as u64,
                    "Confirmation deadline elapsed"
                );
                confirmed.sort_by_key(|c| c.binding.payload_index);
                return WaitResult::TimedOut { confirmed, pending, waited: window };
            }
            found = async {
                ticker.tick().await;
                poll_round(channel, &pending).await
            } => {
                round += 1;
                let found = match found {
                    Ok(found) => found,
                    Err(e) => {
                        tracing::error!(error = %e, round, "Confirmation channel failed");
                        return WaitResult::ChannelFailed(e);
                    }
                };
                tracing::debug!(round, found = found.len(), pending = pending.len(), "Confirmation poll");

                // found 按 pending 下标升序, 倒序移除保持下标有效
                for (idx, entry) in found.into_iter().rev() {
                    let binding = pending.remove(idx);
                    confirmed.push(Confirmation { binding, entry });
                }
                if pending.is_empty() {
                    confirmed.sort_by_key(|c| c.binding.payload_index);
                    return WaitResult::AllConfirmed(confirmed);
                }
            }
        }
    }
}

/// One lookup per pending id, at most [`MAX_CONCURRENT_LOOKUPS`] at a time.
/// Results come back in `pending` order; any hard error aborts the round.
async fn poll_round(
    channel: &dyn ConfirmationChannel,
    pending: &[LedgerBinding],
) -> Result<Vec<(usize, shared::ConfirmationEntry)>, ChannelError> {
    // Collected up front: a closure inside the stream trips rustc's
    // higher-ranked `Send` inference when this future is spawned.
    let requests: Vec<_> = pending.iter().map(|b| channel.lookup(&b.correlation_id)).collect();
    let mut lookups = stream::iter(requests)
        .buffered(MAX_CONCURRENT_LOOKUPS)
        .enumerate();
    let mut found = Vec::new();
    while let Some((idx, result)) = lookups.next().await {
        if let Lookup::Found(entry) = result? {
            found.push((idx, entry));
        }
    }
    Ok(found)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use shared::ConfirmationEntry;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Every id found after a per-id delay; tracks lookups in flight
    #[derive(Default)]
    struct SlowChannel {
        found: bool,
        inflight: AtomicUsize,
        peak: AtomicUsize,
        lookups: AtomicUsize,
    }

    #[async_trait]
    impl ConfirmationChannel for SlowChannel {
        async fn lookup(&self, correlation_id: &str) -> Result<Lookup, ChannelError> {
            let now = self.inflight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            // 下标越大返回越快, 完成顺序与提交顺序相反
            let n: u64 = correlation_id.trim_start_matches('c').parse().unwrap_or(0);
            tokio::time::sleep(Duration::from_millis(100 - n)).await;
            self.inflight.fetch_sub(1, Ordering::SeqCst);
            self.lookups.fetch_add(1, Ordering::SeqCst);
            Ok(if self.found {
                Lookup::Found(ConfirmationEntry::new(correlation_id, b"{}".to_vec(), 0))
            } else {
                Lookup::NotYetAvailable
            })
        }
    }

    fn bindings(n: usize) -> Vec<LedgerBinding> {
        (0..n)
            .map(|i| LedgerBinding {
                record_id: format!("r{i}"),
                correlation_id: format!("c{i}"),
                payload_index: i,
            })
            .collect()
    }

    #[tokio::test(start_paused = true)]
    async fn test_poll_round_is_bounded() {
        let channel = SlowChannel::default();
        let settings = ConfirmationSettings {
            poll_interval: Duration::from_secs(1),
            deadline_per_record: Duration::from_millis(50),
        };

        let result = await_confirmations(
            &channel,
            &settings,
            bindings(40),
            Instant::now(),
            &CancellationToken::new(),
        )
        .await;

        assert!(matches!(result, WaitResult::TimedOut { ref pending, .. } if pending.len() == 40));
        assert_eq!(channel.peak.load(Ordering::SeqCst), MAX_CONCURRENT_LOOKUPS);
        assert!(channel.lookups.load(Ordering::SeqCst) >= 40);
    }

    #[tokio::test(start_paused = true)]
    async fn test_poll_round_keeps_submission_order() {
        let channel = SlowChannel {
            found: true,
            ..Default::default()
        };
        let pending = bindings(20);

        let found = poll_round(&channel, &pending).await.unwrap();
        let order: Vec<usize> = found.iter().map(|(idx, _)| *idx).collect();
        assert_eq!(order, (0..20).collect::<Vec<_>>());
        for (idx, entry) in &found {
            assert_eq!(entry.correlation_id, pending[*idx].correlation_id);
        }
        assert!(channel.peak.load(Ordering::SeqCst) <= MAX_CONCURRENT_LOOKUPS);
    }

    #[test]
    fn test_deadline_scales_with_records() {
        let settings = ConfirmationSettings::default();
        assert_eq!(settings.deadline_for(1), Duration::from_secs(60));
        assert_eq!(settings.deadline_for(3), Duration::from_secs(180));
    }

    #[test]
    fn test_deadline_saturates() {
        let settings = ConfirmationSettings {
            poll_interval: Duration::from_secs(1),
            deadline_per_record: Duration::MAX,
        };
        assert_eq!(settings.deadline_for(2), Duration::MAX);
    }
}
