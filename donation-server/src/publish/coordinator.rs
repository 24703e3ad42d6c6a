//! Publish-Commit-Confirm Coordinator
//!
//! ```text
//! Validating ─► Persisting ─► Publishing ─► commit ─► AwaitingConfirmation
//!     │             │              │                        ├─► Confirmed
//!     └─────────────┴──────────────┴─► Failed (rollback)    ├─► TimedOut
//!                                                           ├─► Cancelled
//!                                                           └─► Failed (committed)
//! ```
//!
//! The transaction is committed before the wait starts, so a slow ledger
//! never holds a database lock, and nothing after commit can undo the
//! record ↔ correlation id binding.

use shared::ledger;
use shared::models::DomainRecord;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, Span};

use super::error::PublishError;
use super::outcome::{Committed, LedgerBinding, Outcome, PublishState};
use super::validate::validate_batch;
use super::wait::{ConfirmationSettings, WaitResult, await_confirmations};
use crate::confirmation::ConfirmationChannel;
use crate::ledger::{IdentityResolver, LedgerPublisher, PublishResult};
use crate::store::{RecordStore, ScopedTx};

/// Per-request execution context
///
/// The coordinator logs only inside `span`, and only `cancel` can stop the
/// confirmation wait early.
#[derive(Debug, Clone)]
pub struct ExecutionContext {
    pub request_id: String,
    pub cancel: CancellationToken,
    pub span: Span,
}

impl ExecutionContext {
    pub fn new(request_id: impl Into<String>) -> Self {
        let request_id = request_id.into();
        let span = tracing::info_span!(
            "publish",
            request_id = %request_id,
            records = tracing::field::Empty,
        );
        Self {
            request_id,
            cancel: CancellationToken::new(),
            span,
        }
    }

    pub fn with_cancel(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }
}

#[derive(Clone)]
pub struct PublishCoordinator {
    store: Arc<dyn RecordStore>,
    identities: Arc<dyn IdentityResolver>,
    publisher: Arc<dyn LedgerPublisher>,
    channel: Arc<dyn ConfirmationChannel>,
    settings: ConfirmationSettings,
}

impl PublishCoordinator {
    pub fn new(
        store: Arc<dyn RecordStore>,
        identities: Arc<dyn IdentityResolver>,
        publisher: Arc<dyn LedgerPublisher>,
        channel: Arc<dyn ConfirmationChannel>,
    ) -> Self {
        Self {
            store,
            identities,
            publisher,
            channel,
            settings: ConfirmationSettings::default(),
        }
    }

    pub fn with_settings(mut self, settings: ConfirmationSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn settings(&self) -> &ConfirmationSettings {
        &self.settings
    }

    /// Persist, publish, commit, then wait for every correlation id.
    pub async fn execute(&self, records: Vec<DomainRecord>, ctx: &ExecutionContext) -> Outcome {
        let span = ctx.span.clone();
        span.record("records", records.len());
        let outcome = self.run(records, ctx).instrument(span.clone()).await;

        let _guard = span.enter();
        match &outcome {
            Outcome::Failed { error, committed } => tracing::warn!(
                state = %outcome.state(),
                stage = error.stage(),
                committed = committed.is_some(),
                error = %error,
                "Publish finished"
            ),
            _ => tracing::info!(state = %outcome.state(), "Publish finished"),
        }
        outcome
    }

    async fn run(&self, records: Vec<DomainRecord>, ctx: &ExecutionContext) -> Outcome {
        tracing::debug!(state = %PublishState::Validating);
        if let Err(e) = validate_batch(&records) {
            return Outcome::failed(PublishError::Validation(e));
        }
        let Some(submitter) = records.first().map(|r| r.uid.clone()) else {
            return Outcome::failed(PublishError::Validation(crate::utils::AppError::validation(
                "No records to publish",
            )));
        };

        tracing::info!(state = %PublishState::Persisting);
        let mut tx = match ScopedTx::begin(self.store.as_ref()).await {
            Ok(tx) => tx,
            Err(e) => return Outcome::failed(e),
        };

        // 事务内: 插入 → 发布 → 回写 ledger_ref; 只有全部成功才提交
        let (bindings, published_at) = match self.persist_and_publish(&mut tx, &records, &submitter).await {
            Ok(staged) => staged,
            Err(e) => {
                tx.rollback().await;
                return Outcome::failed(e);
            }
        };

        if let Err(e) = tx.commit().await {
            tracing::error!(
                error = %e,
                ledger_refs = ?bindings.iter().map(|b| b.correlation_id.as_str()).collect::<Vec<_>>(),
                "Commit failed after ledger accepted the submission"
            );
            return Outcome::failed(e);
        }
        let committed = Committed { bindings };

        tracing::info!(
            state = %PublishState::AwaitingConfirmation,
            ledger_refs = ?committed.ledger_refs(),
        );
        let waited = await_confirmations(
            self.channel.as_ref(),
            &self.settings,
            committed.bindings.clone(),
            published_at,
            &ctx.cancel,
        )
        .await;

        match waited {
            WaitResult::AllConfirmed(confirmations) => Outcome::Confirmed {
                committed,
                confirmations,
            },
            WaitResult::TimedOut {
                confirmed,
                pending,
                waited,
            } => Outcome::TimedOut {
                committed,
                confirmed,
                pending,
                waited,
            },
            WaitResult::Cancelled { pending } => Outcome::Cancelled { committed, pending },
            WaitResult::ChannelFailed(e) => Outcome::Failed {
                error: e.into(),
                committed: Some(committed),
            },
        }
    }

    /// Everything that must roll back together. Returns the bindings and the
    /// instant the publisher returned (start of the confirmation deadline).
    async fn persist_and_publish(
        &self,
        tx: &mut ScopedTx,
        records: &[DomainRecord],
        submitter: &str,
    ) -> Result<(Vec<LedgerBinding>, Instant), PublishError> {
        tx.insert(records).await?;

        tracing::info!(state = %PublishState::Publishing);
        let payloads = records
            .iter()
            .map(ledger::build_for)
            .collect::<Result<Vec<_>, _>>()?;
        let identity = self.identities.resolve(submitter).await?;
        let results = self.publisher.publish(&identity, &payloads).await?;
        let published_at = Instant::now();

        let bindings = bind_results(records, results)?;
        for binding in &bindings {
            tx.update_ledger_ref(&binding.record_id, &binding.correlation_id)
                .await?;
        }
        Ok((bindings, published_at))
    }
}

/// Result `i` must belong to payload `i`; anything else is a protocol violation.
fn bind_results(
    records: &[DomainRecord],
    results: Vec<PublishResult>,
) -> Result<Vec<LedgerBinding>, PublishError> {
    if results.len() != records.len() {
        return Err(PublishError::Protocol(format!(
            "ledger returned {} results for {} payloads",
            results.len(),
            records.len()
        )));
    }

    let mut seen = HashSet::with_capacity(results.len());
    records
        .iter()
        .zip(results)
        .enumerate()
        .map(|(i, (record, result))| {
            if result.payload_index != i {
                return Err(PublishError::Protocol(format!(
                    "result {i} carries payload index {}",
                    result.payload_index
                )));
            }
            if result.correlation_id.trim().is_empty() {
                return Err(PublishError::Protocol(format!(
                    "empty correlation id for payload {i}"
                )));
            }
            if !seen.insert(result.correlation_id.clone()) {
                return Err(PublishError::Protocol(format!(
                    "correlation id {} returned twice",
                    result.correlation_id
                )));
            }
            Ok(LedgerBinding {
                record_id: record.id.clone(),
                correlation_id: result.correlation_id,
                payload_index: i,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use shared::PublicationKind;
    use shared::models::RecordItem;

    fn records(n: usize) -> Vec<DomainRecord> {
        (0..n)
            .map(|_| {
                DomainRecord::new(
                    PublicationKind::Donate,
                    "u1",
                    RecordItem::Funds {
                        pay_type: "wechat".into(),
                        amount: Decimal::ONE,
                        target_bank_card_num: None,
                    },
                )
            })
            .collect()
    }

    fn result(id: &str, index: usize) -> PublishResult {
        PublishResult {
            correlation_id: id.into(),
            payload_index: index,
        }
    }

    #[test]
    fn test_bind_results_in_order() {
        let recs = records(2);
        let bindings = bind_results(&recs, vec![result("c0", 0), result("c1", 1)]).unwrap();
        assert_eq!(bindings[1].record_id, recs[1].id);
        assert_eq!(bindings[1].correlation_id, "c1");
    }

    #[test]
    fn test_bind_results_count_mismatch() {
        let err = bind_results(&records(3), vec![result("c0", 0), result("c1", 1)]).unwrap_err();
        assert!(matches!(err, PublishError::Protocol(_)));
    }

    #[test]
    fn test_bind_results_order_mismatch() {
        let err = bind_results(&records(2), vec![result("c1", 1), result("c0", 0)]).unwrap_err();
        assert!(matches!(err, PublishError::Protocol(_)));
    }

    #[test]
    fn test_bind_results_duplicate_correlation_id() {
        let err = bind_results(&records(2), vec![result("c", 0), result("c", 1)]).unwrap_err();
        assert!(matches!(err, PublishError::Protocol(_)));
    }
}
