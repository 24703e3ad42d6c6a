//! Test doubles shared by the integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use donation_server::confirmation::{ChannelError, ConfirmationChannel, Lookup};
use donation_server::ledger::{LedgerError, LedgerPublisher, PublishResult, SubmitterIdentity};
use donation_server::store::{MemoryRecordStore, RecordStore, RecordTx, StoreError};
use parking_lot::Mutex;
use rust_decimal::Decimal;
use shared::models::{AddressInput, DomainRecord, RecordItem};
use shared::{ConfirmationEntry, LedgerPayload, PublicationKind};
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

pub const UID: &str = "uid_charity";
pub const DID: &str = "did:axn:charity";

pub fn funds_record() -> DomainRecord {
    DomainRecord::new(
        PublicationKind::Donate,
        UID,
        RecordItem::Funds {
            pay_type: "bank".into(),
            amount: Decimal::new(10000, 2),
            target_bank_card_num: Some("6222000011114321".into()),
        },
    )
    .with_donor("Alice", "personal")
    .with_target("uid_hospital", "City Hospital")
}

pub fn supplies_records(n: usize) -> Vec<DomainRecord> {
    (0..n)
        .map(|i| {
            DomainRecord::new(
                PublicationKind::Distribute,
                UID,
                RecordItem::Supplies {
                    way_bill_num: "700074134800".into(),
                    name: format!("item-{i}"),
                    number: 10,
                    unit: "box".into(),
                },
            )
            .with_target("uid_hospital", "City Hospital")
            .with_addresses(AddressInput::default(), AddressInput::default())
        })
        .collect()
}

// ========== Ledger publisher ==========

#[derive(Clone, Copy, Debug)]
pub enum PublishMode {
    /// One result per payload, ids `c1..cN`
    Accept,
    /// Drop the last result
    DropLast,
    Fail,
}

#[derive(Clone)]
pub struct FakePublisher {
    mode: PublishMode,
    delay: Duration,
    pub calls: Arc<AtomicUsize>,
    pub seen_dids: Arc<Mutex<Vec<String>>>,
    pub seen_payloads: Arc<Mutex<Vec<LedgerPayload>>>,
}

impl FakePublisher {
    pub fn new(mode: PublishMode) -> Self {
        Self {
            mode,
            delay: Duration::ZERO,
            calls: Arc::new(AtomicUsize::new(0)),
            seen_dids: Arc::default(),
            seen_payloads: Arc::default(),
        }
    }

    /// Simulated gateway latency
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LedgerPublisher for FakePublisher {
    async fn publish(
        &self,
        identity: &SubmitterIdentity,
        payloads: &[LedgerPayload],
    ) -> Result<Vec<PublishResult>, LedgerError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen_dids.lock().push(identity.did.clone());
        self.seen_payloads.lock().extend_from_slice(payloads);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let mut results: Vec<PublishResult> = (0..payloads.len())
            .map(|i| PublishResult {
                correlation_id: format!("c{}", i + 1),
                payload_index: i,
            })
            .collect();
        match self.mode {
            PublishMode::Accept => Ok(results),
            PublishMode::DropLast => {
                results.pop();
                Ok(results)
            }
            PublishMode::Fail => Err(LedgerError::Rejected {
                code: 500,
                message: "gateway unavailable".into(),
            }),
        }
    }
}

// ========== Confirmation channel ==========

#[derive(Clone, Copy, Debug)]
pub enum Script {
    /// Found from the n-th lookup of this id on (1-based)
    FoundAfter(usize),
    Never,
    /// Hard error on first lookup
    Broken,
}

/// Channel whose answers are scripted per correlation id; unknown ids are never found
#[derive(Clone, Default)]
pub struct ScriptedChannel {
    scripts: Arc<Mutex<HashMap<String, Script>>>,
    per_id: Arc<Mutex<HashMap<String, usize>>>,
    pub lookups: Arc<AtomicUsize>,
}

impl ScriptedChannel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn script(self, id: &str, script: Script) -> Self {
        self.scripts.lock().insert(id.to_string(), script);
        self
    }

    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ConfirmationChannel for ScriptedChannel {
    async fn lookup(&self, correlation_id: &str) -> Result<Lookup, ChannelError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        let n = {
            let mut per_id = self.per_id.lock();
            let n = per_id.entry(correlation_id.to_string()).or_insert(0);
            *n += 1;
            *n
        };
        let script = self
            .scripts
            .lock()
            .get(correlation_id)
            .copied()
            .unwrap_or(Script::Never);
        match script {
            Script::FoundAfter(k) if n >= k => Ok(Lookup::Found(ConfirmationEntry::new(
                correlation_id,
                format!(r#"{{"id":"{correlation_id}","block_num":{n}}}"#).into_bytes(),
                0,
            ))),
            Script::Broken => Err(ChannelError::Unavailable("redis down".into())),
            _ => Ok(Lookup::NotYetAvailable),
        }
    }
}

// ========== Record store ==========

/// Where a [`FlakyStore`] transaction fails
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FailPoint {
    Insert,
    Update,
    Commit,
}

/// Memory store whose transactions fail at one point; counts rollbacks
#[derive(Clone)]
pub struct FlakyStore {
    pub inner: MemoryRecordStore,
    fail_at: FailPoint,
    rollbacks: Arc<AtomicUsize>,
}

impl FlakyStore {
    pub fn new(fail_at: FailPoint) -> Self {
        Self {
            inner: MemoryRecordStore::new(),
            fail_at,
            rollbacks: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn rollbacks(&self) -> usize {
        self.rollbacks.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RecordStore for FlakyStore {
    async fn begin(&self) -> Result<Box<dyn RecordTx>, StoreError> {
        Ok(Box::new(FlakyTx {
            inner: self.inner.begin().await?,
            fail_at: self.fail_at,
            rollbacks: self.rollbacks.clone(),
        }))
    }
}

struct FlakyTx {
    inner: Box<dyn RecordTx>,
    fail_at: FailPoint,
    rollbacks: Arc<AtomicUsize>,
}

#[async_trait]
impl RecordTx for FlakyTx {
    async fn insert(&mut self, records: &[DomainRecord]) -> Result<(), StoreError> {
        if self.fail_at == FailPoint::Insert {
            return Err(StoreError::Duplicate(
                records.first().map(|r| r.id.clone()).unwrap_or_default(),
            ));
        }
        self.inner.insert(records).await
    }

    async fn update_ledger_ref(&mut self, record_id: &str, ledger_ref: &str) -> Result<(), StoreError> {
        if self.fail_at == FailPoint::Update {
            return Err(StoreError::NotFound(record_id.to_string()));
        }
        self.inner.update_ledger_ref(record_id, ledger_ref).await
    }

    async fn commit(self: Box<Self>) -> Result<(), StoreError> {
        if self.fail_at == FailPoint::Commit {
            // inner 被丢弃, 暂存写入随之作废
            return Err(StoreError::Database(sqlx::Error::PoolTimedOut));
        }
        self.inner.commit().await
    }

    async fn rollback(self: Box<Self>) -> Result<(), StoreError> {
        self.rollbacks.fetch_add(1, Ordering::SeqCst);
        self.inner.rollback().await
    }
}
