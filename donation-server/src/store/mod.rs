//! Record Store
//!
//! Transactional persistence of publication records. The coordinator only
//! sees [`RecordStore`] / [`RecordTx`]; every write it makes goes through a
//! [`ScopedTx`] that is committed on the success path and rolled back
//! everywhere else.
//!
//! - [`SqliteRecordStore`]: sqlx transaction per publish
//! - [`MemoryRecordStore`]: staged writes applied on commit (tests, local runs)

mod memory;
mod sqlite;

pub use memory::MemoryRecordStore;
pub use sqlite::SqliteRecordStore;

use async_trait::async_trait;
use shared::models::DomainRecord;
use shared::PublicationKind;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("record not found: {0}")]
    NotFound(String),

    #[error("record already exists: {0}")]
    Duplicate(String),

    #[error("corrupt row for record {id}: {reason}")]
    Corrupt { id: String, reason: String },

    #[error("transaction already finished")]
    Closed,
}

/// Minimal view of a persisted record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredRecord {
    pub id: String,
    pub kind: PublicationKind,
    pub ledger_ref: Option<String>,
}

#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Open a transaction. Dropping the handle without `commit` discards its writes.
    async fn begin(&self) -> Result<Box<dyn RecordTx>, StoreError>;
}

/// One open transaction
#[async_trait]
pub trait RecordTx: Send {
    /// Insert records together with their address and proof image rows
    async fn insert(&mut self, records: &[DomainRecord]) -> Result<(), StoreError>;

    /// Bind the ledger correlation id to a record inserted earlier
    async fn update_ledger_ref(&mut self, record_id: &str, ledger_ref: &str)
    -> Result<(), StoreError>;

    async fn commit(self: Box<Self>) -> Result<(), StoreError>;

    async fn rollback(self: Box<Self>) -> Result<(), StoreError>;
}

/// Scoped transaction handle
///
/// Only [`ScopedTx::commit`] makes the writes durable. Every other way out
/// (explicit rollback, early return, panic, the owning future being dropped)
/// ends in a rollback.
pub struct ScopedTx {
    inner: Option<Box<dyn RecordTx>>,
}

impl ScopedTx {
    pub async fn begin(store: &dyn RecordStore) -> Result<Self, StoreError> {
        Ok(Self {
            inner: Some(store.begin().await?),
        })
    }

    fn handle(&mut self) -> Result<&mut Box<dyn RecordTx>, StoreError> {
        self.inner.as_mut().ok_or(StoreError::Closed)
    }

    pub async fn insert(&mut self, records: &[DomainRecord]) -> Result<(), StoreError> {
        self.handle()?.insert(records).await
    }

    pub async fn update_ledger_ref(
        &mut self,
        record_id: &str,
        ledger_ref: &str,
    ) -> Result<(), StoreError> {
        self.handle()?.update_ledger_ref(record_id, ledger_ref).await
    }

    pub async fn commit(mut self) -> Result<(), StoreError> {
        match self.inner.take() {
            Some(tx) => tx.commit().await,
            None => Err(StoreError::Closed),
        }
    }

    /// Roll back; a failing rollback is logged, the writes are gone either way
    pub async fn rollback(mut self) {
        if let Some(tx) = self.inner.take()
            && let Err(e) = tx.rollback().await
        {
            tracing::warn!(error = %e, "Rollback failed, transaction discarded on release");
        }
    }
}

impl Drop for ScopedTx {
    fn drop(&mut self) {
        if self.inner.is_some() {
            tracing::warn!("Transaction released without commit, writes discarded");
        }
    }
}
