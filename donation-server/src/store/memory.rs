//! In-memory record store
//!
//! Writes are staged per transaction and applied under one lock at commit.
//! A dropped or rolled back transaction simply forgets its staging area.

use async_trait::async_trait;
use parking_lot::Mutex;
use shared::models::DomainRecord;
use std::collections::HashMap;
use std::sync::Arc;

use super::{RecordStore, RecordTx, StoreError, StoredRecord};

#[derive(Clone, Default)]
pub struct MemoryRecordStore {
    records: Arc<Mutex<HashMap<String, DomainRecord>>>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn find_record(&self, id: &str) -> Option<StoredRecord> {
        self.records.lock().get(id).map(|r| StoredRecord {
            id: r.id.clone(),
            kind: r.kind,
            ledger_ref: r.ledger_ref.clone(),
        })
    }

    /// Full committed record (with related rows)
    pub fn get(&self, id: &str) -> Option<DomainRecord> {
        self.records.lock().get(id).cloned()
    }

    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn begin(&self) -> Result<Box<dyn RecordTx>, StoreError> {
        Ok(Box::new(MemoryTx {
            records: self.records.clone(),
            inserts: Vec::new(),
            refs: Vec::new(),
        }))
    }
}

struct MemoryTx {
    records: Arc<Mutex<HashMap<String, DomainRecord>>>,
    inserts: Vec<DomainRecord>,
    refs: Vec<(String, String)>,
}

#[async_trait]
impl RecordTx for MemoryTx {
    async fn insert(&mut self, records: &[DomainRecord]) -> Result<(), StoreError> {
        let committed = self.records.lock();
        for record in records {
            if committed.contains_key(&record.id) || self.inserts.iter().any(|r| r.id == record.id)
            {
                return Err(StoreError::Duplicate(record.id.clone()));
            }
        }
        drop(committed);
        self.inserts.extend_from_slice(records);
        Ok(())
    }

    async fn update_ledger_ref(
        &mut self,
        record_id: &str,
        ledger_ref: &str,
    ) -> Result<(), StoreError> {
        if let Some(staged) = self.inserts.iter_mut().find(|r| r.id == record_id) {
            staged.ledger_ref = Some(ledger_ref.to_string());
            return Ok(());
        }
        if !self.records.lock().contains_key(record_id) {
            return Err(StoreError::NotFound(record_id.to_string()));
        }
        self.refs.push((record_id.to_string(), ledger_ref.to_string()));
        Ok(())
    }

    async fn commit(self: Box<Self>) -> Result<(), StoreError> {
        let MemoryTx {
            records,
            inserts,
            refs,
        } = *self;
        let mut committed = records.lock();

        // 提交前再查一次, 并发事务可能已写入同 id
        if let Some(dup) = inserts.iter().find(|r| committed.contains_key(&r.id)) {
            return Err(StoreError::Duplicate(dup.id.clone()));
        }
        for record in inserts {
            committed.insert(record.id.clone(), record);
        }
        for (id, ledger_ref) in refs {
            if let Some(record) = committed.get_mut(&id) {
                record.ledger_ref = Some(ledger_ref);
            }
        }
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<(), StoreError> {
        Ok(())
    }
}
