//! `ledger_confirmation` table
//!
//! The callback handler is the only writer; `INSERT OR IGNORE` keeps the
//! first document for a correlation id.

use async_trait::async_trait;
use shared::ConfirmationEntry;
use sqlx::SqlitePool;

use super::{ChannelError, ConfirmationChannel, Lookup};

#[derive(Clone)]
pub struct SqliteConfirmationChannel {
    pool: SqlitePool,
}

impl SqliteConfirmationChannel {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Store a confirmation. Returns false if one already existed.
    pub async fn record(&self, entry: &ConfirmationEntry) -> Result<bool, ChannelError> {
        let result = sqlx::query(
            "INSERT OR IGNORE INTO ledger_confirmation (correlation_id, entry, received_at) VALUES (?, ?, ?)",
        )
        .bind(&entry.correlation_id)
        .bind(&entry.entry)
        .bind(entry.received_at)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl ConfirmationChannel for SqliteConfirmationChannel {
    async fn lookup(&self, correlation_id: &str) -> Result<Lookup, ChannelError> {
        let row: Option<(String, Vec<u8>, i64)> = sqlx::query_as(
            "SELECT correlation_id, entry, received_at FROM ledger_confirmation WHERE correlation_id = ?",
        )
        .bind(correlation_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(match row {
            Some((id, entry, received_at)) => {
                Lookup::Found(ConfirmationEntry::new(id, entry, received_at))
            }
            None => Lookup::NotYetAvailable,
        })
    }
}
