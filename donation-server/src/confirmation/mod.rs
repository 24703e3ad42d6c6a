//! Confirmation Channel
//!
//! Read side of the out-of-band confirmation store. Entries are written once
//! by the ledger callback and never change afterwards. A missing entry is not
//! an error, it just has not arrived yet.

mod memory;
mod sqlite;

pub use memory::MemoryConfirmationChannel;
pub use sqlite::SqliteConfirmationChannel;

use async_trait::async_trait;
use shared::ConfirmationEntry;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    Found(ConfirmationEntry),
    NotYetAvailable,
}

#[derive(Debug, Error)]
pub enum ChannelError {
    #[error("confirmation store error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("confirmation channel unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait ConfirmationChannel: Send + Sync {
    async fn lookup(&self, correlation_id: &str) -> Result<Lookup, ChannelError>;
}
