//! Ledger Publisher
//!
//! Submits payloads to the external ledger. Acceptance is all-or-nothing per
//! call and only means "accepted for processing"; finality arrives later
//! through the confirmation channel.

mod http;
mod identity;

pub use self::http::HttpLedgerPublisher;
pub use identity::{IdentityError, IdentityResolver, SqliteIdentityResolver, StaticIdentityResolver};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use shared::LedgerPayload;
use thiserror::Error;

/// Ledger-side identity (DID) of the submitting account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitterIdentity {
    pub did: String,
}

/// One per submitted payload, in submission order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishResult {
    pub correlation_id: String,
    pub payload_index: usize,
}

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("ledger transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("ledger gateway returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("ledger rejected submission (code {code}): {message}")]
    Rejected { code: i64, message: String },

    #[error("ledger response malformed: {0}")]
    Malformed(String),
}

#[async_trait]
pub trait LedgerPublisher: Send + Sync {
    /// Submit all payloads under one identity.
    ///
    /// `Err` means none of the payloads were accepted. On `Ok` the caller
    /// still has to check that count and order match the submission.
    async fn publish(
        &self,
        identity: &SubmitterIdentity,
        payloads: &[LedgerPayload],
    ) -> Result<Vec<PublishResult>, LedgerError>;
}
