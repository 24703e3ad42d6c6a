//! Outcome → HTTP response
//!
//! Only `Confirmed` is a success body. Every outcome that happened after
//! commit carries the ledger refs in `details` so the caller knows the
//! submission was accepted.

use serde::Serialize;
use shared::error::ErrorCode;
use shared::ledger::BlockInfo;

use crate::publish::{Committed, Outcome};
use crate::utils::{ApiResponse, AppError, AppResult};

#[derive(Debug, Clone, Serialize)]
pub struct PublishedRecord {
    pub record_id: String,
    pub ledger_ref: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block: Option<BlockInfo>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PublicationData {
    pub records: Vec<PublishedRecord>,
}

pub(crate) fn outcome_response(outcome: Outcome) -> AppResult<ApiResponse<PublicationData>> {
    match outcome {
        Outcome::Confirmed { confirmations, .. } => {
            let records = confirmations
                .into_iter()
                .map(|c| PublishedRecord {
                    block: c.entry.block_info().ok(),
                    record_id: c.binding.record_id,
                    ledger_ref: c.binding.correlation_id,
                })
                .collect();
            Ok(ApiResponse::success(PublicationData { records }))
        }
        Outcome::TimedOut {
            committed,
            pending,
            waited,
            ..
        } => {
            let pending: Vec<&str> = pending.iter().map(|b| b.correlation_id.as_str()).collect();
            Err(with_committed(
                AppError::with_message(
                    ErrorCode::LedgerConfirmTimeout,
                    format!(
                        "Accepted by the ledger but not confirmed within {}s",
                        waited.as_secs()
                    ),
                ),
                &committed,
            )
            .with_detail("pending", pending))
        }
        Outcome::Cancelled { committed, .. } => {
            Err(with_committed(AppError::client_disconnected(), &committed))
        }
        Outcome::Failed { error, committed } => {
            let err = AppError::from(error);
            Err(match committed {
                Some(committed) => with_committed(err, &committed),
                None => err,
            })
        }
    }
}

fn with_committed(err: AppError, committed: &Committed) -> AppError {
    err.with_detail("record_ids", committed.record_ids())
        .with_detail("ledger_refs", committed.ledger_refs())
}
