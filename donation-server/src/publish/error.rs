use shared::PayloadError;
use shared::error::{AppError, ErrorCode};
use thiserror::Error;

use crate::confirmation::ChannelError;
use crate::ledger::{IdentityError, LedgerError};
use crate::store::StoreError;

/// Why a publish execution failed.
///
/// Everything up to and including `Protocol` happens before commit and
/// leaves the store untouched; `ConfirmationChannel` happens after commit.
#[derive(Debug, Error)]
pub enum PublishError {
    #[error("{0}")]
    Validation(AppError),

    #[error("persistence failed: {0}")]
    Persistence(#[from] StoreError),

    #[error("identity lookup failed: {0}")]
    IdentityLookup(#[from] IdentityError),

    #[error("payload build failed: {0}")]
    PayloadBuild(#[from] PayloadError),

    #[error("ledger publish failed: {0}")]
    LedgerPublish(#[from] LedgerError),

    #[error("ledger protocol violation: {0}")]
    Protocol(String),

    #[error("confirmation channel failed: {0}")]
    ConfirmationChannel(#[from] ChannelError),
}

impl PublishError {
    /// Stage name for logs
    pub fn stage(&self) -> &'static str {
        match self {
            PublishError::Validation(_) => "validation",
            PublishError::Persistence(_) => "persistence",
            PublishError::IdentityLookup(_) => "identity_lookup",
            PublishError::PayloadBuild(_) => "payload_build",
            PublishError::LedgerPublish(_) => "ledger_publish",
            PublishError::Protocol(_) => "protocol",
            PublishError::ConfirmationChannel(_) => "confirmation_channel",
        }
    }
}

impl From<PublishError> for AppError {
    fn from(err: PublishError) -> Self {
        let stage = err.stage();
        let app = match err {
            PublishError::Validation(e) => return e,
            PublishError::Persistence(e) => AppError::database(e.to_string()),
            PublishError::IdentityLookup(IdentityError::NotFound(uid)) => AppError::with_message(
                ErrorCode::IdentityNotFound,
                format!("No ledger identity for account {uid}"),
            )
            .with_detail("uid", uid),
            PublishError::IdentityLookup(e) => AppError::database(e.to_string()),
            PublishError::PayloadBuild(e) => {
                AppError::with_message(ErrorCode::PayloadBuildFailed, e.to_string())
            }
            PublishError::LedgerPublish(e) => {
                AppError::with_message(ErrorCode::LedgerPublishFailed, e.to_string())
            }
            PublishError::Protocol(msg) => {
                AppError::with_message(ErrorCode::LedgerProtocolViolation, msg)
            }
            PublishError::ConfirmationChannel(e) => {
                AppError::with_message(ErrorCode::ConfirmationChannelFailed, e.to_string())
            }
        };
        app.with_detail("stage", stage)
    }
}
