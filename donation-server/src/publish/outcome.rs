use serde::Serialize;
use shared::ConfirmationEntry;
use std::time::Duration;

use super::error::PublishError;

/// Coordinator state machine
///
/// `Validating → Persisting → Publishing → AwaitingConfirmation → {Confirmed, TimedOut, Failed}`
/// plus `Cancelled` when the caller stops waiting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PublishState {
    Validating,
    Persisting,
    Publishing,
    AwaitingConfirmation,
    Confirmed,
    TimedOut,
    Cancelled,
    Failed,
}

impl PublishState {
    pub fn as_str(&self) -> &'static str {
        match self {
            PublishState::Validating => "validating",
            PublishState::Persisting => "persisting",
            PublishState::Publishing => "publishing",
            PublishState::AwaitingConfirmation => "awaiting_confirmation",
            PublishState::Confirmed => "confirmed",
            PublishState::TimedOut => "timed_out",
            PublishState::Cancelled => "cancelled",
            PublishState::Failed => "failed",
        }
    }
}

impl std::fmt::Display for PublishState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Record ↔ correlation id, as committed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LedgerBinding {
    pub record_id: String,
    pub correlation_id: String,
    pub payload_index: usize,
}

/// Durable result of persist + publish. Exists only after commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Committed {
    pub bindings: Vec<LedgerBinding>,
}

impl Committed {
    pub fn ledger_refs(&self) -> Vec<&str> {
        self.bindings.iter().map(|b| b.correlation_id.as_str()).collect()
    }

    pub fn record_ids(&self) -> Vec<&str> {
        self.bindings.iter().map(|b| b.record_id.as_str()).collect()
    }
}

/// A binding whose confirmation arrived
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Confirmation {
    pub binding: LedgerBinding,
    pub entry: ConfirmationEntry,
}

#[derive(Debug)]
pub enum Outcome {
    /// Every correlation id has a finalized entry (in binding order)
    Confirmed {
        committed: Committed,
        confirmations: Vec<Confirmation>,
    },
    /// Deadline elapsed with ids outstanding; records stay committed
    TimedOut {
        committed: Committed,
        confirmed: Vec<Confirmation>,
        pending: Vec<LedgerBinding>,
        waited: Duration,
    },
    /// Caller stopped waiting; records stay committed
    Cancelled {
        committed: Committed,
        pending: Vec<LedgerBinding>,
    },
    /// `committed` is `Some` only when the failure happened after commit
    Failed {
        error: PublishError,
        committed: Option<Committed>,
    },
}

impl Outcome {
    pub fn state(&self) -> PublishState {
        match self {
            Outcome::Confirmed { .. } => PublishState::Confirmed,
            Outcome::TimedOut { .. } => PublishState::TimedOut,
            Outcome::Cancelled { .. } => PublishState::Cancelled,
            Outcome::Failed { .. } => PublishState::Failed,
        }
    }

    pub fn committed(&self) -> Option<&Committed> {
        match self {
            Outcome::Confirmed { committed, .. }
            | Outcome::TimedOut { committed, .. }
            | Outcome::Cancelled { committed, .. } => Some(committed),
            Outcome::Failed { committed, .. } => committed.as_ref(),
        }
    }

    pub fn is_confirmed(&self) -> bool {
        matches!(self, Outcome::Confirmed { .. })
    }

    pub(crate) fn failed(error: impl Into<PublishError>) -> Self {
        Outcome::Failed {
            error: error.into(),
            committed: None,
        }
    }
}
