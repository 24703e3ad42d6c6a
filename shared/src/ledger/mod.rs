//! Ledger domain types
//!
//! - [`PublicationKind`]: closed set of publication kinds
//! - [`build`]: pure, deterministic record → ledger payload conversion
//! - [`ConfirmationEntry`]: finalized ledger outcome written out-of-band

mod confirmation;
mod kind;
mod payload;

pub use confirmation::{BlockInfo, ConfirmationEntry};
pub use kind::PublicationKind;
pub use payload::{LedgerPayload, PAYLOAD_VERSION, PayloadError, build, build_for};
