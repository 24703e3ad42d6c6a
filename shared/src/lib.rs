//! Shared types for the donation publication service
//!
//! Domain records, the ledger payload builder, unified error codes and
//! small utilities used by the server and its tests.

pub mod error;
pub mod ledger;
pub mod models;
pub mod util;

pub use ledger::{ConfirmationEntry, LedgerPayload, PayloadError, PublicationKind};
pub use models::{Address, AddressType, DomainRecord, Party, PartyRole, ProofImage, RecordItem};
