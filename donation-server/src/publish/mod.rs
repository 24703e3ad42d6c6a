//! 链上公示流程
//!
//! - [`PublishCoordinator`]: persist → publish → commit → await confirmation
//! - [`Outcome`]: terminal result of one execution
//! - [`PublishError`]: failure stage and cause

mod coordinator;
mod error;
mod outcome;
mod validate;
mod wait;

pub use coordinator::{ExecutionContext, PublishCoordinator};
pub use error::PublishError;
pub use outcome::{Committed, Confirmation, LedgerBinding, Outcome, PublishState};
pub use validate::validate_batch;
pub use wait::{ConfirmationSettings, MAX_CONCURRENT_LOOKUPS};
