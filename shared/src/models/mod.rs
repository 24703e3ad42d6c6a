//! Data models
//!
//! Publication records as they travel from the HTTP layer through the
//! publish coordinator into the record store.

pub mod address;
pub mod image;
pub mod party;
pub mod record;

// Re-exports
pub use address::*;
pub use image::*;
pub use party::*;
pub use record::*;
