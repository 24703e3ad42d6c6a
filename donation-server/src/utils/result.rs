//! Unified Result Types

use crate::utils::AppError;

/// Application-level Result type
///
/// Used in HTTP handlers and application logic
pub type AppResult<T> = Result<T, AppError>;

/// Error type returned from `main`
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;
