//! Input validation helpers
//!
//! Centralized text length constants and validation functions.
//! SQLite TEXT has no built-in length enforcement, and everything that
//! reaches the ledger is public forever, so limits are checked up front.

use rust_decimal::Decimal;
use shared::error::ErrorCode;

use crate::utils::AppError;

// ── Text length limits ──────────────────────────────────────────────

/// Person / organisation / item names
pub const MAX_NAME_LEN: usize = 200;

/// Remarks
pub const MAX_NOTE_LEN: usize = 500;

/// Short identifiers: uid, pay type, way bill number, card number, unit
pub const MAX_SHORT_TEXT_LEN: usize = 100;

/// URLs / image paths
pub const MAX_URL_LEN: usize = 2048;

/// Addresses
pub const MAX_ADDRESS_LEN: usize = 500;

// ── Batch limits ────────────────────────────────────────────────────

/// Records in one submission (one supplies item = one record)
pub const MAX_RECORDS_PER_SUBMISSION: usize = 100;

// ── Validation helpers ──────────────────────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::with_message(
            ErrorCode::RequiredField,
            format!("{field} must not be empty"),
        )
        .with_detail("field", field));
    }
    validate_text_len(value, field, max_len)
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    if let Some(v) = value {
        validate_text_len(v, field, max_len)?;
    }
    Ok(())
}

/// Length check only; empty is fine.
pub fn validate_text_len(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.len() > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.len()
        ))
        .with_detail("field", field));
    }
    Ok(())
}

/// Funds amount must be strictly positive
pub fn validate_amount(amount: Decimal, field: &str) -> Result<(), AppError> {
    if amount <= Decimal::ZERO {
        return Err(AppError::with_message(
            ErrorCode::InvalidAmount,
            format!("{field} must be greater than 0, got {amount}"),
        )
        .with_detail("field", field));
    }
    Ok(())
}

/// Supplies quantity must be strictly positive
pub fn validate_quantity(number: i64, field: &str) -> Result<(), AppError> {
    if number <= 0 {
        return Err(AppError::with_message(
            ErrorCode::InvalidAmount,
            format!("{field} must be greater than 0, got {number}"),
        )
        .with_detail("field", field));
    }
    Ok(())
}
