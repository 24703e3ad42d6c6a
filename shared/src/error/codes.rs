//! Unified error codes for the donation publication service
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 4xxx: Publication errors (request shape, kinds, quantities)
//! - 5xxx: Ledger errors (identity, publish, confirmation)
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization
/// and cross-language compatibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Required field missing
    RequiredField = 7,

    // ==================== 4xxx: Publication ====================
    /// Publication kind is not one of donate/distribute/receive
    UnsupportedPubType = 4002,
    /// Funds amount must be positive
    InvalidAmount = 4003,
    /// Supplies request carries no items
    EmptySupplies = 4004,
    /// Batch records disagree on submitter or kind
    MixedSubmission = 4005,

    // ==================== 5xxx: Ledger ====================
    /// Ledger publisher rejected or failed the submission
    LedgerPublishFailed = 5001,
    /// Ledger publisher returned results that do not match the payloads
    LedgerProtocolViolation = 5002,
    /// Ledger confirmation did not arrive before the deadline
    LedgerConfirmTimeout = 5003,
    /// Confirmation channel failed while waiting
    ConfirmationChannelFailed = 5004,
    /// Submitter identity could not be resolved
    IdentityNotFound = 5005,
    /// Ledger payload could not be built
    PayloadBuildFailed = 5006,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Network error
    NetworkError = 9003,
    /// Timeout error
    TimeoutError = 9004,
    /// Configuration error
    ConfigError = 9005,
    /// Client went away before the request finished
    ClientDisconnected = 9301,
}

impl ErrorCode {
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::RequiredField => "Required field is missing",

            // Publication
            ErrorCode::UnsupportedPubType => "Publication type is not supported",
            ErrorCode::InvalidAmount => "Amount must be greater than zero",
            ErrorCode::EmptySupplies => "Supplies list is empty",
            ErrorCode::MixedSubmission => "All records in one submission must share submitter and type",

            // Ledger
            ErrorCode::LedgerPublishFailed => "Publishing to the ledger failed",
            ErrorCode::LedgerProtocolViolation => "Ledger returned an inconsistent result set",
            ErrorCode::LedgerConfirmTimeout => "Ledger confirmation timed out",
            ErrorCode::ConfirmationChannelFailed => "Failed to read ledger confirmation",
            ErrorCode::IdentityNotFound => "Submitter identity not found",
            ErrorCode::PayloadBuildFailed => "Failed to build ledger payload",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::NetworkError => "Network error",
            ErrorCode::TimeoutError => "Operation timed out",
            ErrorCode::ConfigError => "Configuration error",
            ErrorCode::ClientDisconnected => "Client disconnected",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error returned when converting an unknown u16 into [`ErrorCode`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            5 => Ok(ErrorCode::InvalidRequest),
            7 => Ok(ErrorCode::RequiredField),

            // Publication
            4002 => Ok(ErrorCode::UnsupportedPubType),
            4003 => Ok(ErrorCode::InvalidAmount),
            4004 => Ok(ErrorCode::EmptySupplies),
            4005 => Ok(ErrorCode::MixedSubmission),

            // Ledger
            5001 => Ok(ErrorCode::LedgerPublishFailed),
            5002 => Ok(ErrorCode::LedgerProtocolViolation),
            5003 => Ok(ErrorCode::LedgerConfirmTimeout),
            5004 => Ok(ErrorCode::ConfirmationChannelFailed),
            5005 => Ok(ErrorCode::IdentityNotFound),
            5006 => Ok(ErrorCode::PayloadBuildFailed),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),
            9003 => Ok(ErrorCode::NetworkError),
            9004 => Ok(ErrorCode::TimeoutError),
            9005 => Ok(ErrorCode::ConfigError),
            9301 => Ok(ErrorCode::ClientDisconnected),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
