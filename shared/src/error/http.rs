//! HTTP status code mapping for error codes

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    /// Get the appropriate HTTP status code for this error code
    pub fn http_status(&self) -> StatusCode {
        match self {
            Self::Success => StatusCode::OK,

            Self::NotFound | Self::IdentityNotFound => StatusCode::NOT_FOUND,

            Self::AlreadyExists => StatusCode::CONFLICT,

            // 408: 已提交上链，但回调未在期限内到达
            Self::LedgerConfirmTimeout => StatusCode::REQUEST_TIMEOUT,

            // 502: 上游账本网关失败
            Self::LedgerPublishFailed | Self::LedgerProtocolViolation => StatusCode::BAD_GATEWAY,

            Self::NetworkError | Self::TimeoutError => StatusCode::SERVICE_UNAVAILABLE,

            Self::InternalError
            | Self::DatabaseError
            | Self::ConfigError
            | Self::ConfirmationChannelFailed
            | Self::PayloadBuildFailed
            | Self::ClientDisconnected
            | Self::Unknown => StatusCode::INTERNAL_SERVER_ERROR,

            // 400 Bad Request (default for validation errors)
            _ => StatusCode::BAD_REQUEST,
        }
    }
}
