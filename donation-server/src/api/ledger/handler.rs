//! Ledger Callback Handler

use axum::{Json, extract::State};
use serde::Serialize;
use shared::ConfirmationEntry;
use shared::ledger::BlockInfo;

use crate::core::ServerState;
use crate::utils::validation::{MAX_SHORT_TEXT_LEN, validate_required_text};
use crate::utils::{ApiResponse, AppError, AppResult, ErrorCode};

#[derive(Debug, Serialize)]
pub struct CallbackAck {
    pub id: String,
    /// false 表示该 id 已有确认, 本次被忽略
    pub stored: bool,
}

/// POST /api/v1/ledger/callback - 写入链上确认
pub async fn callback(
    State(state): State<ServerState>,
    Json(info): Json<BlockInfo>,
) -> AppResult<Json<ApiResponse<CallbackAck>>> {
    validate_required_text(&info.id, "id", MAX_SHORT_TEXT_LEN)?;

    let entry = ConfirmationEntry::from_block_info(&info, shared::util::now_millis())
        .map_err(|e| AppError::invalid_request(format!("Invalid block info: {e}")))?;
    let stored = state.confirmations.record(&entry).await.map_err(|e| {
        AppError::with_message(ErrorCode::ConfirmationChannelFailed, e.to_string())
    })?;

    if stored {
        tracing::info!(
            correlation_id = %info.id,
            block_num = info.block_num,
            tx_id = %info.tx_id,
            "Ledger confirmation stored"
        );
    } else {
        tracing::debug!(correlation_id = %info.id, "Duplicate ledger confirmation ignored");
    }

    Ok(Json(ApiResponse::success(CallbackAck {
        id: info.id,
        stored,
    })))
}
