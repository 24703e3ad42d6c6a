//! Account API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use serde::{Deserialize, Serialize};

use crate::core::ServerState;
use crate::utils::validation::{MAX_SHORT_TEXT_LEN, validate_required_text};
use crate::utils::{ApiResponse, AppError, AppResult};

#[derive(Debug, Deserialize)]
pub struct RegisterDid {
    pub did: String,
}

#[derive(Debug, Serialize)]
pub struct AccountIdentity {
    pub uid: String,
    pub did: String,
}

/// PUT /api/v1/accounts/:uid/did - 登记/更新账户 DID
pub async fn register_did(
    State(state): State<ServerState>,
    Path(uid): Path<String>,
    Json(req): Json<RegisterDid>,
) -> AppResult<Json<ApiResponse<AccountIdentity>>> {
    validate_required_text(&uid, "uid", MAX_SHORT_TEXT_LEN)?;
    validate_required_text(&req.did, "did", MAX_SHORT_TEXT_LEN)?;

    state
        .identities
        .register(&uid, &req.did)
        .await
        .map_err(|e| AppError::database(e.to_string()))?;

    tracing::info!(uid = %uid, did = %req.did, "Account identity registered");
    Ok(Json(ApiResponse::success(AccountIdentity { uid, did: req.did })))
}
