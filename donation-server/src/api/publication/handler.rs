//! Publication API Handlers

use axum::{
    Json,
    extract::State,
};
use http::HeaderMap;
use shared::models::DomainRecord;

use super::dto::{FundsRequest, SuppliesRequest};
use super::response::{PublicationData, outcome_response};
use crate::api::request_id;
use crate::core::ServerState;
use crate::publish::ExecutionContext;
use crate::utils::{ApiResponse, AppError, AppResult};

/// POST /api/v1/pub/funds - 资金公示
pub async fn publish_funds(
    State(state): State<ServerState>,
    headers: HeaderMap,
    Json(req): Json<FundsRequest>,
) -> AppResult<Json<ApiResponse<PublicationData>>> {
    let record = req.into_record()?;
    run_publication(&state, vec![record], request_id(&headers)).await
}

/// POST /api/v1/pub/supplies - 物资公示 (每个物资条目一条记录)
pub async fn publish_supplies(
    State(state): State<ServerState>,
    headers: HeaderMap,
    Json(req): Json<SuppliesRequest>,
) -> AppResult<Json<ApiResponse<PublicationData>>> {
    let records = req.into_records()?;
    run_publication(&state, records, request_id(&headers)).await
}

/// Run the coordinator in its own task.
///
/// If the client goes away this handler future is dropped; the drop guard
/// cancels the token, which only stops the confirmation wait. Persist,
/// publish and commit always finish inside the task.
async fn run_publication(
    state: &ServerState,
    records: Vec<DomainRecord>,
    request_id: String,
) -> AppResult<Json<ApiResponse<PublicationData>>> {
    let ctx = ExecutionContext::new(request_id);
    let _cancel_on_drop = ctx.cancel.clone().drop_guard();

    let coordinator = state.coordinator.clone();
    let task_ctx = ctx.clone();
    let outcome = tokio::spawn(async move { coordinator.execute(records, &task_ctx).await })
        .await
        .map_err(|e| AppError::internal(format!("Publish task failed: {e}")))?;

    outcome_response(outcome).map(Json)
}
