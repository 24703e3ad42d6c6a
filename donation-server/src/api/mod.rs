//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`publication`] - 资金/物资公示 (上链并等待确认)
//! - [`ledger`] - 链上确认回调
//! - [`accounts`] - 账户链上身份登记

pub mod accounts;
pub mod health;
pub mod ledger;
pub mod publication;

use axum::Router;
use http::HeaderValue;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::core::ServerState;

// Re-export common types for handlers
pub use crate::utils::{ApiResponse, AppResult};

/// Request ID generator (UUID v4)
#[derive(Clone)]
struct XRequestId;

impl MakeRequestId for XRequestId {
    fn make_request_id<B>(&mut self, _request: &http::Request<B>) -> Option<RequestId> {
        let id = Uuid::new_v4().to_string();
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}

/// 组装完整应用路由
pub fn build_app(state: ServerState) -> Router {
    Router::new()
        .merge(health::router())
        .merge(publication::router())
        .merge(ledger::router())
        .merge(accounts::router())
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(XRequestId))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::x_request_id()),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// `x-request-id` set by the request id layer, or a fresh one
pub(crate) fn request_id(headers: &http::HeaderMap) -> String {
    headers
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .unwrap_or_else(shared::util::new_id)
}
