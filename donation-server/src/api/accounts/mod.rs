//! Account API 模块 (链上身份登记)

mod handler;

use axum::{Router, routing::put};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/v1/accounts", routes())
}

fn routes() -> Router<ServerState> {
    Router::new().route("/{uid}/did", put(handler::register_did))
}
