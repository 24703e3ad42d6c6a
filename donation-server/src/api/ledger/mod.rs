//! Ledger callback API 模块
//!
//! The ledger gateway reports finalized entries here. This is the only
//! writer of confirmation entries.

mod handler;

use axum::{Router, routing::post};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/v1/ledger", routes())
}

fn routes() -> Router<ServerState> {
    Router::new().route("/callback", post(handler::callback))
}
