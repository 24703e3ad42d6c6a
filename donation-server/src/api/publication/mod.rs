//! Publication API 模块 (资金/物资公示)
//!
//! Each request runs the publish coordinator once and holds the response
//! open until every record is confirmed on the ledger or the deadline passes.

mod dto;
mod handler;
mod response;

pub use dto::{FundsRequest, SuppliesItem, SuppliesRequest};
pub use response::{PublicationData, PublishedRecord};

use axum::{Router, routing::post};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/v1/pub", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/funds", post(handler::publish_funds))
        .route("/supplies", post(handler::publish_supplies))
}
