//! Bulk ingestion API 模块

mod handler;

use axum::{Router, routing::post};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/bulk_items", post(handler::bulk_create))
}
