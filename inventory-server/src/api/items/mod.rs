//! Item API 模块

mod handler;
pub mod payload;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/items", get(handler::list).post(handler::create))
        .route(
            "/api/items/{id}",
            get(handler::get_by_id)
                .put(handler::update)
                .delete(handler::delete),
        )
}
