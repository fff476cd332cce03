//! Asset audit API

use axum::{Json, Router, extract::State, routing::get};
use shared::error::AppResult;

use crate::core::ServerState;
use crate::services::AssetReport;

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/assets/check", get(check))
}

/// GET /api/assets/check - 检查物品图片文件是否存在
async fn check(State(state): State<ServerState>) -> AppResult<Json<AssetReport>> {
    Ok(Json(state.catalog.check_assets().await?))
}
