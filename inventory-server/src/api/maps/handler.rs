//! Map API Handlers

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use shared::error::AppResult;
use shared::models::{Map, MapCreate, MapUpdate};

use crate::api::MessageResponse;
use crate::api::extract::JsonBody;
use crate::core::ServerState;

/// GET /api/maps - 获取所有地图
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Map>>> {
    Ok(Json(state.catalog.list_maps().await?))
}

/// GET /api/maps/{id} - 获取单个地图
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Map>> {
    Ok(Json(state.catalog.get_map(id).await?))
}

/// POST /api/maps - 创建地图
pub async fn create(
    State(state): State<ServerState>,
    JsonBody(payload): JsonBody<MapCreate>,
) -> AppResult<(StatusCode, Json<Map>)> {
    let map = state.catalog.create_map(payload).await?;
    Ok((StatusCode::CREATED, Json(map)))
}

/// PUT /api/maps/{id} - 更新地图
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    JsonBody(payload): JsonBody<MapUpdate>,
) -> AppResult<Json<Map>> {
    Ok(Json(state.catalog.update_map(id, payload).await?))
}

/// DELETE /api/maps/{id} - 删除地图 (仍有物品时拒绝)
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<MessageResponse>> {
    state.catalog.delete_map(id).await?;
    Ok(Json(MessageResponse::new("Map deleted successfully")))
}
