//! Item API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use shared::error::AppResult;
use shared::models::Item;

use super::payload::ItemPayload;
use crate::api::extract::parse_id_param;
use crate::api::MessageResponse;
use crate::core::ServerState;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub map_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    pub id: i64,
    pub message: &'static str,
}

/// GET /api/items?map_id= - 获取地图上的所有物品
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<Item>>> {
    let map_id = parse_id_param(query.map_id.as_deref(), "map_id")?;
    let items = state.catalog.list_items(map_id).await?;
    Ok(Json(items))
}

/// GET /api/items/{id} - 获取单个物品
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Item>> {
    Ok(Json(state.catalog.get_item(id).await?))
}

/// POST /api/items - 创建物品 (multipart 或 JSON)
pub async fn create(
    State(state): State<ServerState>,
    payload: ItemPayload,
) -> AppResult<(StatusCode, Json<CreatedResponse>)> {
    let (data, image) = payload.into_create()?;
    let item = state.catalog.create_item(data, image).await?;
    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse {
            id: item.id,
            message: "Item added successfully",
        }),
    ))
}

/// PUT /api/items/{id} - 部分更新物品
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    payload: ItemPayload,
) -> AppResult<Json<Item>> {
    let (patch, image) = payload.into_update()?;
    let item = state.catalog.update_item(id, patch, image).await?;
    Ok(Json(item))
}

/// DELETE /api/items/{id} - 删除物品及其图片
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<MessageResponse>> {
    state.catalog.delete_item(id).await?;
    Ok(Json(MessageResponse::new("Item deleted successfully")))
}
