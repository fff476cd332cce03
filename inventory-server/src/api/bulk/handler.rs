//! Bulk ingestion handler

use axum::{Json, extract::State, http::StatusCode};
use serde::Serialize;
use shared::error::AppResult;
use shared::models::BulkItemsRequest;

use crate::api::extract::JsonBody;
use crate::core::ServerState;

#[derive(Debug, Serialize)]
pub struct BulkCreatedResponse {
    pub message: &'static str,
    pub added_count: usize,
    pub created_ids: Vec<i64>,
}

/// POST /api/bulk_items - 单事务批量添加物品
pub async fn bulk_create(
    State(state): State<ServerState>,
    JsonBody(payload): JsonBody<BulkItemsRequest>,
) -> AppResult<(StatusCode, Json<BulkCreatedResponse>)> {
    let result = state
        .catalog
        .bulk_create(payload.map_id, payload.items)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(BulkCreatedResponse {
            message: "Bulk items added successfully",
            added_count: result.added_count,
            created_ids: result.created_ids,
        }),
    ))
}
