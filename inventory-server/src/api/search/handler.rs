//! Search API Handler

use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;
use shared::error::AppResult;
use shared::models::Item;

use crate::api::extract::parse_id_param;
use crate::catalog::{SearchMode, SearchQuery};
use crate::core::ServerState;

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
    #[serde(rename = "type")]
    pub mode: Option<String>,
    pub map_id: Option<String>,
    /// Comma separated tag fragments
    pub tags: Option<String>,
}

/// GET /api/search?q=&type=&map_id=&tags= - 地图内搜索物品
pub async fn search(
    State(state): State<ServerState>,
    Query(params): Query<SearchParams>,
) -> AppResult<Json<Vec<Item>>> {
    let map_id = parse_id_param(params.map_id.as_deref(), "map_id")?;
    let mode: SearchMode = params.mode.as_deref().unwrap_or_default().parse()?;
    let query = SearchQuery::new(
        params.q.as_deref().unwrap_or_default(),
        params.tags.as_deref(),
        mode,
    );
    Ok(Json(state.catalog.search(map_id, &query).await?))
}
