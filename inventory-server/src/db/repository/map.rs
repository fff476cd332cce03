//! Map Repository

use super::RepoResult;
use shared::models::{DEFAULT_BACKGROUND_COLOR, Map, MapCreate, MapUpdate};
use sqlx::{SqliteExecutor, SqlitePool};

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<Map>> {
    let maps = sqlx::query_as::<_, Map>(
        "SELECT id, name, svg_path, background_color FROM map ORDER BY id",
    )
    .fetch_all(pool)
    .await?;
    Ok(maps)
}

pub async fn find_by_id(db: impl SqliteExecutor<'_>, id: i64) -> RepoResult<Option<Map>> {
    let map = sqlx::query_as::<_, Map>(
        "SELECT id, name, svg_path, background_color FROM map WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(db)
    .await?;
    Ok(map)
}

pub async fn exists(db: impl SqliteExecutor<'_>, id: i64) -> RepoResult<bool> {
    let found: Option<i64> = sqlx::query_scalar("SELECT id FROM map WHERE id = ?")
        .bind(id)
        .fetch_optional(db)
        .await?;
    Ok(found.is_some())
}

pub async fn count(db: impl SqliteExecutor<'_>) -> RepoResult<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM map")
        .fetch_one(db)
        .await?;
    Ok(count)
}

pub async fn create(db: impl SqliteExecutor<'_>, data: &MapCreate) -> RepoResult<Map> {
    let background = data
        .background_color
        .as_deref()
        .unwrap_or(DEFAULT_BACKGROUND_COLOR);
    let map = sqlx::query_as::<_, Map>(
        "INSERT INTO map (name, svg_path, background_color) VALUES (?, ?, ?) \
         RETURNING id, name, svg_path, background_color",
    )
    .bind(&data.name)
    .bind(&data.svg_path)
    .bind(background)
    .fetch_one(db)
    .await?;
    Ok(map)
}

/// Apply the `Some` fields of `data`; `None` when the map does not exist
pub async fn update(
    db: impl SqliteExecutor<'_>,
    id: i64,
    data: &MapUpdate,
) -> RepoResult<Option<Map>> {
    let map = sqlx::query_as::<_, Map>(
        "UPDATE map SET name = COALESCE(?1, name), svg_path = COALESCE(?2, svg_path), \
         background_color = COALESCE(?3, background_color) WHERE id = ?4 \
         RETURNING id, name, svg_path, background_color",
    )
    .bind(&data.name)
    .bind(&data.svg_path)
    .bind(&data.background_color)
    .bind(id)
    .fetch_optional(db)
    .await?;
    Ok(map)
}

pub async fn delete(db: impl SqliteExecutor<'_>, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM map WHERE id = ?")
        .bind(id)
        .execute(db)
        .await?;
    Ok(rows.rows_affected() > 0)
}
