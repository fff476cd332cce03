//! Item Repository

use super::RepoResult;
use shared::models::{Item, ItemCreate, ItemUpdate};
use sqlx::{SqliteExecutor, SqlitePool};

pub async fn find_by_map(db: impl SqliteExecutor<'_>, map_id: i64) -> RepoResult<Vec<Item>> {
    let items = sqlx::query_as::<_, Item>(
        "SELECT id, name, tags, x_coord, y_coord, map_id, image_path, color, zone, quantity, \
         warning, description, link FROM item WHERE map_id = ? ORDER BY id",
    )
    .bind(map_id)
    .fetch_all(db)
    .await?;
    Ok(items)
}

pub async fn find_by_id(db: impl SqliteExecutor<'_>, id: i64) -> RepoResult<Option<Item>> {
    let item = sqlx::query_as::<_, Item>(
        "SELECT id, name, tags, x_coord, y_coord, map_id, image_path, color, zone, quantity, \
         warning, description, link FROM item WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(db)
    .await?;
    Ok(item)
}

/// Items that reference an uploaded asset
pub async fn find_with_images(pool: &SqlitePool) -> RepoResult<Vec<Item>> {
    let items = sqlx::query_as::<_, Item>(
        "SELECT id, name, tags, x_coord, y_coord, map_id, image_path, color, zone, quantity, \
         warning, description, link FROM item WHERE image_path IS NOT NULL ORDER BY id",
    )
    .fetch_all(pool)
    .await?;
    Ok(items)
}

pub async fn count_by_map(db: impl SqliteExecutor<'_>, map_id: i64) -> RepoResult<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM item WHERE map_id = ?")
        .bind(map_id)
        .fetch_one(db)
        .await?;
    Ok(count)
}

pub async fn create(
    db: impl SqliteExecutor<'_>,
    data: &ItemCreate,
    image_path: Option<&str>,
) -> RepoResult<Item> {
    let item = sqlx::query_as::<_, Item>(
        "INSERT INTO item (name, tags, x_coord, y_coord, map_id, image_path, color, zone, \
         quantity, warning, description, link) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?) \
         RETURNING id, name, tags, x_coord, y_coord, map_id, image_path, color, zone, quantity, \
         warning, description, link",
    )
    .bind(&data.name)
    .bind(&data.tags)
    .bind(data.x_coord)
    .bind(data.y_coord)
    .bind(data.map_id)
    .bind(image_path)
    .bind(&data.color)
    .bind(&data.zone)
    .bind(data.quantity)
    .bind(&data.warning)
    .bind(&data.description)
    .bind(&data.link)
    .fetch_one(db)
    .await?;
    Ok(item)
}

/// Apply the `Some` fields of `data` plus an optional new image path
///
/// Returns `None` when the item does not exist.
pub async fn update(
    db: impl SqliteExecutor<'_>,
    id: i64,
    data: &ItemUpdate,
    image_path: Option<&str>,
) -> RepoResult<Option<Item>> {
    let item = sqlx::query_as::<_, Item>(
        "UPDATE item SET \
         name = COALESCE(?1, name), \
         tags = COALESCE(?2, tags), \
         x_coord = COALESCE(?3, x_coord), \
         y_coord = COALESCE(?4, y_coord), \
         map_id = COALESCE(?5, map_id), \
         color = COALESCE(?6, color), \
         zone = COALESCE(?7, zone), \
         quantity = COALESCE(?8, quantity), \
         warning = COALESCE(?9, warning), \
         description = COALESCE(?10, description), \
         link = COALESCE(?11, link), \
         image_path = COALESCE(?12, image_path) \
         WHERE id = ?13 \
         RETURNING id, name, tags, x_coord, y_coord, map_id, image_path, color, zone, quantity, \
         warning, description, link",
    )
    .bind(&data.name)
    .bind(&data.tags)
    .bind(data.x_coord)
    .bind(data.y_coord)
    .bind(data.map_id)
    .bind(&data.color)
    .bind(&data.zone)
    .bind(data.quantity)
    .bind(&data.warning)
    .bind(&data.description)
    .bind(&data.link)
    .bind(image_path)
    .bind(id)
    .fetch_optional(db)
    .await?;
    Ok(item)
}

/// Delete an item, returning the removed row so its asset can be cleaned up
pub async fn delete(db: impl SqliteExecutor<'_>, id: i64) -> RepoResult<Option<Item>> {
    let item = sqlx::query_as::<_, Item>(
        "DELETE FROM item WHERE id = ? \
         RETURNING id, name, tags, x_coord, y_coord, map_id, image_path, color, zone, quantity, \
         warning, description, link",
    )
    .bind(id)
    .fetch_optional(db)
    .await?;
    Ok(item)
}
