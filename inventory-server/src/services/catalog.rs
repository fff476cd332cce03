//! Catalog Service
//!
//! Coordinates the map/item repositories with the asset store. Every write
//! runs in an explicit transaction; asset files are written before the
//! transaction and cleaned up on whichever side of the commit they become
//! unreferenced.

use serde::Serialize;
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{
    BulkItem, BulkItemsResult, DEFAULT_ITEM_COLOR, Item, ItemCreate, ItemUpdate, Map, MapCreate,
    MapUpdate,
};
use sqlx::SqlitePool;

use crate::catalog::SearchQuery;
use crate::db::begin_write;
use crate::db::repository::{RepoError, item, map};
use crate::services::asset_store::AssetStore;
use crate::utils::validation::{
    MAX_NAME_LEN, validate_item_create, validate_item_update, validate_map_create,
    validate_map_update, validate_quantity, validate_required_text,
};

/// An uploaded image waiting to be stored
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub filename: String,
    pub data: Vec<u8>,
}

/// Result of the asset audit
#[derive(Debug, Clone, Serialize)]
pub struct AssetReport {
    pub checked: usize,
    pub missing: Vec<MissingAsset>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MissingAsset {
    pub item_id: i64,
    pub name: String,
    pub image_path: String,
}

#[derive(Debug, Clone)]
pub struct CatalogService {
    pool: SqlitePool,
    assets: AssetStore,
}

impl CatalogService {
    pub fn new(pool: SqlitePool, assets: AssetStore) -> Self {
        Self { pool, assets }
    }

    pub fn assets(&self) -> &AssetStore {
        &self.assets
    }

    // ==================== Maps ====================

    pub async fn list_maps(&self) -> AppResult<Vec<Map>> {
        Ok(map::find_all(&self.pool).await?)
    }

    pub async fn get_map(&self, id: i64) -> AppResult<Map> {
        map::find_by_id(&self.pool, id)
            .await?
            .ok_or_else(|| AppError::map_not_found(id))
    }

    pub async fn create_map(&self, mut data: MapCreate) -> AppResult<Map> {
        if data
            .background_color
            .as_deref()
            .is_some_and(|c| c.trim().is_empty())
        {
            data.background_color = None;
        }
        validate_map_create(&data)?;

        let created = map::create(&self.pool, &data).await?;
        tracing::info!(map_id = created.id, name = %created.name, "Map created");
        Ok(created)
    }

    pub async fn update_map(&self, id: i64, data: MapUpdate) -> AppResult<Map> {
        validate_map_update(&data)?;
        let updated = map::update(&self.pool, id, &data)
            .await?
            .ok_or_else(|| AppError::map_not_found(id))?;
        tracing::info!(map_id = id, "Map updated");
        Ok(updated)
    }

    /// Delete a map; refused while any item still references it
    pub async fn delete_map(&self, id: i64) -> AppResult<()> {
        let mut tx = begin_write(&self.pool).await.map_err(RepoError::from)?;

        if !map::exists(&mut *tx, id).await? {
            return Err(AppError::map_not_found(id));
        }
        let items = item::count_by_map(&mut *tx, id).await?;
        if items > 0 {
            return Err(AppError::with_message(
                ErrorCode::MapHasItems,
                format!("Map {id} still has {items} item(s)"),
            )
            .with_detail("map_id", id)
            .with_detail("item_count", items));
        }
        map::delete(&mut *tx, id).await?;

        tx.commit().await.map_err(RepoError::from)?;
        tracing::info!(map_id = id, "Map deleted");
        Ok(())
    }

    // ==================== Items ====================

    pub async fn list_items(&self, map_id: i64) -> AppResult<Vec<Item>> {
        Ok(item::find_by_map(&self.pool, map_id).await?)
    }

    pub async fn get_item(&self, id: i64) -> AppResult<Item> {
        item::find_by_id(&self.pool, id)
            .await?
            .ok_or_else(|| AppError::item_not_found(id))
    }

    /// Create an item, storing its image first
    ///
    /// A stored image is removed again if the insert does not commit.
    pub async fn create_item(
        &self,
        data: ItemCreate,
        image: Option<ImageUpload>,
    ) -> AppResult<Item> {
        validate_item_create(&data)?;
        if !map::exists(&self.pool, data.map_id).await? {
            return Err(AppError::map_not_found(data.map_id));
        }

        let image_path = self.store_image(image.as_ref()).await?;

        match self.insert_item(&data, image_path.as_deref()).await {
            Ok(created) => {
                tracing::info!(
                    item_id = created.id,
                    map_id = created.map_id,
                    has_image = created.image_path.is_some(),
                    "Item created"
                );
                Ok(created)
            }
            Err(e) => {
                if let Some(path) = &image_path {
                    self.assets.delete(path).await;
                }
                Err(e)
            }
        }
    }

    async fn insert_item(&self, data: &ItemCreate, image_path: Option<&str>) -> AppResult<Item> {
        let mut tx = begin_write(&self.pool).await.map_err(RepoError::from)?;
        if !map::exists(&mut *tx, data.map_id).await? {
            return Err(AppError::map_not_found(data.map_id));
        }
        let created = item::create(&mut *tx, data, image_path).await?;
        tx.commit().await.map_err(RepoError::from)?;
        Ok(created)
    }

    /// Apply a partial update and optionally replace the image
    ///
    /// The previous image is deleted only after the new path is committed.
    pub async fn update_item(
        &self,
        id: i64,
        patch: ItemUpdate,
        image: Option<ImageUpload>,
    ) -> AppResult<Item> {
        validate_item_update(&patch)?;
        let Some(current) = item::find_by_id(&self.pool, id).await? else {
            return Err(AppError::item_not_found(id));
        };
        if patch.is_empty() && image.is_none() {
            tracing::debug!(item_id = id, "Item update carries no changes");
            return Ok(current);
        }
        if let Some(map_id) = patch.map_id
            && !map::exists(&self.pool, map_id).await?
        {
            return Err(AppError::map_not_found(map_id));
        }

        let new_image = self.store_image(image.as_ref()).await?;

        let (previous, updated) = match self.write_update(id, &patch, new_image.as_deref()).await {
            Ok(result) => result,
            Err(e) => {
                if let Some(path) = &new_image {
                    self.assets.delete(path).await;
                }
                return Err(e);
            }
        };

        if new_image.is_some()
            && let Some(old) = previous.image_path.as_deref()
            && updated.image_path.as_deref() != Some(old)
        {
            self.assets.delete(old).await;
        }

        tracing::info!(item_id = id, image_replaced = new_image.is_some(), "Item updated");
        Ok(updated)
    }

    /// Returns the row as it was before the update and as it is after
    async fn write_update(
        &self,
        id: i64,
        patch: &ItemUpdate,
        image_path: Option<&str>,
    ) -> AppResult<(Item, Item)> {
        let mut tx = begin_write(&self.pool).await.map_err(RepoError::from)?;

        let previous = item::find_by_id(&mut *tx, id)
            .await?
            .ok_or_else(|| AppError::item_not_found(id))?;
        if let Some(map_id) = patch.map_id
            && !map::exists(&mut *tx, map_id).await?
        {
            return Err(AppError::map_not_found(map_id));
        }
        let updated = item::update(&mut *tx, id, patch, image_path)
            .await?
            .ok_or_else(|| AppError::item_not_found(id))?;

        tx.commit().await.map_err(RepoError::from)?;
        Ok((previous, updated))
    }

    /// Delete an item and its image
    pub async fn delete_item(&self, id: i64) -> AppResult<()> {
        let removed = item::delete(&self.pool, id)
            .await?
            .ok_or_else(|| AppError::item_not_found(id))?;

        if let Some(path) = &removed.image_path {
            self.assets.delete(path).await;
        }
        tracing::info!(item_id = id, map_id = removed.map_id, "Item deleted");
        Ok(())
    }

    async fn store_image(&self, image: Option<&ImageUpload>) -> AppResult<Option<String>> {
        match image {
            Some(upload) => Ok(Some(
                self.assets.store(&upload.data, &upload.filename).await?,
            )),
            None => Ok(None),
        }
    }

    // ==================== Search ====================

    /// Items on `map_id` matching `query`, in id order
    pub async fn search(&self, map_id: i64, query: &SearchQuery) -> AppResult<Vec<Item>> {
        let items = item::find_by_map(&self.pool, map_id).await?;
        let found = query.filter(items);
        tracing::debug!(map_id, mode = ?query.mode(), results = found.len(), "Search executed");
        Ok(found)
    }

    // ==================== Bulk ingestion ====================

    /// Insert many items on one map in a single transaction
    ///
    /// Bulk items are placed at (0, 0); callers reposition them later.
    pub async fn bulk_create(
        &self,
        map_id: Option<i64>,
        entries: Vec<BulkItem>,
    ) -> AppResult<BulkItemsResult> {
        let map_id = map_id.ok_or_else(|| AppError::required("map_id"))?;
        if entries.is_empty() {
            return Err(AppError::required("items"));
        }
        let rows = entries
            .into_iter()
            .enumerate()
            .map(|(index, entry)| bulk_entry_to_create(map_id, index, entry))
            .collect::<AppResult<Vec<_>>>()?;

        let mut tx = begin_write(&self.pool).await.map_err(RepoError::from)?;
        if !map::exists(&mut *tx, map_id).await? {
            return Err(AppError::map_not_found(map_id));
        }
        let mut created_ids = Vec::with_capacity(rows.len());
        for row in &rows {
            let created = item::create(&mut *tx, row, None).await?;
            created_ids.push(created.id);
        }
        tx.commit().await.map_err(RepoError::from)?;

        tracing::info!(map_id, added = created_ids.len(), "Bulk items added");
        Ok(BulkItemsResult {
            added_count: created_ids.len(),
            created_ids,
        })
    }

    // ==================== Asset audit ====================

    /// Report items whose image file is missing on disk
    pub async fn check_assets(&self) -> AppResult<AssetReport> {
        let items = item::find_with_images(&self.pool).await?;
        let mut missing = Vec::new();
        for it in &items {
            let Some(path) = it.image_path.as_deref() else {
                continue;
            };
            if !self.assets.exists(path).await {
                missing.push(MissingAsset {
                    item_id: it.id,
                    name: it.name.clone(),
                    image_path: path.to_string(),
                });
            }
        }
        if !missing.is_empty() {
            tracing::warn!(
                missing = missing.len(),
                checked = items.len(),
                "Items reference missing assets"
            );
        }
        Ok(AssetReport {
            checked: items.len(),
            missing,
        })
    }
}

/// Validate one bulk entry and expand it with the item defaults
fn bulk_entry_to_create(map_id: i64, index: usize, entry: BulkItem) -> AppResult<ItemCreate> {
    let with_index = |err: AppError| err.with_detail("index", index);

    let name = entry.name.unwrap_or_default();
    validate_required_text(&name, "name", MAX_NAME_LEN).map_err(with_index)?;
    let tags = entry
        .tags
        .ok_or_else(|| with_index(AppError::required("tags")))?;
    let quantity = entry
        .quantity
        .ok_or_else(|| with_index(AppError::required("quantity")))?;
    validate_quantity(quantity).map_err(with_index)?;

    let data = ItemCreate {
        name,
        tags,
        x_coord: 0.0,
        y_coord: 0.0,
        map_id,
        color: entry.color.unwrap_or_else(|| DEFAULT_ITEM_COLOR.to_string()),
        zone: entry.zone.unwrap_or_default(),
        quantity,
        warning: entry.warning.unwrap_or_default(),
        description: entry.description.unwrap_or_default(),
        link: entry.link.unwrap_or_default(),
    };
    validate_item_create(&data).map_err(with_index)?;
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::SearchMode;
    use crate::db::DbService;
    use crate::services::asset_store::tests::encoded_image;
    use image::ImageFormat;
    use tempfile::TempDir;

    struct Fixture {
        catalog: CatalogService,
        map_id: i64,
        _static_dir: TempDir,
    }

    async fn fixture() -> Fixture {
        let static_dir = tempfile::tempdir().unwrap();
        let db = DbService::in_memory().await.unwrap();
        let assets = AssetStore::new(static_dir.path().join("thumbnails"), 1024 * 1024);
        let catalog = CatalogService::new(db.pool, assets);
        let map = catalog
            .create_map(MapCreate {
                name: "iLab".into(),
                svg_path: "/static/maps/main.svg".into(),
                background_color: Some("  ".into()),
            })
            .await
            .unwrap();
        assert_eq!(map.background_color, "white");
        Fixture {
            catalog,
            map_id: map.id,
            _static_dir: static_dir,
        }
    }

    fn png_upload(name: &str) -> ImageUpload {
        ImageUpload {
            filename: name.into(),
            data: encoded_image(ImageFormat::Png),
        }
    }

    fn thumbnail_count(catalog: &CatalogService) -> usize {
        std::fs::read_dir(catalog.assets().thumbnails_dir())
            .map(|dir| dir.count())
            .unwrap_or(0)
    }

    #[tokio::test]
    async fn create_item_on_unknown_map_writes_nothing() {
        let f = fixture().await;
        let err = f
            .catalog
            .create_item(
                ItemCreate::new("Drill", f.map_id + 1, 1.0, 1.0),
                Some(png_upload("drill.png")),
            )
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::MapNotFound);
        assert_eq!(thumbnail_count(&f.catalog), 0);
        assert!(f.catalog.list_items(f.map_id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn rejected_upload_creates_no_item() {
        let f = fixture().await;
        let bad = ImageUpload {
            filename: "notes.txt".into(),
            data: b"hello".to_vec(),
        };
        let err = f
            .catalog
            .create_item(ItemCreate::new("Drill", f.map_id, 1.0, 1.0), Some(bad))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::UnsupportedFileFormat);
        assert!(f.catalog.list_items(f.map_id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn replacing_image_deletes_previous_file() {
        let f = fixture().await;
        let created = f
            .catalog
            .create_item(
                ItemCreate::new("Drill", f.map_id, 1.0, 1.0),
                Some(png_upload("drill.png")),
            )
            .await
            .unwrap();
        let old = created.image_path.clone().unwrap();
        assert!(f.catalog.assets().exists(&old).await);

        let patch = ItemUpdate {
            quantity: Some(3),
            ..Default::default()
        };
        let updated = f
            .catalog
            .update_item(created.id, patch, Some(png_upload("drill.png")))
            .await
            .unwrap();
        let new = updated.image_path.clone().unwrap();
        assert_ne!(old, new);
        assert_eq!(updated.quantity, 3);
        assert_eq!(updated.name, "Drill");
        assert!(!f.catalog.assets().exists(&old).await);
        assert!(f.catalog.assets().exists(&new).await);
    }

    #[tokio::test]
    async fn update_without_image_keeps_existing_image() {
        let f = fixture().await;
        let created = f
            .catalog
            .create_item(
                ItemCreate::new("Saw", f.map_id, 1.0, 1.0),
                Some(png_upload("saw.png")),
            )
            .await
            .unwrap();

        let patch = ItemUpdate {
            name: Some("Hand saw".into()),
            ..Default::default()
        };
        let updated = f.catalog.update_item(created.id, patch, None).await.unwrap();
        assert_eq!(updated.image_path, created.image_path);
        assert!(
            f.catalog
                .assets()
                .exists(updated.image_path.as_deref().unwrap())
                .await
        );
    }

    #[tokio::test]
    async fn update_to_unknown_map_is_not_found_and_keeps_upload_clean() {
        let f = fixture().await;
        let created = f
            .catalog
            .create_item(ItemCreate::new("Saw", f.map_id, 1.0, 1.0), None)
            .await
            .unwrap();
        let patch = ItemUpdate {
            map_id: Some(999),
            ..Default::default()
        };
        let err = f
            .catalog
            .update_item(created.id, patch, Some(png_upload("saw.png")))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::MapNotFound);
        assert_eq!(thumbnail_count(&f.catalog), 0);

        let err = f
            .catalog
            .update_item(4242, ItemUpdate::default(), None)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ItemNotFound);
    }

    #[tokio::test]
    async fn delete_item_removes_row_and_asset() {
        let f = fixture().await;
        let created = f
            .catalog
            .create_item(
                ItemCreate::new("Glue", f.map_id, 1.0, 1.0),
                Some(png_upload("glue.png")),
            )
            .await
            .unwrap();
        let path = created.image_path.clone().unwrap();

        f.catalog.delete_item(created.id).await.unwrap();
        assert!(!f.catalog.assets().exists(&path).await);
        assert_eq!(
            f.catalog.get_item(created.id).await.unwrap_err().code,
            ErrorCode::ItemNotFound
        );
        assert_eq!(
            f.catalog.delete_item(created.id).await.unwrap_err().code,
            ErrorCode::ItemNotFound
        );
    }

    #[tokio::test]
    async fn bulk_create_inserts_all_at_origin() {
        let f = fixture().await;
        let entries = (1..=3)
            .map(|n| BulkItem {
                name: Some(format!("Bin {n}")),
                tags: Some("storage".into()),
                quantity: Some(n),
                ..Default::default()
            })
            .collect();

        let result = f.catalog.bulk_create(Some(f.map_id), entries).await.unwrap();
        assert_eq!(result.added_count, 3);
        assert_eq!(result.created_ids.len(), 3);

        let items = f.catalog.list_items(f.map_id).await.unwrap();
        assert_eq!(items.len(), 3);
        assert!(items.iter().all(|i| i.x_coord == 0.0 && i.y_coord == 0.0));
        assert!(items.iter().all(|i| i.color == "red" && i.zone.is_empty()));
    }

    #[tokio::test]
    async fn bulk_create_is_all_or_nothing() {
        let f = fixture().await;
        let good = BulkItem {
            name: Some("Bin".into()),
            tags: Some(String::new()),
            quantity: Some(1),
            ..Default::default()
        };

        let err = f
            .catalog
            .bulk_create(Some(f.map_id + 50), vec![good.clone(), good.clone()])
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::MapNotFound);

        let missing_quantity = BulkItem {
            quantity: None,
            ..good.clone()
        };
        let err = f
            .catalog
            .bulk_create(Some(f.map_id), vec![good.clone(), missing_quantity])
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::RequiredField);
        assert_eq!(err.details.unwrap().get("index").unwrap(), 1);

        assert!(f.catalog.list_items(f.map_id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn bulk_create_requires_map_and_items() {
        let f = fixture().await;
        assert_eq!(
            f.catalog.bulk_create(None, vec![BulkItem::default()]).await.unwrap_err().code,
            ErrorCode::RequiredField
        );
        assert_eq!(
            f.catalog.bulk_create(Some(f.map_id), vec![]).await.unwrap_err().code,
            ErrorCode::RequiredField
        );
    }

    #[tokio::test]
    async fn delete_map_with_items_is_conflict() {
        let f = fixture().await;
        f.catalog
            .create_item(ItemCreate::new("Drill", f.map_id, 1.0, 1.0), None)
            .await
            .unwrap();

        let err = f.catalog.delete_map(f.map_id).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::MapHasItems);
        assert!(f.catalog.get_map(f.map_id).await.is_ok());

        assert_eq!(
            f.catalog.delete_map(999).await.unwrap_err().code,
            ErrorCode::MapNotFound
        );
    }

    #[tokio::test]
    async fn search_is_scoped_to_map() {
        let f = fixture().await;
        let other = f
            .catalog
            .create_map(MapCreate {
                name: "Closet".into(),
                svg_path: "/static/maps/closet.svg".into(),
                background_color: None,
            })
            .await
            .unwrap();
        let mut drill = ItemCreate::new("Drill", f.map_id, 1.0, 1.0);
        drill.tags = "power".into();
        f.catalog.create_item(drill, None).await.unwrap();
        f.catalog
            .create_item(ItemCreate::new("Drill press", other.id, 1.0, 1.0), None)
            .await
            .unwrap();

        let query = SearchQuery::new("drill", None, SearchMode::All);
        let found = f.catalog.search(f.map_id, &query).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].map_id, f.map_id);
    }

    #[tokio::test]
    async fn check_assets_reports_missing_files() {
        let f = fixture().await;
        let kept = f
            .catalog
            .create_item(
                ItemCreate::new("Kept", f.map_id, 1.0, 1.0),
                Some(png_upload("kept.png")),
            )
            .await
            .unwrap();
        let lost = f
            .catalog
            .create_item(
                ItemCreate::new("Lost", f.map_id, 1.0, 1.0),
                Some(png_upload("lost.png")),
            )
            .await
            .unwrap();
        f.catalog
            .create_item(ItemCreate::new("Plain", f.map_id, 1.0, 1.0), None)
            .await
            .unwrap();

        f.catalog
            .assets()
            .delete(lost.image_path.as_deref().unwrap())
            .await;

        let report = f.catalog.check_assets().await.unwrap();
        assert_eq!(report.checked, 2);
        assert_eq!(report.missing.len(), 1);
        assert_eq!(report.missing[0].item_id, lost.id);
        assert_ne!(report.missing[0].item_id, kept.id);
    }

    #[tokio::test]
    async fn empty_update_returns_item_unchanged() {
        let f = fixture().await;
        let created = f
            .catalog
            .create_item(ItemCreate::new("Drill", f.map_id, 1.0, 2.0), None)
            .await
            .unwrap();

        let same = f
            .catalog
            .update_item(created.id, ItemUpdate::default(), None)
            .await
            .unwrap();
        assert_eq!(same.name, "Drill");
        assert_eq!(same.y_coord, 2.0);

        let err = f
            .catalog
            .update_item(created.id + 100, ItemUpdate::default(), None)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ItemNotFound);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_writes_on_file_database_wait_for_the_lock() {
        let work_dir = tempfile::tempdir().unwrap();
        let db = DbService::new(&work_dir.path().join("inventory.db"))
            .await
            .unwrap();
        let assets = AssetStore::new(work_dir.path().join("thumbnails"), 1024 * 1024);
        let catalog = CatalogService::new(db.pool, assets);
        let map = catalog
            .create_map(MapCreate {
                name: "iLab".into(),
                svg_path: "/static/maps/main.svg".into(),
                background_color: None,
            })
            .await
            .unwrap();
        let target = catalog
            .create_item(ItemCreate::new("Drill", map.id, 1.0, 1.0), None)
            .await
            .unwrap();

        let mut tasks = tokio::task::JoinSet::new();
        for n in 0..60i64 {
            let updater = catalog.clone();
            tasks.spawn(async move {
                let patch = ItemUpdate {
                    quantity: Some(n),
                    ..Default::default()
                };
                updater.update_item(target.id, patch, None).await.map(|_| ())
            });
            let creator = catalog.clone();
            tasks.spawn(async move {
                creator
                    .create_item(ItemCreate::new(format!("Bin {n}"), map.id, 0.0, 0.0), None)
                    .await
                    .map(|_| ())
            });
        }

        let mut failures = Vec::new();
        while let Some(joined) = tasks.join_next().await {
            if let Err(e) = joined.unwrap() {
                failures.push(format!("{:?} {}", e.code, e.message));
            }
        }
        assert!(failures.is_empty(), "writes failed: {failures:?}");

        assert_eq!(catalog.list_items(map.id).await.unwrap().len(), 61);
        let latest = catalog.get_item(target.id).await.unwrap();
        assert!((0..60).contains(&latest.quantity));
    }
}
