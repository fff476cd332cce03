use crate::core::{Config, Result};
use crate::db::DbService;
use crate::services::{AssetStore, CatalogService, provision_default_maps};

/// 服务器状态 - 持有所有服务的共享引用
///
/// Built once at startup by [`ServerState::initialize`] and injected into
/// every handler through axum's `State`. Cloning is cheap: the pool and the
/// services are reference counted internally.
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 配置项 (不可变) |
/// | db | DbService | SQLite 连接池 |
/// | catalog | CatalogService | 地图/物品/图片协调 |
#[derive(Clone, Debug)]
pub struct ServerState {
    pub config: Config,
    pub db: DbService,
    pub catalog: CatalogService,
}

impl ServerState {
    /// 创建服务器状态 (手动构造)
    pub fn new(config: Config, db: DbService) -> Self {
        let assets = AssetStore::new(config.thumbnails_dir(), config.max_upload_bytes);
        let catalog = CatalogService::new(db.pool.clone(), assets);
        Self {
            config,
            db,
            catalog,
        }
    }

    /// 初始化服务器状态
    ///
    /// 1. 创建静态资源目录 (maps/, thumbnails/)
    /// 2. 打开数据库并执行迁移
    /// 3. 写入默认地图 (如果启用且目录为空)
    pub async fn initialize(config: &Config) -> Result<Self> {
        std::fs::create_dir_all(config.maps_dir())?;
        std::fs::create_dir_all(config.thumbnails_dir())?;

        let db = DbService::new(&config.database_path).await?;

        if config.provision_default_maps {
            provision_default_maps(&db.pool)
                .await
                .map_err(shared::error::AppError::from)?;
        }

        tracing::info!(
            environment = %config.environment,
            static_dir = %config.static_dir.display(),
            database = %config.database_path.display(),
            "Server state initialized"
        );
        Ok(Self::new(config.clone(), db))
    }
}
