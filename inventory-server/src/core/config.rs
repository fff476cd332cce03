use std::path::PathBuf;

/// Default asset size cap (5MB)
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

/// 服务器配置
///
/// # 环境变量
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | WORK_DIR | ./data | 数据库和日志目录 |
/// | DATABASE_PATH | <WORK_DIR>/inventory.db | SQLite 文件 |
/// | STATIC_DIR | ./static | 静态资源根目录 (maps/, thumbnails/) |
/// | HTTP_PORT | 5000 | HTTP 服务端口 |
/// | MAX_UPLOAD_BYTES | 5242880 | 上传图片大小上限 |
/// | PROVISION_DEFAULT_MAPS | true | 启动时写入默认地图 |
/// | LOG_LEVEL | info | 日志级别 (RUST_LOG 优先) |
/// | LOG_JSON | false (production 为 true) | JSON 控制台日志 |
/// | ENVIRONMENT | development | 运行环境 |
///
/// # 示例
///
/// ```ignore
/// STATIC_DIR=/srv/inventory/static HTTP_PORT=8080 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// 工作目录，存储数据库和日志
    pub work_dir: PathBuf,
    /// SQLite 数据库文件
    pub database_path: PathBuf,
    /// Public static root, served under `/static`
    pub static_dir: PathBuf,
    /// HTTP API 服务端口
    pub http_port: u16,
    /// Largest accepted asset upload in bytes
    pub max_upload_bytes: usize,
    /// Insert the default maps when the catalog is empty
    pub provision_default_maps: bool,
    pub log_level: String,
    pub log_json: bool,
    /// 运行环境: development | staging | production
    pub environment: String,
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置，使用默认值
    pub fn from_env() -> Self {
        let work_dir: PathBuf = std::env::var("WORK_DIR")
            .unwrap_or_else(|_| "./data".into())
            .into();
        let database_path = std::env::var("DATABASE_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| work_dir.join("inventory.db"));
        let environment = std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into());

        Self {
            database_path,
            static_dir: std::env::var("STATIC_DIR")
                .unwrap_or_else(|_| "./static".into())
                .into(),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(5000),
            max_upload_bytes: std::env::var("MAX_UPLOAD_BYTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_MAX_UPLOAD_BYTES),
            provision_default_maps: std::env::var("PROVISION_DEFAULT_MAPS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_json: std::env::var("LOG_JSON")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(environment == "production"),
            work_dir,
            environment,
        }
    }

    /// 使用自定义目录覆盖部分配置
    ///
    /// 常用于测试场景
    pub fn with_overrides(work_dir: impl Into<PathBuf>, static_dir: impl Into<PathBuf>) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config.database_path = config.work_dir.join("inventory.db");
        config.static_dir = static_dir.into();
        config
    }

    /// Directory holding uploaded item thumbnails
    pub fn thumbnails_dir(&self) -> PathBuf {
        self.static_dir.join("thumbnails")
    }

    /// Directory holding map floor plans
    pub fn maps_dir(&self) -> PathBuf {
        self.static_dir.join("maps")
    }

    pub fn log_dir(&self) -> PathBuf {
        self.work_dir.join("logs")
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
