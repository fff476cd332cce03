//! Inventory Server - workshop spatial inventory catalog
//!
//! Maps (floor plans) hold positioned items. The server exposes map and
//! item CRUD, bulk ingestion, scoped search and item thumbnails over HTTP,
//! backed by SQLite and a directory of static assets.
//!
//! ```text
//! inventory-server/src/
//! ├── core/          # 配置、状态、错误、服务器
//! ├── db/            # SQLite 连接池和 repository
//! ├── catalog/       # 搜索匹配
//! ├── services/      # 目录服务、图片存储、默认地图
//! ├── api/           # HTTP 路由和处理器
//! ├── routes/        # 路由组装和中间件
//! ├── server/        # 请求日志中间件
//! └── utils/         # 日志、校验
//! ```

pub mod api;
pub mod catalog;
pub mod core;
pub mod db;
pub mod routes;
pub mod server;
pub mod services;
pub mod utils;

// Re-export 公共类型
pub use crate::core::{Config, Server, ServerError, ServerState};
pub use routes::{build_app, build_router};
pub use utils::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::{cleanup_old_logs, init_logger_with_file};

/// Start logging as configured and prune expired log files
///
/// Must run inside the tokio runtime when file logging is enabled.
pub fn setup_environment(config: &Config) -> anyhow::Result<()> {
    let log_dir = config.log_dir();
    init_logger_with_file(&config.log_level, config.log_json, Some(&log_dir))?;

    match cleanup_old_logs(&log_dir) {
        Ok(0) => {}
        Ok(removed) => tracing::info!(removed, "Removed expired log files"),
        Err(e) => tracing::warn!(error = %e, "Failed to clean up old logs"),
    }
    Ok(())
}

pub fn print_banner() {
    println!(
        r#"
    ____                      __
   /  _/___ _   _____  ____  / /_____  _______  __
   / // __ \ | / / _ \/ __ \/ __/ __ \/ ___/ / / /
 _/ // / / / |/ /  __/ / / / /_/ /_/ / /  / /_/ /
/___/_/ /_/|___/\___/_/ /_/\__/\____/_/   \__, /
                                         /____/
    "#
    );
}
