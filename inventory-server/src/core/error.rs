//! Startup and serve errors
//!
//! Request handlers use [`shared::error::AppError`]; this type only covers
//! what can go wrong while bringing the server up or running the listener.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("初始化失败: {0}")]
    Init(#[from] shared::error::AppError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("内部服务器错误: {0}")]
    Internal(#[from] anyhow::Error),
}

/// Result 类型别名
pub type Result<T> = std::result::Result<T, ServerError>;
