//! Repository Module
//!
//! Plain async functions over SQLite. Single-statement functions accept any
//! [`sqlx::SqliteExecutor`] so they work on the pool and inside an open
//! transaction alike.

pub mod item;
pub mod map;

use shared::error::AppError;
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    /// Foreign key or check constraint rejected the write
    #[error("Constraint violation: {0}")]
    Constraint(String),

    #[error("Database error: {0}")]
    Database(sqlx::Error),
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err
            && (db_err.is_foreign_key_violation() || db_err.is_check_violation())
        {
            return RepoError::Constraint(db_err.message().to_string());
        }
        RepoError::Database(err)
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::Constraint(msg) => {
                tracing::warn!(error = %msg, "Write rejected by database constraint");
                AppError::conflict("Write conflicts with existing catalog data")
            }
            RepoError::Database(e) => {
                tracing::error!(error = %e, "Repository database error");
                AppError::database("Database error")
            }
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;
