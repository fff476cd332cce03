//! Data models
//!
//! Shared between the inventory server and API clients.
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` (SQLite INTEGER PRIMARY KEY).

pub mod item;
pub mod map;

// Re-exports
pub use item::*;
pub use map::*;
