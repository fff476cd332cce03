//! Shared types for the inventory catalog
//!
//! Error types, the API error envelope and the Map/Item models used by the
//! server and by API clients.

pub mod error;
pub mod models;

// Re-exports
pub use axum::Json;
pub use http;
pub use serde::{Deserialize, Serialize};
