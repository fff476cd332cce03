//! HTTP API
//!
//! | 模块 | 路径 |
//! |------|------|
//! | maps | /api/maps |
//! | items | /api/items |
//! | search | /api/search |
//! | bulk | /api/bulk_items |
//! | assets | /api/assets/check |
//! | health | /health |

use serde::Serialize;

pub mod assets;
pub mod bulk;
pub mod extract;
pub mod health;
pub mod items;
pub mod maps;
pub mod search;

/// `{ "message": ... }` body for operations without a payload
#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
