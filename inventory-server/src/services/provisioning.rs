//! Default map provisioning
//!
//! A fresh catalog gets the two floor plans the workshop ships with. The
//! step is idempotent: if any map exists nothing is written.

use shared::models::{DEFAULT_BACKGROUND_COLOR, MapCreate};
use sqlx::SqlitePool;

use crate::db::begin_write;
use crate::db::repository::{RepoResult, map};

/// (name, svg_path) of the maps a fresh catalog starts with
pub const DEFAULT_MAPS: &[(&str, &str)] = &[
    ("iLab", "/static/maps/main.svg"),
    ("Closet", "/static/maps/closet.svg"),
];

/// Insert [`DEFAULT_MAPS`] when the map table is empty
///
/// Returns the number of maps inserted (0 when skipped).
pub async fn provision_default_maps(pool: &SqlitePool) -> RepoResult<usize> {
    let mut tx = begin_write(pool).await?;

    let existing = map::count(&mut *tx).await?;
    if existing > 0 {
        tracing::info!(existing, "Maps already present, skipping default map provisioning");
        return Ok(0);
    }

    for (name, svg_path) in DEFAULT_MAPS {
        let data = MapCreate {
            name: (*name).to_string(),
            svg_path: (*svg_path).to_string(),
            background_color: Some(DEFAULT_BACKGROUND_COLOR.to_string()),
        };
        map::create(&mut *tx, &data).await?;
    }
    tx.commit().await?;

    tracing::info!(count = DEFAULT_MAPS.len(), "Default maps provisioned");
    Ok(DEFAULT_MAPS.len())
}
