//! Map Model

use serde::{Deserialize, Serialize};

/// Background used when a map is created without one
pub const DEFAULT_BACKGROUND_COLOR: &str = "white";

/// Map entity (a floor plan that items are placed on)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Map {
    pub id: i64,
    pub name: String,
    /// Public path of the floor-plan image, e.g. `/static/maps/main.svg`
    pub svg_path: String,
    pub background_color: String,
}

/// Create map payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapCreate {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub svg_path: String,
    pub background_color: Option<String>,
}

/// Update map payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MapUpdate {
    pub name: Option<String>,
    pub svg_path: Option<String>,
    pub background_color: Option<String>,
}
