//! Item Model

use serde::{Deserialize, Serialize};

pub const DEFAULT_ITEM_COLOR: &str = "red";
pub const DEFAULT_ITEM_QUANTITY: i64 = 1;

/// Item entity (a physical object positioned on a map)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Item {
    pub id: i64,
    pub name: String,
    /// Free text, comma separated by convention
    pub tags: String,
    pub x_coord: f64,
    pub y_coord: f64,
    pub map_id: i64,
    /// Public path of the uploaded thumbnail, if any
    pub image_path: Option<String>,
    pub color: String,
    pub zone: String,
    pub quantity: i64,
    pub warning: String,
    pub description: String,
    pub link: String,
}

/// Validated item fields ready for insertion
///
/// `image_path` is never taken from the client. It is filled in by the
/// catalog service after the uploaded asset has been stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemCreate {
    pub name: String,
    pub tags: String,
    pub x_coord: f64,
    pub y_coord: f64,
    pub map_id: i64,
    pub color: String,
    pub zone: String,
    pub quantity: i64,
    pub warning: String,
    pub description: String,
    pub link: String,
}

impl ItemCreate {
    /// New item with the default color, zone, quantity and warning
    pub fn new(name: impl Into<String>, map_id: i64, x_coord: f64, y_coord: f64) -> Self {
        Self {
            name: name.into(),
            tags: String::new(),
            x_coord,
            y_coord,
            map_id,
            color: DEFAULT_ITEM_COLOR.to_string(),
            zone: String::new(),
            quantity: DEFAULT_ITEM_QUANTITY,
            warning: String::new(),
            description: String::new(),
            link: String::new(),
        }
    }
}

/// Partial item update (only `Some` fields are written)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemUpdate {
    pub name: Option<String>,
    pub tags: Option<String>,
    pub x_coord: Option<f64>,
    pub y_coord: Option<f64>,
    pub map_id: Option<i64>,
    pub color: Option<String>,
    pub zone: Option<String>,
    pub quantity: Option<i64>,
    pub warning: Option<String>,
    pub description: Option<String>,
    pub link: Option<String>,
}

impl ItemUpdate {
    /// True when no field would change
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// One entry of a bulk ingestion request
///
/// Fields stay optional on the wire so a missing `name` or `quantity`
/// surfaces as a validation error naming the entry, not a decode failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BulkItem {
    pub name: Option<String>,
    pub tags: Option<String>,
    pub quantity: Option<i64>,
    pub description: Option<String>,
    pub link: Option<String>,
    pub color: Option<String>,
    pub zone: Option<String>,
    pub warning: Option<String>,
}

/// Bulk ingestion request body
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BulkItemsRequest {
    pub map_id: Option<i64>,
    #[serde(default)]
    pub items: Vec<BulkItem>,
}

/// Bulk ingestion result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BulkItemsResult {
    pub added_count: usize,
    pub created_ids: Vec<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_create_defaults() {
        let item = ItemCreate::new("Drill", 1, 10.0, 20.5);
        assert_eq!(item.color, "red");
        assert_eq!(item.quantity, 1);
        assert!(item.tags.is_empty());
        assert!(item.zone.is_empty());
    }

    #[test]
    fn item_update_ignores_unknown_keys() {
        let update: ItemUpdate =
            serde_json::from_str(r#"{"name":"Saw","id":99,"image_path":"/etc/passwd"}"#).unwrap();
        assert_eq!(update.name.as_deref(), Some("Saw"));
        assert!(update.map_id.is_none());
        assert!(!update.is_empty());
        assert!(ItemUpdate::default().is_empty());
    }

    #[test]
    fn bulk_request_tolerates_missing_fields() {
        let req: BulkItemsRequest =
            serde_json::from_str(r#"{"map_id":2,"items":[{"name":"Tape"}]}"#).unwrap();
        assert_eq!(req.map_id, Some(2));
        assert_eq!(req.items.len(), 1);
        assert!(req.items[0].quantity.is_none());

        let req: BulkItemsRequest = serde_json::from_str("{}").unwrap();
        assert!(req.map_id.is_none());
        assert!(req.items.is_empty());
    }

    #[test]
    fn item_serializes_null_image() {
        let item = Item {
            id: 1,
            name: "Drill".into(),
            tags: "power,tool".into(),
            x_coord: 1.0,
            y_coord: 2.0,
            map_id: 1,
            image_path: None,
            color: "red".into(),
            zone: String::new(),
            quantity: 1,
            warning: String::new(),
            description: String::new(),
            link: String::new(),
        };
        let json = serde_json::to_value(&item).unwrap();
        assert!(json["image_path"].is_null());
        assert_eq!(json["tags"], "power,tool");
    }
}
