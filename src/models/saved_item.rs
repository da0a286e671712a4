use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::EntityKind;

/// Saved media item row, unique per (account, item)
#[derive(Debug, Clone, FromRow)]
pub struct SavedItemRow {
    pub id: i64,
    pub account_id: i64,
    pub item_id: String,
    pub item_name: String,
    pub item_type: EntityKind,
    pub item_image: String,
    pub item_description: String,
    pub favorited: bool,
    pub saved_at: DateTime<Utc>,
}

/// Payload for saving an item. Re-saving an already saved item refreshes
/// its favorited flag instead of creating a duplicate.
#[derive(Debug, Deserialize)]
pub struct SaveItemRequest {
    pub item_id: String,
    pub item_name: String,
    pub item_type: EntityKind,
    #[serde(default)]
    pub item_image: String,
    #[serde(default)]
    pub item_description: String,
    #[serde(default)]
    pub favorited: bool,
}

/// Saved item as returned to the client
#[derive(Debug, Serialize, Deserialize)]
pub struct SavedItemResponse {
    pub id: i64,
    pub item_id: String,
    pub item_name: String,
    pub item_type: EntityKind,
    pub item_image: String,
    pub item_description: String,
    pub favorited: bool,
    pub saved_at: DateTime<Utc>,
}

impl From<SavedItemRow> for SavedItemResponse {
    fn from(row: SavedItemRow) -> Self {
        Self {
            id: row.id,
            item_id: row.item_id,
            item_name: row.item_name,
            item_type: row.item_type,
            item_image: row.item_image,
            item_description: row.item_description,
            favorited: row.favorited,
            saved_at: row.saved_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_save_request_defaults() {
        let request: SaveItemRequest = serde_json::from_value(json!({
            "item_id": "m1",
            "item_name": "Dune",
            "item_type": "movie"
        }))
        .unwrap();

        assert_eq!(request.item_image, "");
        assert_eq!(request.item_description, "");
        assert!(!request.favorited);
    }

    #[test]
    fn test_saved_item_response_hides_account_id() {
        let row = SavedItemRow {
            id: 7,
            account_id: 3,
            item_id: "m1".to_string(),
            item_name: "Dune".to_string(),
            item_type: EntityKind::Movie,
            item_image: "".to_string(),
            item_description: "".to_string(),
            favorited: true,
            saved_at: Utc::now(),
        };

        let value = serde_json::to_value(SavedItemResponse::from(row)).unwrap();
        assert_eq!(value["item_id"], "m1");
        assert_eq!(value["item_type"], "movie");
        assert!(value.get("account_id").is_none());
    }
}
