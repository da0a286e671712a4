use chrono::Utc;

use crate::error::AppResult;
use crate::models::{SaveItemRequest, SavedItemRow};

use super::Store;

impl Store {
    /// Insert a saved item, or refresh its favorited flag when the
    /// (account, item) pair already exists. Name, image, and description
    /// keep their first-save values on conflict.
    pub async fn upsert_saved_item(
        &self,
        account_id: i64,
        item: &SaveItemRequest,
    ) -> AppResult<SavedItemRow> {
        let row = sqlx::query_as::<_, SavedItemRow>(
            "INSERT INTO saved_items
                 (account_id, item_id, item_name, item_type, item_image,
                  item_description, favorited, saved_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)
             ON CONFLICT(account_id, item_id) DO UPDATE SET favorited = excluded.favorited
             RETURNING id, account_id, item_id, item_name, item_type, item_image,
                       item_description, favorited, saved_at",
        )
        .bind(account_id)
        .bind(&item.item_id)
        .bind(&item.item_name)
        .bind(item.item_type)
        .bind(&item.item_image)
        .bind(&item.item_description)
        .bind(item.favorited)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn list_saved(&self, account_id: i64) -> AppResult<Vec<SavedItemRow>> {
        let rows = sqlx::query_as::<_, SavedItemRow>(
            "SELECT id, account_id, item_id, item_name, item_type, item_image,
                    item_description, favorited, saved_at
             FROM saved_items WHERE account_id = ?
             ORDER BY saved_at DESC, id DESC",
        )
        .bind(account_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Delete a saved item, reporting whether a row existed
    pub async fn delete_saved(&self, account_id: i64, item_id: &str) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM saved_items WHERE account_id = ? AND item_id = ?")
            .bind(account_id)
            .bind(item_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn is_saved(&self, account_id: i64, item_id: &str) -> AppResult<bool> {
        let saved = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM saved_items WHERE account_id = ? AND item_id = ?)",
        )
        .bind(account_id)
        .bind(item_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(saved)
    }

    /// External ids of the account's favorited items, used as extra
    /// recommendation signals
    pub async fn favorite_item_ids(&self, account_id: i64) -> AppResult<Vec<String>> {
        let ids = sqlx::query_scalar::<_, String>(
            "SELECT item_id FROM saved_items WHERE account_id = ? AND favorited = 1",
        )
        .bind(account_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(ids)
    }
}
