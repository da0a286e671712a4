use axum::extract::{Path, State};
use axum::Json;
use serde_json::{json, Value};

use crate::auth::CurrentAccount;
use crate::error::{AppError, AppResult};
use crate::models::{SaveItemRequest, SavedItemResponse};
use crate::state::AppState;

/// Handler for saving an item. Re-saving an existing item refreshes its
/// favorited flag and returns the stored row either way.
pub async fn save_item(
    State(state): State<AppState>,
    CurrentAccount(account): CurrentAccount,
    Json(request): Json<SaveItemRequest>,
) -> AppResult<Json<SavedItemResponse>> {
    if request.item_id.is_empty() || request.item_name.is_empty() {
        return Err(AppError::Validation(
            "item_id and item_name are required".to_string(),
        ));
    }

    let row = state.store.upsert_saved_item(account.id, &request).await?;
    Ok(Json(SavedItemResponse::from(row)))
}

/// Handler listing the caller's saved items, newest first
pub async fn list_items(
    State(state): State<AppState>,
    CurrentAccount(account): CurrentAccount,
) -> AppResult<Json<Vec<SavedItemResponse>>> {
    let rows = state.store.list_saved(account.id).await?;
    Ok(Json(rows.into_iter().map(SavedItemResponse::from).collect()))
}

/// Handler removing a saved item by its external id
pub async fn remove_item(
    State(state): State<AppState>,
    CurrentAccount(account): CurrentAccount,
    Path(item_id): Path<String>,
) -> AppResult<Json<Value>> {
    if !state.store.delete_saved(account.id, &item_id).await? {
        return Err(AppError::NotFound("Saved item not found".to_string()));
    }

    Ok(Json(json!({ "message": "Item removed from saved list" })))
}

/// Handler reporting whether an item is on the caller's list
pub async fn check_item(
    State(state): State<AppState>,
    CurrentAccount(account): CurrentAccount,
    Path(item_id): Path<String>,
) -> AppResult<Json<Value>> {
    let is_saved = state.store.is_saved(account.id, &item_id).await?;
    Ok(Json(json!({ "is_saved": is_saved })))
}
