use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};

use crate::auth::{hash_password, verify_password, CurrentAccount};
use crate::error::{AppError, AppResult};
use crate::models::{
    AccountResponse, LoginRequest, PreferenceUpdate, RegisterRequest, TokenResponse,
};
use crate::state::AppState;

/// Handler for account registration. Issues a session token right away
/// so the client does not need a follow-up login.
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> AppResult<Json<TokenResponse>> {
    if state
        .store
        .username_or_email_taken(&request.username, &request.email)
        .await?
    {
        return Err(AppError::Conflict(
            "Username or email already registered".to_string(),
        ));
    }

    let password_hash = hash_password(&request.password)?;
    let account = state
        .store
        .insert_account(&request.username, &request.email, &password_hash)
        .await?;

    tracing::info!(username = %account.username, "Account registered");

    let token = state.codec.issue(&account.username)?;
    Ok(Json(TokenResponse::bearer(token)))
}

/// Handler for login. Unknown username and wrong password fail with the
/// same denial, so the response never reveals which one was wrong.
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> AppResult<Json<TokenResponse>> {
    let account = state
        .store
        .find_account_by_username(&request.username)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

    if !verify_password(&request.password, &account.password_hash) {
        return Err(AppError::InvalidCredentials);
    }

    let token = state.codec.issue(&account.username)?;
    Ok(Json(TokenResponse::bearer(token)))
}

/// Handler returning the authenticated account's public profile
pub async fn me(CurrentAccount(account): CurrentAccount) -> Json<AccountResponse> {
    Json(AccountResponse::from(account))
}

/// Handler replacing the caller's stored preferences
pub async fn save_preferences(
    State(state): State<AppState>,
    CurrentAccount(account): CurrentAccount,
    Json(update): Json<PreferenceUpdate>,
) -> AppResult<Json<Value>> {
    state.store.upsert_preferences(account.id, &update).await?;
    Ok(Json(json!({ "message": "Preferences saved successfully" })))
}

/// Handler returning stored preferences, or an empty object before the
/// first save
pub async fn get_preferences(
    State(state): State<AppState>,
    CurrentAccount(account): CurrentAccount,
) -> AppResult<Json<Value>> {
    let body = match state.store.get_preferences(account.id).await? {
        Some(row) => json!({
            "movie_name": row.movie_name,
            "book_name": row.book_name,
            "place_name": row.place_name,
            "age": row.age,
            "gender": row.gender,
        }),
        None => json!({}),
    };

    Ok(Json(body))
}
