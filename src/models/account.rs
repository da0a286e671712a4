use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Registered user row. Never serialized directly: responses go through
/// `AccountResponse` so the password hash cannot leak.
#[derive(Debug, Clone, FromRow)]
pub struct Account {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Public projection of an account
#[derive(Debug, Serialize, Deserialize)]
pub struct AccountResponse {
    pub id: i64,
    pub username: String,
    pub email: String,
}

impl From<Account> for AccountResponse {
    fn from(account: Account) -> Self {
        Self {
            id: account.id,
            username: account.username,
            email: account.email,
        }
    }
}

/// Registration payload
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Login payload
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Issued session token
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

impl TokenResponse {
    pub fn bearer(access_token: String) -> Self {
        Self {
            access_token,
            token_type: "bearer".to_string(),
        }
    }
}

/// Stored preference row, at most one per account
#[derive(Debug, Clone, FromRow)]
pub struct PreferenceRow {
    pub id: i64,
    pub account_id: i64,
    pub movie_name: Option<String>,
    pub book_name: Option<String>,
    pub place_name: Option<String>,
    pub age: Option<String>,
    pub gender: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Incoming preference payload. A save replaces the whole stored row, so
/// absent fields clear their stored values.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PreferenceUpdate {
    pub movie_name: Option<String>,
    pub book_name: Option<String>,
    pub place_name: Option<String>,
    pub age: Option<String>,
    pub gender: Option<String>,
}
