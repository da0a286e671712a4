use std::convert::Infallible;

use axum::async_trait;
use axum::extract::{FromRef, FromRequestParts};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use crate::error::AppError;
use crate::models::Account;
use crate::state::AppState;

/// Account resolved from the request's bearer token.
///
/// Extraction validates the token and then confirms the subject account
/// still exists; both steps are required, so a well-signed token for a
/// deleted account is rejected the same way as a bad signature.
pub struct CurrentAccount(pub Account);

/// Like [`CurrentAccount`] but resolves to `None` instead of rejecting,
/// for endpoints that personalize when possible and degrade when not.
pub struct MaybeAccount(pub Option<Account>);

fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

async fn resolve_account(state: &AppState, parts: &Parts) -> Result<Account, AppError> {
    let token = bearer_token(parts).ok_or(AppError::Unauthorized)?;
    let username = state.codec.validate(token)?;

    state
        .store
        .find_account_by_username(&username)
        .await?
        .ok_or(AppError::Unauthorized)
}

#[async_trait]
impl<S> FromRequestParts<S> for CurrentAccount
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = AppState::from_ref(state);
        resolve_account(&state, parts).await.map(CurrentAccount)
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for MaybeAccount
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = AppState::from_ref(state);
        Ok(MaybeAccount(resolve_account(&state, parts).await.ok()))
    }
}
