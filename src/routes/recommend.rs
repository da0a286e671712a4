use axum::extract::State;
use axum::Json;

use crate::auth::MaybeAccount;
use crate::error::AppResult;
use crate::models::{RecommendationRequest, RecommendationResponse, SearchRequest, SearchResponse};
use crate::services::{build_recommendations, search_entities};
use crate::state::AppState;

/// Handler for entity search. Upstream flakiness shows up as an empty
/// result list, never as an error status.
pub async fn search(
    State(state): State<AppState>,
    Json(request): Json<SearchRequest>,
) -> Json<SearchResponse> {
    let results =
        search_entities(state.taste.as_ref(), &request.query, request.entity_type).await;
    Json(SearchResponse { results })
}

/// Handler for combined per-category recommendations. Works with or
/// without a bearer token; authentication only adds stored preferences
/// and favorites as extra signals.
pub async fn recommendations(
    State(state): State<AppState>,
    MaybeAccount(account): MaybeAccount,
    Json(request): Json<RecommendationRequest>,
) -> AppResult<Json<RecommendationResponse>> {
    let response = build_recommendations(
        &state.store,
        state.taste.as_ref(),
        &request,
        account.as_ref(),
    )
    .await?;

    Ok(Json(response))
}
