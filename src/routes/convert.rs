use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};

use crate::error::AppResult;
use crate::models::{ConvertRequest, ConvertResponse};
use crate::state::AppState;

/// Handler for natural-language entity resolution. An unusable model
/// answer comes back as `success: false`; only configuration and quota
/// problems surface as error statuses.
pub async fn convert(
    State(state): State<AppState>,
    Json(request): Json<ConvertRequest>,
) -> AppResult<Json<ConvertResponse>> {
    let response = state
        .gemini
        .convert(&request.query, request.entity_type)
        .await?;

    Ok(Json(response))
}

/// Handler probing the generative-model upstream with a trivial completion
pub async fn health(State(state): State<AppState>) -> AppResult<Json<Value>> {
    state.gemini.health().await?;
    Ok(Json(json!({ "status": "healthy", "message": "Gemini API is working" })))
}
