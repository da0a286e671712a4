use axum::http::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderValue, Method, StatusCode};
use axum::routing::{delete, get, post};
use axum::{middleware, Json, Router};
use serde_json::{json, Value};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::middleware::{make_span_with_request_id, request_id_middleware};
use crate::state::AppState;

pub mod auth;
pub mod convert;
pub mod recommend;
pub mod saved;

/// Creates the application router with all routes
pub fn create_router(state: AppState) -> Router {
    let cors = cors_layer(&state);

    Router::new()
        .route("/health", get(health_check))
        .nest("/api/auth", auth_routes())
        .nest("/api/saved", saved_routes())
        .nest("/api/gemini", gemini_routes())
        .route("/api/search", post(recommend::search))
        .route("/api/recommendations", post(recommend::recommendations))
        .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(cors)
        .with_state(state)
}

/// Authentication and preference routes under /api/auth
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/me", get(auth::me))
        .route(
            "/preferences",
            post(auth::save_preferences).get(auth::get_preferences),
        )
}

/// Saved-item routes under /api/saved
fn saved_routes() -> Router<AppState> {
    Router::new()
        .route("/save", post(saved::save_item))
        .route("/list", get(saved::list_items))
        .route("/remove/:item_id", delete(saved::remove_item))
        .route("/check/:item_id", get(saved::check_item))
}

/// Generative-model routes under /api/gemini
fn gemini_routes() -> Router<AppState> {
    Router::new()
        .route("/convert", post(convert::convert))
        .route("/health", get(convert::health))
}

/// Credentialed CORS cannot use wildcards, so methods and headers are
/// enumerated and origins come from configuration.
fn cors_layer(state: &AppState) -> CorsLayer {
    let origins: Vec<HeaderValue> = state
        .config
        .cors_origins()
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
            Method::PATCH,
        ])
        .allow_headers([AUTHORIZATION, ACCEPT, CONTENT_TYPE])
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}
