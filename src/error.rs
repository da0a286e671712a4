use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Application-level errors
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    /// Login denial. Unknown username and wrong password both map here so
    /// the response cannot be used to probe which usernames exist.
    #[error("Incorrect username or password")]
    InvalidCredentials,

    /// Bearer-token denial: missing/malformed/expired token, or a token
    /// whose subject no longer resolves to an account.
    #[error("Could not validate credentials")]
    Unauthorized,

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    UpstreamUnavailable(String),

    #[error("{0}")]
    UpstreamRateLimited(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::InvalidCredentials | AppError::Unauthorized => {
                (StatusCode::UNAUTHORIZED, self.to_string())
            }
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::UpstreamUnavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg),
            AppError::UpstreamRateLimited(msg) => (StatusCode::TOO_MANY_REQUESTS, msg),
            AppError::HttpClient(_) => (StatusCode::BAD_GATEWAY, self.to_string()),
            // Never echo internal failure detail back to the client.
            AppError::Database(ref e) => {
                tracing::error!(error = %e, "Database failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Database error".to_string(),
                )
            }
            AppError::Internal(ref e) => {
                tracing::error!(error = %e, "Internal failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_denial_message_is_fixed() {
        // Unknown-user and wrong-password failures share this single variant,
        // so the surfaced message cannot distinguish them.
        assert_eq!(
            AppError::InvalidCredentials.to_string(),
            "Incorrect username or password"
        );
    }

    #[test]
    fn test_status_mapping() {
        let cases = [
            (
                AppError::Conflict("taken".into()).into_response().status(),
                StatusCode::CONFLICT,
            ),
            (
                AppError::Unauthorized.into_response().status(),
                StatusCode::UNAUTHORIZED,
            ),
            (
                AppError::NotFound("missing".into()).into_response().status(),
                StatusCode::NOT_FOUND,
            ),
            (
                AppError::Validation("bad".into()).into_response().status(),
                StatusCode::BAD_REQUEST,
            ),
            (
                AppError::UpstreamRateLimited("quota".into())
                    .into_response()
                    .status(),
                StatusCode::TOO_MANY_REQUESTS,
            ),
            (
                AppError::UpstreamUnavailable("down".into())
                    .into_response()
                    .status(),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
        ];

        for (got, want) in cases {
            assert_eq!(got, want);
        }
    }
}
