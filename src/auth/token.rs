use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

/// Claims carried by a session token
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: i64,
}

/// Issues and validates signed, time-limited session tokens. Tokens are
/// stateless: validity is purely signature plus expiry, with no
/// revocation list.
#[derive(Clone)]
pub struct TokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl_minutes: i64,
}

impl TokenCodec {
    pub fn new(secret: &str, ttl_minutes: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl_minutes,
        }
    }

    /// Sign a token for `username` expiring after the configured lifetime
    pub fn issue(&self, username: &str) -> AppResult<String> {
        let claims = Claims {
            sub: username.to_string(),
            exp: (Utc::now() + Duration::minutes(self.ttl_minutes)).timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| AppError::Internal(format!("Token signing failed: {}", e)))
    }

    /// Decode and verify a token, returning the subject username. Bad
    /// signature, malformed structure, and elapsed expiry all map to the
    /// same denial.
    pub fn validate(&self, token: &str) -> AppResult<String> {
        // No clock-skew allowance: a token is invalid the second it expires.
        let mut validation = Validation::default();
        validation.leeway = 0;

        decode::<Claims>(token, &self.decoding, &validation)
            .map(|data| data.claims.sub)
            .map_err(|_| AppError::Unauthorized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_then_validate_returns_subject() {
        let codec = TokenCodec::new("test-secret", 30);
        let token = codec.issue("alice").unwrap();
        assert_eq!(codec.validate(&token).unwrap(), "alice");
    }

    #[test]
    fn test_expired_token_rejected() {
        let codec = TokenCodec::new("test-secret", -5);
        let token = codec.issue("alice").unwrap();
        assert!(matches!(codec.validate(&token), Err(AppError::Unauthorized)));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let signer = TokenCodec::new("secret-a", 30);
        let verifier = TokenCodec::new("secret-b", 30);
        let token = signer.issue("alice").unwrap();
        assert!(verifier.validate(&token).is_err());
    }

    #[test]
    fn test_garbage_token_rejected() {
        let codec = TokenCodec::new("test-secret", 30);
        assert!(codec.validate("not-a-token").is_err());
        assert!(codec.validate("").is_err());
    }

    #[test]
    fn test_tampered_payload_rejected() {
        let codec = TokenCodec::new("test-secret", 30);
        let token = codec.issue("alice").unwrap();

        let other = codec.issue("mallory").unwrap();
        let mut parts: Vec<&str> = token.split('.').collect();
        let other_parts: Vec<&str> = other.split('.').collect();
        parts[1] = other_parts[1];
        let spliced = parts.join(".");

        assert!(codec.validate(&spliced).is_err());
    }
}
