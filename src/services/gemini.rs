/// Generative-model provider
///
/// Turns free-form natural-language descriptions ("a book about a wizard
/// school") into concrete entity names the taste graph can resolve.
///
/// API Flow:
/// 1. POST /v1beta/models/{model}:generateContent with a JSON-only prompt
/// 2. Parse the first candidate's text as a JSON answer
///
/// Quota errors are the one upstream failure surfaced distinctly, so the
/// client can tell the user to retry later or switch to exact search.
use reqwest::Client as HttpClient;
use serde_json::Value;

use crate::error::{AppError, AppResult};
use crate::models::{ConvertResponse, EntityKind};

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com";

/// Answers below this confidence are treated as failed resolutions
const CONFIDENCE_FLOOR: f64 = 0.3;

const NOT_CONFIGURED_MESSAGE: &str =
    "Gemini model not available - check API key and model configuration";
const MODEL_UNAVAILABLE_MESSAGE: &str =
    "Gemini model not available. Please check API configuration.";
const RATE_LIMIT_MESSAGE: &str =
    "Gemini API rate limit exceeded. Please try again later or use exact search mode.";

#[derive(Clone)]
pub struct GeminiClient {
    http_client: HttpClient,
    api_key: Option<String>,
    api_url: String,
    model: String,
}

impl GeminiClient {
    pub fn new(api_key: Option<String>, model: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_key,
            api_url: GEMINI_API_BASE.to_string(),
            model,
        }
    }

    /// Resolve a natural-language description to a concrete entity name
    pub async fn convert(&self, query: &str, kind: EntityKind) -> AppResult<ConvertResponse> {
        let prompt = build_prompt(query, kind);
        let text = self.generate(&prompt).await?;
        Ok(interpret_completion(&text))
    }

    /// Liveness probe issuing a trivial completion
    pub async fn health(&self) -> AppResult<()> {
        self.generate("Say 'Hello'").await.map(|_| ())
    }

    /// One completion request, returning the first candidate's text
    async fn generate(&self, prompt: &str) -> AppResult<String> {
        let Some(api_key) = self.api_key.as_deref() else {
            return Err(AppError::UpstreamUnavailable(NOT_CONFIGURED_MESSAGE.to_string()));
        };

        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.api_url, self.model
        );
        let body = serde_json::json!({
            "contents": [{ "parts": [{ "text": prompt }] }]
        });

        let response = self
            .http_client
            .post(&url)
            .query(&[("key", api_key)])
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(AppError::UpstreamRateLimited(RATE_LIMIT_MESSAGE.to_string()));
        }
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(AppError::UpstreamUnavailable(MODEL_UNAVAILABLE_MESSAGE.to_string()));
        }
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            if detail.to_lowercase().contains("quota") {
                return Err(AppError::UpstreamRateLimited(RATE_LIMIT_MESSAGE.to_string()));
            }
            tracing::error!(status = %status, detail = %detail, "Gemini request failed");
            return Err(AppError::Internal(format!(
                "Failed to process natural language query: upstream returned {}",
                status
            )));
        }

        let data = response.json::<Value>().await?;
        completion_text(&data).ok_or_else(|| {
            AppError::Internal(
                "Failed to process natural language query: empty completion".to_string(),
            )
        })
    }
}

fn completion_text(data: &Value) -> Option<String> {
    data.get("candidates")?
        .get(0)?
        .get("content")?
        .get("parts")?
        .get(0)?
        .get("text")?
        .as_str()
        .map(str::to_string)
}

fn build_prompt(query: &str, kind: EntityKind) -> String {
    format!(
        r#"You are a helpful assistant that converts natural language descriptions into specific entity names.

Given a description and entity type, return the most likely specific entity name.

Entity Type: {kind}
Description: {query}

Rules:
1. Return ONLY a JSON object with these fields:
   - entity_name: The specific name of the entity
   - entity_type: The entity type (should match the input)
   - confidence: A number between 0 and 1 indicating your confidence
   - explanation: A brief explanation of why you chose this entity

2. For movies, return the exact movie title
3. For books, return the exact book title
4. For TV shows, return the exact show title
5. If you're not confident, set confidence to 0.3 or lower
6. If you can't find a good match, set success to false

Examples:
- "I loved a movie about finance and ambition in New York" -> {{"entity_name": "The Wolf of Wall Street", "entity_type": "movie", "confidence": 0.9, "explanation": "This matches the description of a movie about finance and ambition set in New York"}}
- "A book about a wizard school" -> {{"entity_name": "Harry Potter and the Sorcerer's Stone", "entity_type": "book", "confidence": 0.8, "explanation": "This is the first book in the Harry Potter series about a wizard school"}}
- "A TV show about friends in New York" -> {{"entity_name": "Friends", "entity_type": "tv_show", "confidence": 0.9, "explanation": "This matches the description of a popular TV show about friends living in New York"}}

Return only the JSON object, no other text."#
    )
}

/// Parse the model's answer into a conversion result. Markdown fences,
/// malformed JSON, missing fields, and low confidence all degrade to an
/// unsuccessful response rather than an error.
pub fn interpret_completion(text: &str) -> ConvertResponse {
    let mut trimmed = text.trim();
    if let Some(rest) = trimmed.strip_prefix("```json") {
        trimmed = rest;
    }
    if let Some(rest) = trimmed.strip_suffix("```") {
        trimmed = rest;
    }
    let trimmed = trimmed.trim();

    let parsed: Value = match serde_json::from_str(trimmed) {
        Ok(parsed) => parsed,
        Err(_) => return ConvertResponse::failure("Failed to parse Gemini response"),
    };

    let entity_name = parsed
        .get("entity_name")
        .and_then(Value::as_str)
        .filter(|name| !name.is_empty());
    let entity_type = parsed
        .get("entity_type")
        .and_then(Value::as_str)
        .filter(|kind| !kind.is_empty());
    let (Some(entity_name), Some(entity_type)) = (entity_name, entity_type) else {
        return ConvertResponse::failure("Could not extract a valid entity name from the response");
    };

    let confidence = parsed
        .get("confidence")
        .and_then(Value::as_f64)
        .unwrap_or(0.0);
    if confidence < CONFIDENCE_FLOOR {
        return ConvertResponse::failure(&format!(
            "Low confidence ({}) in the suggested entity",
            confidence
        ));
    }

    ConvertResponse {
        success: true,
        entity_name: Some(entity_name.to_string()),
        entity_type: Some(entity_type.to_string()),
        confidence: Some(confidence),
        explanation: Some(
            parsed
                .get("explanation")
                .and_then(Value::as_str)
                .unwrap_or("")
                .to_string(),
        ),
    }
}
