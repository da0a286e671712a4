use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt::Display;

/// Content category recognized by the taste-graph upstream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum EntityKind {
    Book,
    Movie,
    TvShow,
    Place,
}

impl EntityKind {
    /// URN form used by the upstream search and insights endpoints
    pub fn urn(&self) -> String {
        format!("urn:entity:{}", self)
    }
}

impl Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            EntityKind::Book => "book",
            EntityKind::Movie => "movie",
            EntityKind::TvShow => "tv_show",
            EntityKind::Place => "place",
        };
        write!(f, "{}", name)
    }
}

/// Canonical entity record assembled from inconsistent upstream shapes.
///
/// Absent attributes serialize as null rather than being omitted: clients
/// rely on the full shape always being present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExternalEntity {
    pub entity_id: Option<String>,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: EntityKind,
    pub image: Option<Value>,
    pub image_url: Option<Value>,
    pub rating: Option<Value>,
    pub rating_count: Option<Value>,
    pub author: Option<Value>,
    pub properties: EntityProperties,
    pub external: Option<ExternalRefs>,
}

/// Flattened metadata block of a canonical entity. Values are passed
/// through from the upstream record untyped since the upstream mixes
/// strings, numbers, and arrays for the same logical field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntityProperties {
    pub short_description: Option<Value>,
    pub description: Option<Value>,
    pub publication_year: Option<Value>,
    pub publication_date: Option<Value>,
    pub genre: Option<Value>,
    pub page_count: Option<Value>,
    pub language: Option<Value>,
    pub publisher: Option<Value>,
    pub isbn13: Option<Value>,
    pub format: Option<Value>,
    pub image: Option<ImageRef>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageRef {
    pub url: Value,
}

/// Cross-reference identifiers on third-party catalogues
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExternalRefs {
    pub goodreads: Value,
}

/// Request body for entity search
#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    pub query: String,
    pub entity_type: EntityKind,
}

/// Response wrapper for entity search
#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub results: Vec<ExternalEntity>,
}

/// Request body for recommendations. Every field is optional: absent
/// fields fall back to the caller's stored preferences when authenticated.
#[derive(Debug, Default, Deserialize)]
pub struct RecommendationRequest {
    pub book_name: Option<String>,
    pub movie_name: Option<String>,
    pub place_name: Option<String>,
    pub age: Option<String>,
    pub gender: Option<String>,
}

/// Combined per-category recommendation lists. List order is fixed no
/// matter which upstream query finishes first.
#[derive(Debug, Serialize, Deserialize)]
pub struct RecommendationResponse {
    pub book_recs: Vec<ExternalEntity>,
    pub popular_books: Vec<ExternalEntity>,
    pub movie_recs: Vec<ExternalEntity>,
    pub tv_show_recs: Vec<ExternalEntity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl RecommendationResponse {
    /// Empty result set carrying an explanation instead of an error
    pub fn empty_with_message(message: &str) -> Self {
        Self {
            book_recs: Vec::new(),
            popular_books: Vec::new(),
            movie_recs: Vec::new(),
            tv_show_recs: Vec::new(),
            message: Some(message.to_string()),
        }
    }
}

/// Request body for natural-language entity resolution
#[derive(Debug, Deserialize)]
pub struct ConvertRequest {
    pub query: String,
    pub entity_type: EntityKind,
}

/// Outcome of a natural-language resolution attempt. An unusable model
/// answer is reported as `success: false`, never as a request failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConvertResponse {
    pub success: bool,
    pub entity_name: Option<String>,
    pub entity_type: Option<String>,
    pub confidence: Option<f64>,
    pub explanation: Option<String>,
}

impl ConvertResponse {
    pub fn failure(explanation: &str) -> Self {
        Self {
            success: false,
            entity_name: None,
            entity_type: None,
            confidence: None,
            explanation: Some(explanation.to_string()),
        }
    }
}
