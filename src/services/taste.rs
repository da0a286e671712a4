/// Taste-graph API provider
///
/// Wraps the upstream entity catalogue used for both free-text entity
/// search and personalized "insights" queries.
///
/// API Flow:
/// 1. Resolution: /search?query=..&types=urn:entity:{kind} → entity ids
/// 2. Insights: /v2/insights with interest signals → entity records
///
/// Every upstream failure here degrades to an empty result. Callers treat
/// missing taste data as a normal outcome, not an error.
use async_trait::async_trait;
use reqwest::Client as HttpClient;
use serde_json::Value;

use crate::models::EntityKind;

/// Fixed page size requested from the insights endpoint
const PAGE_SIZE: &str = "10";

/// Popularity floor for the unpersonalized "trending" query
const POPULARITY_FLOOR: &str = "0.95";

/// Trait for taste-graph backends
///
/// The production implementation talks HTTP; tests substitute a fake to
/// exercise orchestration without a network.
#[async_trait]
pub trait TasteGraph: Send + Sync {
    /// Raw search hits for a free-text name within a category
    async fn search(&self, query: &str, kind: EntityKind) -> Vec<Value>;

    /// First matching entity id for a name, or None when nothing matches
    /// or the upstream is unreachable
    async fn resolve(&self, name: &str, kind: EntityKind) -> Option<String>;

    /// Insight records for a category, biased by interest signals and
    /// optional demographics
    async fn recommend(
        &self,
        signals: &[String],
        age: Option<&str>,
        gender: Option<&str>,
        kind: EntityKind,
    ) -> Vec<Value>;

    /// Insight records for a category filtered by popularity alone,
    /// with no personalization signals
    async fn popular(&self, kind: EntityKind) -> Vec<Value>;

    /// Full-detail record for a single entity id
    async fn entity_details(&self, entity_id: &str, kind: EntityKind) -> Option<Value>;

    /// Whether an upstream credential is configured at all
    fn has_api_key(&self) -> bool;
}

#[derive(Clone)]
pub struct QlooClient {
    http_client: HttpClient,
    api_key: Option<String>,
    api_url: String,
}

impl QlooClient {
    pub fn new(api_url: String, api_key: Option<String>) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_key,
            api_url,
        }
    }

    /// One upstream GET. A missing key, transport failure, error status,
    /// or unparseable body all collapse to None.
    async fn get_json(&self, path: &str, params: &[(&str, String)]) -> Option<Value> {
        let Some(api_key) = self.api_key.as_deref() else {
            tracing::warn!("QLOO_API_KEY is not configured; returning no results");
            return None;
        };

        let url = format!("{}{}", self.api_url, path);
        let response = match self
            .http_client
            .get(&url)
            .query(params)
            .header("x-api-key", api_key)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
        {
            Ok(response) => response,
            Err(error) => {
                tracing::warn!(error = %error, path = %path, "Taste graph request failed");
                return None;
            }
        };

        if !response.status().is_success() {
            tracing::warn!(
                status = %response.status(),
                path = %path,
                "Taste graph returned an error status"
            );
            return None;
        }

        response.json::<Value>().await.ok()
    }
}

#[async_trait]
impl TasteGraph for QlooClient {
    async fn search(&self, query: &str, kind: EntityKind) -> Vec<Value> {
        let params = [("query", query.to_string()), ("types", kind.urn())];
        match self.get_json("/search", &params).await {
            Some(data) => search_hits(&data),
            None => Vec::new(),
        }
    }

    async fn resolve(&self, name: &str, kind: EntityKind) -> Option<String> {
        let params = [("query", name.to_string()), ("types", kind.urn())];
        let data = self.get_json("/search", &params).await?;
        first_entity_id(&data)
    }

    async fn recommend(
        &self,
        signals: &[String],
        age: Option<&str>,
        gender: Option<&str>,
        kind: EntityKind,
    ) -> Vec<Value> {
        let mut params = vec![
            ("filter.type", kind.urn()),
            ("signal.interests.entities", signals.join(",")),
        ];
        // Demographic params are omitted entirely when unknown; the
        // upstream rejects blank values.
        if let Some(age) = age {
            params.push(("signal.demographics.age", age.to_string()));
        }
        if let Some(gender) = gender {
            params.push(("signal.demographics.gender", gender.to_string()));
        }
        params.push(("feature.explainability", "true".to_string()));
        params.push(("take", PAGE_SIZE.to_string()));

        match self.get_json("/v2/insights", &params).await {
            Some(data) => insight_entities(&data),
            None => Vec::new(),
        }
    }

    async fn popular(&self, kind: EntityKind) -> Vec<Value> {
        let params = [
            ("filter.type", kind.urn()),
            ("filter.popularity.min", POPULARITY_FLOOR.to_string()),
            ("feature.explainability", "true".to_string()),
            ("take", PAGE_SIZE.to_string()),
        ];

        match self.get_json("/v2/insights", &params).await {
            Some(data) => insight_entities(&data),
            None => Vec::new(),
        }
    }

    async fn entity_details(&self, entity_id: &str, kind: EntityKind) -> Option<Value> {
        let params = [
            ("filter.type", kind.urn()),
            ("filter.entity_id", entity_id.to_string()),
            ("feature.explainability", "true".to_string()),
            ("take", "1".to_string()),
        ];

        let data = self.get_json("/v2/insights", &params).await?;
        insight_entities(&data).into_iter().next()
    }

    fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }
}

/// Unwrap search hits from either `{"results": [...]}` or a bare array.
/// Anything else is treated as no hits.
fn search_hits(data: &Value) -> Vec<Value> {
    if let Some(results) = data.get("results").and_then(Value::as_array) {
        return results.clone();
    }
    if let Some(items) = data.as_array() {
        return items.clone();
    }
    Vec::new()
}

/// Entity id of the first search hit, accepting both response shapes
fn first_entity_id(data: &Value) -> Option<String> {
    search_hits(data)
        .first()?
        .get("entity_id")?
        .as_str()
        .map(str::to_string)
}

/// Entity list out of an insights response body
fn insight_entities(data: &Value) -> Vec<Value> {
    data.get("results")
        .and_then(|results| results.get("entities"))
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_first_entity_id_wrapped_shape() {
        let data = json!({"results": [{"entity_id": "abc"}, {"entity_id": "def"}]});
        assert_eq!(first_entity_id(&data), Some("abc".to_string()));
    }

    #[test]
    fn test_first_entity_id_bare_array_shape() {
        let data = json!([{"entity_id": "abc"}, {"entity_id": "def"}]);
        assert_eq!(first_entity_id(&data), Some("abc".to_string()));
    }

    #[test]
    fn test_both_shapes_agree_on_same_data() {
        let hit = json!({"entity_id": "urn:entity:book:dune", "name": "Dune"});
        let wrapped = json!({"results": [hit.clone()]});
        let bare = json!([hit]);
        assert_eq!(first_entity_id(&wrapped), first_entity_id(&bare));
        assert_eq!(first_entity_id(&wrapped), Some("urn:entity:book:dune".to_string()));
    }

    #[test]
    fn test_first_entity_id_empty_or_malformed() {
        assert_eq!(first_entity_id(&json!({"results": []})), None);
        assert_eq!(first_entity_id(&json!([])), None);
        assert_eq!(first_entity_id(&json!({})), None);
        assert_eq!(first_entity_id(&json!("nonsense")), None);
        // First hit lacking an id does not fall through to later hits.
        assert_eq!(
            first_entity_id(&json!({"results": [{"name": "x"}, {"entity_id": "abc"}]})),
            None
        );
    }

    #[test]
    fn test_search_hits_shapes() {
        let wrapped = json!({"results": [{"entity_id": "a"}, {"entity_id": "b"}]});
        assert_eq!(search_hits(&wrapped).len(), 2);

        let bare = json!([{"entity_id": "a"}]);
        assert_eq!(search_hits(&bare).len(), 1);

        assert!(search_hits(&json!({"other": 1})).is_empty());
    }

    #[test]
    fn test_insight_entities_expected_shape() {
        let data = json!({"results": {"entities": [{"name": "Dune"}]}});
        let entities = insight_entities(&data);
        assert_eq!(entities.len(), 1);
        assert_eq!(entities[0]["name"], "Dune");
    }

    #[test]
    fn test_insight_entities_missing_keys() {
        assert!(insight_entities(&json!({})).is_empty());
        assert!(insight_entities(&json!({"results": {}})).is_empty());
        assert!(insight_entities(&json!({"results": {"entities": "bad"}})).is_empty());
    }

    #[tokio::test]
    async fn test_unconfigured_client_degrades_to_empty() {
        let client = QlooClient::new("http://unused.local".to_string(), None);
        assert!(!client.has_api_key());
        assert_eq!(client.resolve("Dune", EntityKind::Book).await, None);
        assert!(client.search("Dune", EntityKind::Book).await.is_empty());
        assert!(client.popular(EntityKind::Book).await.is_empty());
        assert!(client
            .recommend(&["id".to_string()], None, None, EntityKind::Movie)
            .await
            .is_empty());
        assert_eq!(client.entity_details("id", EntityKind::Book).await, None);
    }
}
