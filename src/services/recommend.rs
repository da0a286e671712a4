use tokio::join;

use crate::db::Store;
use crate::error::AppResult;
use crate::models::{Account, EntityKind, RecommendationRequest, RecommendationResponse};
use crate::services::normalize::normalize_all;
use crate::services::taste::TasteGraph;

const NO_API_KEY_MESSAGE: &str =
    "API key not configured. Please set QLOO_API_KEY in your .env file.";
const NO_PREFERENCES_MESSAGE: &str = "No preferences found. Please set your preferences first.";

/// Merge request overrides with stored preferences, resolve names to
/// interest signals, and fan out one insights query per content category.
///
/// Unresolvable names are skipped silently; an empty signal set produces
/// an empty result with an explanatory message rather than an error.
pub async fn build_recommendations(
    store: &Store,
    taste: &dyn TasteGraph,
    request: &RecommendationRequest,
    account: Option<&Account>,
) -> AppResult<RecommendationResponse> {
    let mut stored = None;
    let mut favorites = Vec::new();
    if let Some(account) = account {
        stored = store.get_preferences(account.id).await?;
        favorites = store.favorite_item_ids(account.id).await?;
    }

    // Request-supplied values win; stored preferences fill the gaps. A
    // blank string counts as absent on both sides, so a cleared field
    // falls through to the stored value instead of masking it.
    let book_name = non_blank(&request.book_name)
        .or_else(|| stored.as_ref().and_then(|p| non_blank(&p.book_name)));
    let movie_name = non_blank(&request.movie_name)
        .or_else(|| stored.as_ref().and_then(|p| non_blank(&p.movie_name)));
    let place_name = non_blank(&request.place_name)
        .or_else(|| stored.as_ref().and_then(|p| non_blank(&p.place_name)));
    let age = non_blank(&request.age).or_else(|| stored.as_ref().and_then(|p| non_blank(&p.age)));
    let gender =
        non_blank(&request.gender).or_else(|| stored.as_ref().and_then(|p| non_blank(&p.gender)));

    let mut signals = Vec::new();
    for (name, kind) in [
        (book_name.as_deref(), EntityKind::Book),
        (movie_name.as_deref(), EntityKind::Movie),
        (place_name.as_deref(), EntityKind::Place),
    ] {
        let Some(name) = name else { continue };
        match taste.resolve(name, kind).await {
            Some(entity_id) => signals.push(entity_id),
            None => {
                tracing::debug!(name = %name, kind = %kind, "Preference did not resolve to an entity")
            }
        }
    }

    // Favorites contribute signals whether or not any preference resolved.
    signals.extend(favorites);

    if signals.is_empty() {
        let message = if taste.has_api_key() {
            NO_PREFERENCES_MESSAGE
        } else {
            NO_API_KEY_MESSAGE
        };
        return Ok(RecommendationResponse::empty_with_message(message));
    }

    tracing::debug!(signals = signals.len(), "Running per-category insight queries");

    let age = age.as_deref();
    let gender = gender.as_deref();

    // The four queries run concurrently; the tuple keeps the response
    // lists in a fixed order no matter which finishes first.
    let (book_recs, popular_books, movie_recs, tv_show_recs) = join!(
        taste.recommend(&signals, age, gender, EntityKind::Book),
        taste.popular(EntityKind::Book),
        taste.recommend(&signals, age, gender, EntityKind::Movie),
        taste.recommend(&signals, age, gender, EntityKind::TvShow),
    );

    Ok(RecommendationResponse {
        book_recs: normalize_all(&book_recs, EntityKind::Book),
        popular_books: normalize_all(&popular_books, EntityKind::Book),
        movie_recs: normalize_all(&movie_recs, EntityKind::Movie),
        tv_show_recs: normalize_all(&tv_show_recs, EntityKind::TvShow),
        message: None,
    })
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_store;
    use crate::models::{EntityKind, SaveItemRequest};
    use async_trait::async_trait;
    use serde_json::{json, Value};
    use std::collections::HashMap;
    use std::sync::Mutex;

    struct FakeTasteGraph {
        resolved: HashMap<String, String>,
        has_key: bool,
        seen_signals: Mutex<Vec<Vec<String>>>,
        seen_demographics: Mutex<Vec<(Option<String>, Option<String>)>>,
    }

    impl FakeTasteGraph {
        fn new(has_key: bool) -> Self {
            Self {
                resolved: HashMap::new(),
                has_key,
                seen_signals: Mutex::new(Vec::new()),
                seen_demographics: Mutex::new(Vec::new()),
            }
        }

        fn resolving(mut self, name: &str, entity_id: &str) -> Self {
            self.resolved.insert(name.to_string(), entity_id.to_string());
            self
        }
    }

    #[async_trait]
    impl TasteGraph for FakeTasteGraph {
        async fn search(&self, _query: &str, _kind: EntityKind) -> Vec<Value> {
            Vec::new()
        }

        async fn resolve(&self, name: &str, _kind: EntityKind) -> Option<String> {
            self.resolved.get(name).cloned()
        }

        async fn recommend(
            &self,
            signals: &[String],
            age: Option<&str>,
            gender: Option<&str>,
            kind: EntityKind,
        ) -> Vec<Value> {
            self.seen_signals.lock().unwrap().push(signals.to_vec());
            self.seen_demographics
                .lock()
                .unwrap()
                .push((age.map(str::to_string), gender.map(str::to_string)));
            vec![json!({
                "entity_id": format!("{}-rec", kind),
                "name": format!("{} pick", kind)
            })]
        }

        async fn popular(&self, kind: EntityKind) -> Vec<Value> {
            vec![json!({
                "entity_id": format!("{}-popular", kind),
                "name": "Bestseller"
            })]
        }

        async fn entity_details(&self, _entity_id: &str, _kind: EntityKind) -> Option<Value> {
            None
        }

        fn has_api_key(&self) -> bool {
            self.has_key
        }
    }

    #[tokio::test]
    async fn test_no_signals_without_key_reports_missing_key() {
        let store = test_store().await;
        let taste = FakeTasteGraph::new(false);

        let response =
            build_recommendations(&store, &taste, &RecommendationRequest::default(), None)
                .await
                .unwrap();

        assert!(response.book_recs.is_empty());
        assert!(response.popular_books.is_empty());
        assert!(response.movie_recs.is_empty());
        assert!(response.tv_show_recs.is_empty());
        assert_eq!(response.message.as_deref(), Some(NO_API_KEY_MESSAGE));
    }

    #[tokio::test]
    async fn test_no_signals_with_key_reports_missing_preferences() {
        let store = test_store().await;
        let taste = FakeTasteGraph::new(true);

        let response =
            build_recommendations(&store, &taste, &RecommendationRequest::default(), None)
                .await
                .unwrap();

        assert_eq!(response.message.as_deref(), Some(NO_PREFERENCES_MESSAGE));
    }

    #[tokio::test]
    async fn test_unresolvable_names_count_as_no_signals() {
        let store = test_store().await;
        let taste = FakeTasteGraph::new(true);

        let request = RecommendationRequest {
            book_name: Some("Completely Unknown".to_string()),
            ..Default::default()
        };
        let response = build_recommendations(&store, &taste, &request, None)
            .await
            .unwrap();

        assert_eq!(response.message.as_deref(), Some(NO_PREFERENCES_MESSAGE));
    }

    #[tokio::test]
    async fn test_resolved_request_produces_all_four_lists() {
        let store = test_store().await;
        let taste = FakeTasteGraph::new(true).resolving("Dune", "dune-id");

        let request = RecommendationRequest {
            book_name: Some("Dune".to_string()),
            ..Default::default()
        };
        let response = build_recommendations(&store, &taste, &request, None)
            .await
            .unwrap();

        assert!(response.message.is_none());
        assert_eq!(response.book_recs.len(), 1);
        assert_eq!(response.popular_books.len(), 1);
        assert_eq!(response.movie_recs.len(), 1);
        assert_eq!(response.tv_show_recs.len(), 1);
        assert_eq!(response.book_recs[0].name, "book pick");
        assert_eq!(response.movie_recs[0].name, "movie pick");
        assert_eq!(response.tv_show_recs[0].name, "tv_show pick");
        assert_eq!(response.popular_books[0].name, "Bestseller");

        let seen = taste.seen_signals.lock().unwrap();
        assert!(seen.iter().all(|signals| signals == &vec!["dune-id".to_string()]));
    }

    #[tokio::test]
    async fn test_stored_preferences_fill_missing_request_fields() {
        let store = test_store().await;
        let account = store
            .insert_account("alice", "a@x.com", "hash")
            .await
            .unwrap();
        store
            .upsert_preferences(
                account.id,
                &crate::models::PreferenceUpdate {
                    book_name: Some("Dune".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let taste = FakeTasteGraph::new(true).resolving("Dune", "dune-id");
        let response = build_recommendations(
            &store,
            &taste,
            &RecommendationRequest::default(),
            Some(&account),
        )
        .await
        .unwrap();

        assert!(response.message.is_none());
        assert_eq!(response.book_recs.len(), 1);
    }

    #[tokio::test]
    async fn test_request_overrides_stored_preference() {
        let store = test_store().await;
        let account = store
            .insert_account("alice", "a@x.com", "hash")
            .await
            .unwrap();
        store
            .upsert_preferences(
                account.id,
                &crate::models::PreferenceUpdate {
                    book_name: Some("Stored Book".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        // Only the override resolves, so signals prove which name was used.
        let taste = FakeTasteGraph::new(true).resolving("Override Book", "override-id");
        let request = RecommendationRequest {
            book_name: Some("Override Book".to_string()),
            ..Default::default()
        };
        let response = build_recommendations(&store, &taste, &request, Some(&account))
            .await
            .unwrap();

        assert!(response.message.is_none());
        let seen = taste.seen_signals.lock().unwrap();
        assert!(seen.iter().all(|signals| signals == &vec!["override-id".to_string()]));
    }

    #[tokio::test]
    async fn test_blank_request_field_falls_back_to_stored_preference() {
        let store = test_store().await;
        let account = store
            .insert_account("alice", "a@x.com", "hash")
            .await
            .unwrap();
        store
            .upsert_preferences(
                account.id,
                &crate::models::PreferenceUpdate {
                    book_name: Some("Dune".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        // A cleared form field arrives as "", which must not mask the
        // stored value or be sent for resolution itself.
        let taste = FakeTasteGraph::new(true).resolving("Dune", "dune-id");
        let request = RecommendationRequest {
            book_name: Some("".to_string()),
            ..Default::default()
        };
        let response = build_recommendations(&store, &taste, &request, Some(&account))
            .await
            .unwrap();

        assert!(response.message.is_none());
        assert_eq!(response.book_recs.len(), 1);
        let seen = taste.seen_signals.lock().unwrap();
        assert!(seen.iter().all(|signals| signals == &vec!["dune-id".to_string()]));
    }

    #[tokio::test]
    async fn test_blank_demographics_are_dropped_from_queries() {
        let store = test_store().await;
        let taste = FakeTasteGraph::new(true).resolving("Dune", "dune-id");

        let request = RecommendationRequest {
            book_name: Some("Dune".to_string()),
            age: Some("".to_string()),
            gender: Some("".to_string()),
            ..Default::default()
        };
        build_recommendations(&store, &taste, &request, None)
            .await
            .unwrap();

        let seen = taste.seen_demographics.lock().unwrap();
        assert!(!seen.is_empty());
        assert!(seen.iter().all(|(age, gender)| age.is_none() && gender.is_none()));
    }

    #[tokio::test]
    async fn test_favorites_contribute_signals_alone() {
        let store = test_store().await;
        let account = store
            .insert_account("alice", "a@x.com", "hash")
            .await
            .unwrap();
        store
            .upsert_saved_item(
                account.id,
                &SaveItemRequest {
                    item_id: "fav-1".to_string(),
                    item_name: "Dune".to_string(),
                    item_type: EntityKind::Movie,
                    item_image: "".to_string(),
                    item_description: "".to_string(),
                    favorited: true,
                },
            )
            .await
            .unwrap();

        // No preference names anywhere; the favorited item is the only signal.
        let taste = FakeTasteGraph::new(true);
        let response = build_recommendations(
            &store,
            &taste,
            &RecommendationRequest::default(),
            Some(&account),
        )
        .await
        .unwrap();

        assert!(response.message.is_none());
        let seen = taste.seen_signals.lock().unwrap();
        assert!(seen.iter().all(|signals| signals == &vec!["fav-1".to_string()]));
    }
}
