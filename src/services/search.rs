use serde_json::Value;

use crate::models::{EntityKind, ExternalEntity};
use crate::services::normalize::normalize;
use crate::services::taste::TasteGraph;

/// Cap on fallback search results returned to the client
const SEARCH_RESULT_LIMIT: usize = 5;

/// Entity search: resolve the query to an id and return its full-detail
/// record, falling back to raw search hits when resolution fails.
///
/// Hits whose detail lookup fails are kept in their lightweight search
/// form rather than dropped. Always returns a well-formed (possibly
/// empty) list.
pub async fn search_entities(
    taste: &dyn TasteGraph,
    query: &str,
    kind: EntityKind,
) -> Vec<ExternalEntity> {
    if let Some(entity_id) = taste.resolve(query, kind).await {
        if let Some(details) = taste.entity_details(&entity_id, kind).await {
            return vec![normalize(&details, kind, query)];
        }
        tracing::debug!(entity_id = %entity_id, "Detail lookup failed; trying raw search");
    }

    let hits = taste.search(query, kind).await;
    let mut results = Vec::with_capacity(SEARCH_RESULT_LIMIT.min(hits.len()));
    for hit in hits.into_iter().take(SEARCH_RESULT_LIMIT) {
        let entity_id = hit
            .get("entity_id")
            .and_then(Value::as_str)
            .map(str::to_string);
        let detailed = match entity_id {
            Some(entity_id) => taste
                .entity_details(&entity_id, kind)
                .await
                .unwrap_or(hit),
            None => hit,
        };
        results.push(normalize(&detailed, kind, query));
    }

    results
}
