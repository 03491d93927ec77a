//! Cross-catalog substring search.
//!
//! Fetches the full unfiltered collection for each selected catalog and
//! filters locally; the upstream has no search endpoint of its own.

use axum::extract::{Query, State};
use axum::response::Json;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::handlers::api::ApiError;
use crate::server::AppState;

/// Maximum results returned per catalog.
const RESULT_LIMIT: usize = 20;

/// Free-text search parameters.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    /// Substring matched case-insensitively against item names
    pub q: String,
    /// Catalog selector: `all`, `live`, `vod`, or `series`
    #[serde(default = "default_scope", rename = "type")]
    pub scope: String,
}

fn default_scope() -> String {
    "all".to_string()
}

/// Searches live, VOD, and series catalogs by name.
///
/// Each selected catalog is fetched in full (no category restriction),
/// filtered, and truncated to [`RESULT_LIMIT`] items independently,
/// preserving upstream order. Unselected catalogs stay empty.
pub async fn search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Value>, ApiError> {
    let mut live = Vec::new();
    let mut vod = Vec::new();
    let mut series = Vec::new();

    if matches!(query.scope.as_str(), "all" | "live") {
        live = filter_by_name(state.client.live_streams(None).await, &query.q);
    }
    if matches!(query.scope.as_str(), "all" | "vod") {
        vod = filter_by_name(state.client.vod_streams(None).await, &query.q);
    }
    if matches!(query.scope.as_str(), "all" | "series") {
        series = filter_by_name(state.client.series(None).await, &query.q);
    }

    Ok(Json(json!({ "live": live, "vod": vod, "series": series })))
}

/// Case-insensitive substring match on each item's `name` field.
///
/// Items without a name match only the empty query. Non-array values (the
/// client's failure placeholder) yield no results.
fn filter_by_name(items: Value, query: &str) -> Vec<Value> {
    let needle = query.to_lowercase();
    match items {
        Value::Array(list) => list
            .into_iter()
            .filter(|item| {
                item.get("name")
                    .and_then(Value::as_str)
                    .unwrap_or("")
                    .to_lowercase()
                    .contains(&needle)
            })
            .take(RESULT_LIMIT)
            .collect(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_case_insensitive_substrings() {
        let items = json!([
            { "name": "Evening News" },
            { "name": "Sports" },
        ]);
        let results = filter_by_name(items, "NEWS");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0]["name"], "Evening News");
    }

    #[test]
    fn missing_names_match_only_the_empty_query() {
        let items = json!([{ "id": 1 }, { "name": "News" }]);
        assert_eq!(filter_by_name(items.clone(), "news").len(), 1);
        assert_eq!(filter_by_name(items, "").len(), 2);
    }

    #[test]
    fn truncates_to_twenty_preserving_order() {
        let items: Vec<Value> = (0..1000)
            .map(|i| json!({ "name": format!("News {i}"), "position": i }))
            .collect();
        let results = filter_by_name(Value::Array(items), "news");

        assert_eq!(results.len(), RESULT_LIMIT);
        for (i, item) in results.iter().enumerate() {
            assert_eq!(item["position"], i);
        }
    }

    #[test]
    fn failure_placeholder_yields_no_results() {
        assert!(filter_by_name(json!({}), "news").is_empty());
    }
}
