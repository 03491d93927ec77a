//! API handlers for catalog, EPG, and status endpoints
//!
//! Each handler calls the upstream client once, reshapes the result into a
//! JSON envelope, and returns HTTP 200. The client itself never fails — it
//! substitutes empty values — so a 500 here means a genuine internal bug,
//! reported as `{"detail": message}`.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::Deserialize;
use serde_json::{Value, json};
use shoal_core::{StreamKind, XtreamClient};
use tracing::error;

use crate::server::AppState;

/// Internal failure surfaced as HTTP 500 with a detail message.
///
/// This is the catch-all tier of the error policy: upstream failures are
/// absorbed by the client and never reach it.
#[derive(Debug)]
pub struct ApiError(pub String);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        error!("handler error: {}", self.0);
        (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "detail": self.0 }))).into_response()
    }
}

/// Optional category restriction for stream listings.
#[derive(Debug, Deserialize)]
pub struct CategoryQuery {
    /// Upstream category identifier
    pub category_id: Option<u32>,
}

/// Optional entry limit for EPG lookups.
#[derive(Debug, Deserialize)]
pub struct EpgQuery {
    /// Maximum number of guide entries, defaults to 10
    pub limit: Option<u32>,
}

/// Liveness probe. Always HTTP 200, reports the configuration state.
pub async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": "IPTV Player API",
        "iptv_configured": state.client.is_configured(),
    }))
}

/// Tests upstream connectivity with one live-categories fetch.
pub async fn test_connection(State(state): State<AppState>) -> Json<Value> {
    if !state.client.is_configured() {
        return Json(json!({
            "status": "error",
            "message": "IPTV credentials not configured",
        }));
    }

    let categories = state.client.live_categories().await;
    match categories.as_array() {
        Some(list) if !list.is_empty() => Json(json!({
            "status": "success",
            "message": "Connection successful",
            "categories_count": list.len(),
        })),
        _ => Json(json!({ "status": "error", "message": "No data received" })),
    }
}

/// Lists live TV categories.
pub async fn live_categories(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let categories = state.client.live_categories().await;
    Ok(Json(json!({ "categories": categories })))
}

/// Lists VOD categories.
pub async fn vod_categories(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let categories = state.client.vod_categories().await;
    Ok(Json(json!({ "categories": categories })))
}

/// Lists series categories.
pub async fn series_categories(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let categories = state.client.series_categories().await;
    Ok(Json(json!({ "categories": categories })))
}

/// Lists live streams with derived playback URLs.
pub async fn live_streams(
    State(state): State<AppState>,
    Query(query): Query<CategoryQuery>,
) -> Result<Json<Value>, ApiError> {
    let streams = state.client.live_streams(query.category_id).await;
    let streams = with_stream_urls(streams, &state.client, StreamKind::Live);
    Ok(Json(json!({ "streams": streams })))
}

/// Lists VOD streams with derived playback URLs.
pub async fn vod_streams(
    State(state): State<AppState>,
    Query(query): Query<CategoryQuery>,
) -> Result<Json<Value>, ApiError> {
    let streams = state.client.vod_streams(query.category_id).await;
    let streams = with_stream_urls(streams, &state.client, StreamKind::Movie);
    Ok(Json(json!({ "streams": streams })))
}

/// Lists series. No playback URL: series need per-episode resolution.
pub async fn series_streams(
    State(state): State<AppState>,
    Query(query): Query<CategoryQuery>,
) -> Result<Json<Value>, ApiError> {
    let streams = state.client.series(query.category_id).await;
    Ok(Json(json!({ "streams": streams })))
}

/// Short-form program guide for one stream.
pub async fn short_epg(
    State(state): State<AppState>,
    Path(stream_id): Path<u32>,
    Query(query): Query<EpgQuery>,
) -> Result<Json<Value>, ApiError> {
    let epg = state.client.short_epg(stream_id, query.limit.unwrap_or(10)).await;
    Ok(Json(json!({ "epg": epg })))
}

/// Static configuration echo. No network call.
pub async fn playlist_info(State(state): State<AppState>) -> Json<Value> {
    let configured = state.client.is_configured();
    let config = state.client.config();
    Json(json!({
        "name": config.playlist_name,
        "server": config.base_url,
        "status": if configured { "active" } else { "not_configured" },
        "configured": configured,
    }))
}

/// Injects a `stream_url` field into every object carrying a `stream_id`.
///
/// Items without `stream_id` pass through unmodified, as do non-array
/// values (the client's failure placeholder).
fn with_stream_urls(mut streams: Value, client: &XtreamClient, kind: StreamKind) -> Value {
    if let Some(items) = streams.as_array_mut() {
        for item in items {
            let Some(id) = stream_id_text(item) else {
                continue;
            };
            if let Some(object) = item.as_object_mut() {
                object.insert(
                    "stream_url".to_string(),
                    Value::String(client.stream_url(&id, kind)),
                );
            }
        }
    }
    streams
}

/// Renders a `stream_id` value the way it appears in the playback path.
/// Upstream providers send both numeric and string identifiers.
fn stream_id_text(item: &Value) -> Option<String> {
    match item.get("stream_id")? {
        Value::String(id) => Some(id.clone()),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use axum::body::{Body, to_bytes};
    use axum::http::Request;
    use shoal_core::IptvConfig;
    use tower::util::ServiceExt;

    use super::*;
    use crate::server::router;

    fn unconfigured_router() -> axum::Router {
        router(AppState::new(IptvConfig::default()))
    }

    async fn get_json(app: axum::Router, uri: &str) -> (StatusCode, Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn health_is_200_even_when_unconfigured() {
        let (status, body) = get_json(unconfigured_router(), "/api/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["service"], "IPTV Player API");
        assert_eq!(body["iptv_configured"], false);
    }

    #[tokio::test]
    async fn test_endpoint_reports_missing_credentials() {
        let (status, body) = get_json(unconfigured_router(), "/api/xtream/test").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "error");
        assert_eq!(body["message"], "IPTV credentials not configured");
    }

    #[tokio::test]
    async fn unconfigured_catalog_routes_return_empty() {
        for uri in [
            "/api/categories/live",
            "/api/categories/vod",
            "/api/categories/series",
        ] {
            let (status, body) = get_json(unconfigured_router(), uri).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(body["categories"], json!([]));
        }
        for uri in ["/api/streams/live", "/api/streams/vod", "/api/streams/series"] {
            let (status, body) = get_json(unconfigured_router(), uri).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(body["streams"], json!([]));
        }
        let (status, body) = get_json(unconfigured_router(), "/api/epg/42").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["epg"], json!([]));
    }

    #[tokio::test]
    async fn playlist_info_echoes_configuration() {
        let app = router(AppState::new(IptvConfig::new(
            "http://x.test",
            "u",
            "p",
            "Family TV",
        )));
        let (status, body) = get_json(app, "/api/playlist-info").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["name"], "Family TV");
        assert_eq!(body["server"], "http://x.test");
        assert_eq!(body["status"], "active");
        assert_eq!(body["configured"], true);

        let (_, body) = get_json(unconfigured_router(), "/api/playlist-info").await;
        assert_eq!(body["status"], "not_configured");
        assert_eq!(body["configured"], false);
    }

    #[tokio::test]
    async fn api_error_maps_to_500_with_detail() {
        let response = ApiError("boom".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body, json!({ "detail": "boom" }));
    }

    #[test]
    fn stream_url_injection_targets_items_with_ids() {
        let client = XtreamClient::new(IptvConfig::new("http://x.test", "u", "p", "My IPTV"));
        let streams = json!([
            { "stream_id": 42, "name": "News" },
            { "stream_id": "77", "name": "Sports" },
            { "name": "No id here" },
        ]);

        let result = with_stream_urls(streams, &client, StreamKind::Live);
        assert_eq!(result[0]["stream_url"], "http://x.test/live/u/p/42.m3u8");
        assert_eq!(result[1]["stream_url"], "http://x.test/live/u/p/77.m3u8");
        assert!(result[2].get("stream_url").is_none());
    }

    #[test]
    fn stream_url_injection_passes_non_arrays_through() {
        let client = XtreamClient::new(IptvConfig::new("http://x.test", "u", "p", "My IPTV"));
        let failed = with_stream_urls(json!({}), &client, StreamKind::Movie);
        assert_eq!(failed, json!({}));
    }
}
