//! End-to-end API tests against a simulated Xtream upstream.

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode};
use serde_json::{Value, json};
use shoal_core::IptvConfig;
use shoal_web::{AppState, router};
use tower::util::ServiceExt;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn app_for(server: &MockServer) -> Router {
    router(AppState::new(IptvConfig::new(
        server.uri(),
        "u",
        "p",
        "My IPTV",
    )))
}

fn unconfigured_app() -> Router {
    router(AppState::new(IptvConfig::default()))
}

async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

/// Mounts a mock for one `player_api.php` action, requiring the proxy's
/// credentials on the wire.
async fn mount_action(server: &MockServer, action: &str, body: Value) {
    Mock::given(method("GET"))
        .and(path("/player_api.php"))
        .and(query_param("username", "u"))
        .and(query_param("password", "p"))
        .and(query_param("action", action))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn live_streams_gain_playback_urls() {
    let server = MockServer::start().await;
    mount_action(
        &server,
        "get_live_streams",
        json!([
            { "stream_id": 42, "name": "Evening News" },
            { "name": "No identifier" },
        ]),
    )
    .await;

    let (status, body) = get_json(app_for(&server), "/api/streams/live").await;
    assert_eq!(status, StatusCode::OK);

    let streams = body["streams"].as_array().unwrap();
    assert_eq!(
        streams[0]["stream_url"],
        format!("{}/live/u/p/42.m3u8", server.uri())
    );
    assert!(streams[1].get("stream_url").is_none());
}

#[tokio::test]
async fn vod_streams_use_movie_urls() {
    let server = MockServer::start().await;
    mount_action(
        &server,
        "get_vod_streams",
        json!([{ "stream_id": 7, "name": "Some Film" }]),
    )
    .await;

    let (_, body) = get_json(app_for(&server), "/api/streams/vod").await;
    assert_eq!(
        body["streams"][0]["stream_url"],
        format!("{}/movie/u/p/7.mkv", server.uri())
    );
}

#[tokio::test]
async fn series_streams_carry_no_playback_urls() {
    let server = MockServer::start().await;
    mount_action(
        &server,
        "get_series",
        json!([{ "series_id": 3, "stream_id": 3, "name": "A Show" }]),
    )
    .await;

    let (status, body) = get_json(app_for(&server), "/api/streams/series").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["streams"][0].get("stream_url").is_none());
}

#[tokio::test]
async fn category_filter_reaches_the_upstream() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/player_api.php"))
        .and(query_param("action", "get_live_streams"))
        .and(query_param("category_id", "7"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([{ "stream_id": 1, "name": "One" }])),
        )
        .mount(&server)
        .await;

    let (status, body) = get_json(app_for(&server), "/api/streams/live?category_id=7").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["streams"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn epg_forwards_stream_id_and_limit() {
    let server = MockServer::start().await;
    let listings = json!({ "epg_listings": [{ "title": "Morning Show" }] });
    Mock::given(method("GET"))
        .and(path("/player_api.php"))
        .and(query_param("action", "get_short_epg"))
        .and(query_param("stream_id", "42"))
        .and(query_param("limit", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(listings.clone()))
        .mount(&server)
        .await;

    let (status, body) = get_json(app_for(&server), "/api/epg/42?limit=5").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["epg"], listings);
}

#[tokio::test]
async fn epg_limit_defaults_to_ten() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/player_api.php"))
        .and(query_param("action", "get_short_epg"))
        .and(query_param("limit", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "epg_listings": [] })))
        .mount(&server)
        .await;

    let (status, body) = get_json(app_for(&server), "/api/epg/42").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["epg"], json!({ "epg_listings": [] }));
}

#[tokio::test]
async fn search_matches_names_and_truncates() {
    let server = MockServer::start().await;
    mount_action(
        &server,
        "get_live_streams",
        json!([
            { "name": "Evening News" },
            { "name": "Sports" },
        ]),
    )
    .await;
    let many: Vec<Value> = (0..1000)
        .map(|i| json!({ "name": format!("News at {i}"), "position": i }))
        .collect();
    mount_action(&server, "get_vod_streams", Value::Array(many)).await;
    mount_action(&server, "get_series", json!([{ "name": "Newsroom" }])).await;

    let (status, body) = get_json(app_for(&server), "/api/search?q=NEWS").await;
    assert_eq!(status, StatusCode::OK);

    let live = body["live"].as_array().unwrap();
    assert_eq!(live.len(), 1);
    assert_eq!(live[0]["name"], "Evening News");

    let vod = body["vod"].as_array().unwrap();
    assert_eq!(vod.len(), 20);
    for (i, item) in vod.iter().enumerate() {
        assert_eq!(item["position"], i);
    }

    assert_eq!(body["series"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn search_type_restricts_catalogs() {
    let server = MockServer::start().await;
    mount_action(
        &server,
        "get_live_streams",
        json!([{ "name": "Evening News" }]),
    )
    .await;

    let (status, body) = get_json(app_for(&server), "/api/search?q=news&type=live").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["live"].as_array().unwrap().len(), 1);
    assert_eq!(body["vod"], json!([]));
    assert_eq!(body["series"], json!([]));
}

#[tokio::test]
async fn upstream_server_error_degrades_to_empty() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/player_api.php"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let (status, body) = get_json(app_for(&server), "/api/categories/live").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["categories"], json!({}));

    let (status, body) = get_json(app_for(&server), "/api/streams/live").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["streams"], json!({}));
}

#[tokio::test]
async fn upstream_connection_failure_degrades_to_empty() {
    // Nothing listens on the discard port; the connection is refused.
    let app = router(AppState::new(IptvConfig::new(
        "http://127.0.0.1:9",
        "u",
        "p",
        "My IPTV",
    )));

    let (status, body) = get_json(app, "/api/categories/vod").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["categories"], json!({}));
}

#[tokio::test]
async fn connection_test_counts_categories() {
    let server = MockServer::start().await;
    mount_action(
        &server,
        "get_live_categories",
        json!([
            { "category_id": "1", "category_name": "News" },
            { "category_id": "2", "category_name": "Sports" },
            { "category_id": "3", "category_name": "Movies" },
        ]),
    )
    .await;

    let (status, body) = get_json(app_for(&server), "/api/xtream/test").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    assert_eq!(body["message"], "Connection successful");
    assert_eq!(body["categories_count"], 3);
}

#[tokio::test]
async fn connection_test_reports_empty_upstream() {
    let server = MockServer::start().await;
    mount_action(&server, "get_live_categories", json!([])).await;

    let (_, body) = get_json(app_for(&server), "/api/xtream/test").await;
    assert_eq!(body["status"], "error");
    assert_eq!(body["message"], "No data received");
}

#[tokio::test]
async fn unconfigured_proxy_serves_empty_data_everywhere() {
    for uri in [
        "/api/categories/live",
        "/api/categories/vod",
        "/api/categories/series",
    ] {
        let (status, body) = get_json(unconfigured_app(), uri).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["categories"], json!([]));
    }

    let (status, body) = get_json(unconfigured_app(), "/api/search?q=news").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "live": [], "vod": [], "series": [] }));

    let (status, body) = get_json(unconfigured_app(), "/api/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["iptv_configured"], false);
}
