//! Axum server wiring for the IPTV proxy.
//!
//! All routes are GET and return JSON. The upstream client is constructed
//! once at startup and injected into every handler through [`AppState`];
//! it is dropped, closing its connection pool, when the server task
//! returns after graceful shutdown.

use axum::Router;
use axum::routing::get;
use shoal_core::{IptvConfig, IptvError, XtreamClient};
use tower_http::cors::CorsLayer;
use tracing::{error, info};

use crate::handlers::{
    health, live_categories, live_streams, playlist_info, search, series_categories,
    series_streams, short_epg, test_connection, vod_categories, vod_streams,
};

/// Shared state injected into every handler.
#[derive(Clone)]
pub struct AppState {
    /// The upstream provider client, shared across all inbound requests
    pub client: XtreamClient,
}

impl AppState {
    /// Builds state around a freshly constructed upstream client.
    pub fn new(config: IptvConfig) -> Self {
        Self {
            client: XtreamClient::new(config),
        }
    }
}

/// Builds the API router with all routes and CORS middleware.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/xtream/test", get(test_connection))
        .route("/api/categories/live", get(live_categories))
        .route("/api/categories/vod", get(vod_categories))
        .route("/api/categories/series", get(series_categories))
        .route("/api/streams/live", get(live_streams))
        .route("/api/streams/vod", get(vod_streams))
        .route("/api/streams/series", get(series_streams))
        .route("/api/epg/{stream_id}", get(short_epg))
        .route("/api/search", get(search))
        .route("/api/playlist-info", get(playlist_info))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Runs the API server until ctrl-c.
///
/// # Errors
///
/// - `IptvError::Io` - Failed to bind the listen address or serve requests
pub async fn run_server(config: IptvConfig, host: &str, port: u16) -> Result<(), IptvError> {
    let app = router(AppState::new(config));

    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("IPTV proxy listening on http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("IPTV proxy shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("failed to install shutdown handler: {e}");
    }
}
