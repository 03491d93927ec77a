//! Upstream Xtream-style provider client.
//!
//! Translates catalog and EPG requests into authenticated HTTP calls against
//! the provider's `player_api.php` endpoint. Every failure mode — missing
//! credentials, transport errors, non-200 status, undecodable JSON — degrades
//! to an empty value instead of an error. Callers cannot distinguish
//! "upstream returned nothing" from "request failed" and must treat empty as
//! "no data available for any reason."

use std::time::Duration;

use serde_json::{Value, json};
use tracing::error;

use crate::config::IptvConfig;

/// Timeout applied to every upstream request.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Media kind used for playback URL derivation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamKind {
    /// Live TV channel, served as HLS
    Live,
    /// Video-on-demand movie
    Movie,
    /// Series content (per-episode URLs are resolved elsewhere)
    Series,
}

impl StreamKind {
    /// Parses the wire name used by the upstream provider's URL scheme.
    /// Unrecognized names yield `None`; the derived URL for them is empty.
    pub fn parse(kind: &str) -> Option<Self> {
        match kind {
            "live" => Some(Self::Live),
            "movie" => Some(Self::Movie),
            "series" => Some(Self::Series),
            _ => None,
        }
    }

    fn path_segment(self) -> &'static str {
        match self {
            Self::Live => "live",
            Self::Movie => "movie",
            Self::Series => "series",
        }
    }

    fn extension(self) -> &'static str {
        match self {
            Self::Live => "m3u8",
            Self::Movie | Self::Series => "mkv",
        }
    }
}

/// Client for the upstream provider API.
///
/// Owns the provider credentials and one shared HTTP client that is reused
/// across all concurrent requests. Cloning is cheap; clones share the
/// underlying connection pool. No caching, no retries, no request
/// coalescing: identical concurrent requests each hit the upstream.
#[derive(Debug, Clone)]
pub struct XtreamClient {
    config: IptvConfig,
    http: reqwest::Client,
}

impl XtreamClient {
    /// Creates a client for the given provider configuration.
    pub fn new(config: IptvConfig) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
        }
    }

    /// Provider configuration this client was built with.
    pub fn config(&self) -> &IptvConfig {
        &self.config
    }

    /// True iff base URL, username, and password are all present.
    pub fn is_configured(&self) -> bool {
        self.config.is_configured()
    }

    /// Builds an authenticated `player_api.php` URL.
    ///
    /// Returns `None` when unconfigured. Caller-supplied parameters come
    /// first; `username`, `password`, and `action` are appended last and
    /// silently replace any caller-supplied values for those keys. Values
    /// are not percent-encoded — callers supply already-safe values
    /// (numeric IDs, enumerated action names).
    pub fn build_url(&self, action: &str, extra: &[(&str, String)]) -> Option<String> {
        if !self.is_configured() {
            return None;
        }

        let mut params: Vec<(&str, String)> = extra
            .iter()
            .filter(|(key, _)| !matches!(*key, "username" | "password" | "action"))
            .cloned()
            .collect();
        params.push(("username", self.config.username.clone()));
        params.push(("password", self.config.password.clone()));
        params.push(("action", action.to_string()));

        let query = params
            .iter()
            .map(|(key, value)| format!("{key}={value}"))
            .collect::<Vec<_>>()
            .join("&");

        Some(format!("{}/player_api.php?{query}", self.config.base_url))
    }

    /// Performs one GET against the upstream and parses the JSON body.
    ///
    /// `None` URLs (unconfigured) and every request failure collapse to an
    /// empty object. No retry, no distinction between failure modes beyond
    /// the server-side log line.
    pub async fn request(&self, url: Option<String>) -> Value {
        let Some(url) = url else {
            return json!({});
        };

        let response = match self.http.get(&url).timeout(REQUEST_TIMEOUT).send().await {
            Ok(response) => response,
            Err(e) => {
                error!("upstream request error: {e}");
                return json!({});
            }
        };

        if response.status() != reqwest::StatusCode::OK {
            error!("upstream request failed: {}", response.status());
            return json!({});
        }

        match response.json().await {
            Ok(value) => value,
            Err(e) => {
                error!("upstream response decode error: {e}");
                json!({})
            }
        }
    }

    /// Fetches live TV categories.
    pub async fn live_categories(&self) -> Value {
        if !self.is_configured() {
            return json!([]);
        }
        self.request(self.build_url("get_live_categories", &[])).await
    }

    /// Fetches live streams, optionally restricted to one category.
    pub async fn live_streams(&self, category_id: Option<u32>) -> Value {
        if !self.is_configured() {
            return json!([]);
        }
        let url = self.build_url("get_live_streams", &category_params(category_id));
        self.request(url).await
    }

    /// Fetches VOD categories.
    pub async fn vod_categories(&self) -> Value {
        if !self.is_configured() {
            return json!([]);
        }
        self.request(self.build_url("get_vod_categories", &[])).await
    }

    /// Fetches VOD streams, optionally restricted to one category.
    pub async fn vod_streams(&self, category_id: Option<u32>) -> Value {
        if !self.is_configured() {
            return json!([]);
        }
        let url = self.build_url("get_vod_streams", &category_params(category_id));
        self.request(url).await
    }

    /// Fetches series categories.
    pub async fn series_categories(&self) -> Value {
        if !self.is_configured() {
            return json!([]);
        }
        self.request(self.build_url("get_series_categories", &[])).await
    }

    /// Fetches series, optionally restricted to one category.
    pub async fn series(&self, category_id: Option<u32>) -> Value {
        if !self.is_configured() {
            return json!([]);
        }
        let url = self.build_url("get_series", &category_params(category_id));
        self.request(url).await
    }

    /// Fetches the short-form program guide for one stream.
    pub async fn short_epg(&self, stream_id: u32, limit: u32) -> Value {
        if !self.is_configured() {
            return json!([]);
        }
        let extra = [
            ("stream_id", stream_id.to_string()),
            ("limit", limit.to_string()),
        ];
        self.request(self.build_url("get_short_epg", &extra)).await
    }

    /// Derives a playable stream URL. Pure and offline; no network call.
    ///
    /// Returns an empty string when unconfigured. Live streams resolve to
    /// `.m3u8` playlists, movies and series to `.mkv` containers.
    pub fn stream_url(&self, stream_id: &str, kind: StreamKind) -> String {
        if !self.is_configured() {
            return String::new();
        }
        format!(
            "{}/{}/{}/{}/{stream_id}.{}",
            self.config.base_url,
            kind.path_segment(),
            self.config.username,
            self.config.password,
            kind.extension()
        )
    }
}

fn category_params(category_id: Option<u32>) -> Vec<(&'static str, String)> {
    match category_id {
        Some(id) => vec![("category_id", id.to_string())],
        None => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn configured_client() -> XtreamClient {
        XtreamClient::new(IptvConfig::new("http://x.test", "u", "p", "My IPTV"))
    }

    fn unconfigured_client() -> XtreamClient {
        XtreamClient::new(IptvConfig::default())
    }

    #[test]
    fn build_url_composes_auth_params_last() {
        let client = configured_client();
        let url = client
            .build_url("get_live_streams", &[("category_id", "7".to_string())])
            .unwrap();
        assert_eq!(
            url,
            "http://x.test/player_api.php?category_id=7&username=u&password=p&action=get_live_streams"
        );
    }

    #[test]
    fn build_url_overrides_reserved_caller_params() {
        let client = configured_client();
        let url = client
            .build_url("get_live_categories", &[("username", "evil".to_string())])
            .unwrap();
        assert!(!url.contains("evil"));
        assert!(url.contains("username=u"));
    }

    #[test]
    fn build_url_requires_configuration() {
        assert_eq!(unconfigured_client().build_url("get_live_categories", &[]), None);
    }

    #[test]
    fn stream_url_derivation() {
        let client = configured_client();
        assert_eq!(
            client.stream_url("42", StreamKind::Live),
            "http://x.test/live/u/p/42.m3u8"
        );
        assert_eq!(
            client.stream_url("42", StreamKind::Movie),
            "http://x.test/movie/u/p/42.mkv"
        );
        assert_eq!(
            client.stream_url("42", StreamKind::Series),
            "http://x.test/series/u/p/42.mkv"
        );
    }

    #[test]
    fn stream_url_empty_when_unconfigured() {
        assert_eq!(unconfigured_client().stream_url("42", StreamKind::Live), "");
    }

    #[test]
    fn stream_kind_parsing() {
        assert_eq!(StreamKind::parse("live"), Some(StreamKind::Live));
        assert_eq!(StreamKind::parse("movie"), Some(StreamKind::Movie));
        assert_eq!(StreamKind::parse("series"), Some(StreamKind::Series));
        assert_eq!(StreamKind::parse("radio"), None);
    }

    #[tokio::test]
    async fn request_without_url_returns_empty_object() {
        let client = unconfigured_client();
        assert_eq!(client.request(None).await, json!({}));
    }

    #[tokio::test]
    async fn fetchers_skip_network_when_unconfigured() {
        let client = unconfigured_client();
        assert_eq!(client.live_categories().await, json!([]));
        assert_eq!(client.live_streams(None).await, json!([]));
        assert_eq!(client.vod_categories().await, json!([]));
        assert_eq!(client.vod_streams(Some(3)).await, json!([]));
        assert_eq!(client.series_categories().await, json!([]));
        assert_eq!(client.series(None).await, json!([]));
        assert_eq!(client.short_epg(1, 10).await, json!([]));
    }
}
