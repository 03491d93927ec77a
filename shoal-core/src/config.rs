//! Runtime configuration for Shoal.
//!
//! Provider credentials come from the environment. Missing values are not an
//! error: the proxy runs in a degraded mode where every catalog request
//! returns empty data and the health/playlist endpoints report the state.

/// Upstream provider credentials and display settings.
///
/// Immutable after construction. "Configured" means all three credential
/// fields are non-empty; every live upstream call is gated on that.
#[derive(Debug, Clone, Default)]
pub struct IptvConfig {
    /// Xtream server base URL, stored without a trailing slash
    pub base_url: String,
    /// Provider account username
    pub username: String,
    /// Provider account password
    pub password: String,
    /// Display name reported by the playlist-info endpoint
    pub playlist_name: String,
}

impl IptvConfig {
    /// Creates a config from explicit values, normalizing the base URL.
    pub fn new(
        base_url: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
        playlist_name: impl Into<String>,
    ) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            username: username.into(),
            password: password.into(),
            playlist_name: playlist_name.into(),
        }
    }

    /// Reads configuration from the environment.
    ///
    /// Recognized variables: `XTREAM_URL`, `XTREAM_USERNAME`,
    /// `XTREAM_PASSWORD`, `PLAYLIST_NAME`. Absent credentials yield empty
    /// strings rather than an error.
    pub fn from_env() -> Self {
        let playlist_name =
            std::env::var("PLAYLIST_NAME").unwrap_or_else(|_| "My IPTV".to_string());
        Self::new(
            std::env::var("XTREAM_URL").unwrap_or_default(),
            std::env::var("XTREAM_USERNAME").unwrap_or_default(),
            std::env::var("XTREAM_PASSWORD").unwrap_or_default(),
            playlist_name,
        )
    }

    /// True iff base URL, username, and password are all non-empty.
    pub fn is_configured(&self) -> bool {
        !self.base_url.is_empty() && !self.username.is_empty() && !self.password.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slashes_are_stripped() {
        let config = IptvConfig::new("http://x.test///", "u", "p", "My IPTV");
        assert_eq!(config.base_url, "http://x.test");
    }

    #[test]
    fn configured_requires_all_credentials() {
        let config = IptvConfig::new("http://x.test", "u", "p", "My IPTV");
        assert!(config.is_configured());

        for (url, user, pass) in [
            ("", "u", "p"),
            ("http://x.test", "", "p"),
            ("http://x.test", "u", ""),
        ] {
            let config = IptvConfig::new(url, user, pass, "My IPTV");
            assert!(!config.is_configured());
        }
    }

    #[test]
    fn default_is_unconfigured() {
        assert!(!IptvConfig::default().is_configured());
    }
}
