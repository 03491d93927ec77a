//! Error types for the IPTV proxy.

use thiserror::Error;

/// Errors surfaced outside the upstream client's fail-safe path.
///
/// The upstream client itself never returns these: transport, status, and
/// decode failures all collapse to empty values (see
/// [`crate::xtream::XtreamClient::request`]). What remains is server
/// lifecycle failure.
#[derive(Debug, Error)]
pub enum IptvError {
    /// Listener bind or serve failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
