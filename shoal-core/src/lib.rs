//! Shoal Core - Xtream upstream client and configuration

#![warn(missing_docs)]
#![warn(clippy::missing_errors_doc)]
#![deny(clippy::missing_panics_doc)]
//!
//! Holds the upstream client adapter that authenticates against an
//! Xtream-style IPTV provider, fetches catalog and EPG data, and derives
//! playable stream URLs. Upstream failures never surface as errors; they
//! collapse to empty values that callers treat uniformly as "no data."

pub mod config;
pub mod errors;
pub mod xtream;

// Re-export main types
pub use config::IptvConfig;
pub use errors::IptvError;
pub use xtream::{StreamKind, XtreamClient};

/// Convenience type alias for Results with IptvError.
pub type Result<T> = std::result::Result<T, IptvError>;
