//! Shoal Web - JSON API server

#![warn(missing_docs)]
#![warn(clippy::missing_errors_doc)]
#![deny(clippy::missing_panics_doc)]
//!
//! Pure JSON API server exposing a simplified REST surface over an
//! Xtream-style IPTV provider: categories, streams, EPG, search, and
//! playlist status for frontend applications and external clients.

pub mod handlers;
pub mod server;

// Re-export main types
pub use server::{AppState, router, run_server};
