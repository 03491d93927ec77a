//! Integration tests for Shoal
//!
//! Drives the real router in-process against a simulated upstream provider
//! and verifies the proxy's end-to-end contract: envelope shapes, playback
//! URL derivation, search semantics, and failure degradation.

#[path = "integration/api.rs"]
mod api;
