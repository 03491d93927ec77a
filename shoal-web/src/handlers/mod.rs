//! HTTP request handlers organized by functionality

pub mod api;
pub mod search;

// Re-export handler functions
pub use api::{
    ApiError, CategoryQuery, EpgQuery, health, live_categories, live_streams, playlist_info,
    series_categories, series_streams, short_epg, test_connection, vod_categories, vod_streams,
};
pub use search::{SearchQuery, search};
