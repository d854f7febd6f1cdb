//! Spotify Insights - log in with Spotify and browse your top tracks
//!
//! The library holds the page controller (token resolution, login redirect,
//! track fetch), its HTML rendering, and a small HTTP server that hands the
//! page to a browser.

/// Page controller and navigation state
pub mod app;
/// Client modules for the backend proxy and local storage
pub mod clients;
/// Endpoint, storage and server settings
pub mod config;
/// HTML rendering of the page
pub mod render;
/// Local HTTP server
pub mod server;
