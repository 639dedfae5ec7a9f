//! inkstone-server: HTTP API for the inkstone blogging platform
//!
//! Public article feeds (all posts, hero carousel, favorites), bearer-token
//! protected admin CRUD for posts and categories, dashboard stats, and
//! static serving of locally stored uploads.

pub mod auth;
pub mod config;
pub mod db;
pub mod http;

pub use config::AppConfig;
pub use http::server::{run_server, AppState, ServerError};
