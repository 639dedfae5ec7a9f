//! HTTP layer: router, error mapping, extractors, routes

pub mod error;
pub mod extractors;
pub mod routes;
pub mod server;
pub mod upload;

pub use error::ApiError;
pub use server::{run_server, AppState, ServerError};
