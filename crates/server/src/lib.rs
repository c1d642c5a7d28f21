//! Capacity planner HTTP service
//!
//! Exposes the planning engine and scenario storage over a JSON API.

pub mod api;
pub mod config;
pub mod error;

pub use api::{create_router, serve, AppState};
pub use config::ServerConfig;
pub use error::ApiError;
