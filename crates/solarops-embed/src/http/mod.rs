//! HTTP surface for embed links and sessions.

mod error;
mod routes;

pub use error::ApiError;
pub use routes::{AppState, build_router, cors_layer};
