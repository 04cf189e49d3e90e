//! Axum-based HTTP server for the image relay.
//!
//! # Components
//!
//! - `handlers`: Health check, `/generate-image`, and `/metrics`.
//! - `middleware`: Request ID tracking.
//! - `routes`: The router that ties handlers, layers, and state together.
//!
//! Author: kelexine (<https://github.com/kelexine>)

mod handlers;
mod middleware;
mod routes;

pub use handlers::HealthResponse;
pub use routes::{create_router, AppState};
