// HTTP routes configuration
// Author: kelexine (https://github.com/kelexine)

use super::handlers::{generate_image_handler, health_handler, metrics_handler};
use super::middleware::request_id_layers;
use crate::config::ServerConfig;
use crate::relay::ImageRelay;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Shared, read-only state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub relay: Arc<ImageRelay>,
}

pub fn create_router(config: &ServerConfig, relay: ImageRelay) -> Router {
    let state = AppState {
        relay: Arc::new(relay),
    };

    let (set_request_id, propagate_request_id) = request_id_layers();

    Router::new()
        .route("/", get(health_handler))
        .route("/generate-image", post(generate_image_handler))
        .route("/metrics", get(metrics_handler))
        .layer(DefaultBodyLimit::max(config.max_body_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(propagate_request_id)
        .layer(set_request_id)
        .with_state(state)
}
