// HTTP request handlers
// Author: kelexine (https://github.com/kelexine)

use super::routes::AppState;
use crate::error::ProxyError;
use crate::relay::{ImagePrompt, ImageReply};
use axum::{
    extract::{rejection::BytesRejection, State},
    http::header,
    response::IntoResponse,
    Json,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, info, warn};

const GENERATE_IMAGE_ENDPOINT: &str = "/generate-image";

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

/// Liveness check for the hosting platform.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "alive".to_string(),
    })
}

/// Handler for `POST /generate-image`
///
/// The body is taken raw so that an oversized body or a missing or mistyped
/// `prompt` is reported through [`ProxyError`] like every other failure.
pub async fn generate_image_handler(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<ImageReply>, ProxyError> {
    let start = Instant::now();

    let result = async {
        let body = body.map_err(|e| ProxyError::InvalidRequest(e.body_text()))?;
        let prompt = ImagePrompt::from_body(&body)?;
        info!(
            "Received image request: prompt_chars={}",
            prompt.as_str().chars().count()
        );
        state.relay.generate_image(prompt).await
    }
    .await;

    let elapsed = start.elapsed();
    match result {
        Ok(reply) => {
            debug!("Image request completed in {:?}", elapsed);
            crate::metrics::record_request(
                GENERATE_IMAGE_ENDPOINT,
                reply.outcome(),
                elapsed.as_secs_f64(),
            );
            Ok(Json(reply))
        }
        Err(e) => {
            warn!("Image request failed after {:?}: {}", elapsed, e.kind());
            crate::metrics::record_request(GENERATE_IMAGE_ENDPOINT, e.kind(), elapsed.as_secs_f64());
            Err(e)
        }
    }
}

/// Prometheus text exposition
pub async fn metrics_handler() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4; charset=utf-8")],
        crate::metrics::gather_metrics(),
    )
}
