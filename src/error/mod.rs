// Error types for imagen-relay
// Author: kelexine (https://github.com/kelexine)

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProxyError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Authentication failed")]
    Authentication,

    /// Upstream returned a non-success status; holds the raw response body.
    #[error("{0}")]
    Upstream(String),

    #[error("Upstream request timed out after {}s", .0.as_secs())]
    UpstreamTimeout(Duration),

    #[error("Credentials error: {0}")]
    Credentials(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config parsing error: {0}")]
    ConfigParsing(#[from] config::ConfigError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ProxyError {
    /// Short label used for metrics and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            ProxyError::InvalidRequest(_) => "validation_error",
            ProxyError::Authentication | ProxyError::Credentials(_) => "authentication_error",
            ProxyError::Upstream(_) => "upstream_error",
            ProxyError::UpstreamTimeout(_) => "upstream_timeout",
            _ => "internal_error",
        }
    }

    /// Text placed in the `detail` field of the error body.
    ///
    /// Upstream failures pass the provider's body through untouched.
    pub fn detail(&self) -> String {
        match self {
            ProxyError::InvalidRequest(msg) | ProxyError::Internal(msg) => msg.clone(),
            ProxyError::Upstream(body) => body.clone(),
            other => other.to_string(),
        }
    }
}

// Every failure surfaces as a 500 carrying a `detail` string
impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let body = json!({ "detail": self.detail() });
        (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, ProxyError>;
