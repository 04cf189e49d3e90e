// Shared fixtures for integration tests
// Author: kelexine (https://github.com/kelexine)

#![allow(dead_code)]

use async_trait::async_trait;
use imagen_relay::config::VertexConfig;
use imagen_relay::error::{ProxyError, Result};
use imagen_relay::oauth::{AccessToken, TokenProvider};
use imagen_relay::relay::ImageRelay;
use imagen_relay::vertex::VertexClient;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

pub const TEST_TOKEN: &str = "ya29.test-token";

pub const PREDICT_PATH: &str =
    "/v1/projects/test-project/locations/us-central1/publishers/google/models/imagen-4.0-generate-001:predict";

/// Hands out a fixed token and counts how often it was asked.
#[derive(Default)]
pub struct StaticTokens {
    calls: AtomicUsize,
}

impl StaticTokens {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TokenProvider for StaticTokens {
    async fn acquire_token(&self) -> Result<AccessToken> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(AccessToken::new(TEST_TOKEN, Some(3600)))
    }
}

/// Always fails, the way unresolvable credentials do.
pub struct FailingTokens;

#[async_trait]
impl TokenProvider for FailingTokens {
    async fn acquire_token(&self) -> Result<AccessToken> {
        Err(ProxyError::Credentials(
            "Could not automatically determine credentials".to_string(),
        ))
    }
}

pub fn vertex_config(endpoint: &str, timeout_seconds: u64) -> VertexConfig {
    VertexConfig {
        project_id: "test-project".to_string(),
        api_endpoint: Some(endpoint.to_string()),
        timeout_seconds,
        ..VertexConfig::default()
    }
}

pub fn relay_with(tokens: Arc<dyn TokenProvider>, endpoint: &str) -> ImageRelay {
    let client = VertexClient::new(&vertex_config(endpoint, 5)).unwrap();
    ImageRelay::new(tokens, client)
}
