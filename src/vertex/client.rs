// Vertex AI prediction client
// Author: kelexine (https://github.com/kelexine)

use super::{PredictRequest, PredictResponse};
use crate::config::VertexConfig;
use crate::error::{ProxyError, Result};
use crate::oauth::AccessToken;
use reqwest::{Client, StatusCode};
use std::time::{Duration, Instant};
use tracing::{debug, error};

/// Client for the Imagen `:predict` endpoint of one fixed deployment.
///
/// The target URL is computed once from [`VertexConfig`]; requests carry only
/// the prompt. No retries are attempted; every failure goes straight back to
/// the caller.
pub struct VertexClient {
    http_client: Client,
    predict_url: String,
    timeout: Duration,
}

impl VertexClient {
    pub fn new(config: &VertexConfig) -> Result<Self> {
        let timeout = Duration::from_secs(config.timeout_seconds);
        let http_client = Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(10))
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_keepalive(Some(Duration::from_secs(60)))
            .use_rustls_tls()
            .build()
            .map_err(|e| ProxyError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        debug!("Created Vertex AI client for {}", config.predict_url());

        Ok(Self {
            http_client,
            predict_url: config.predict_url(),
            timeout,
        })
    }

    /// Get the prediction endpoint URL
    pub fn predict_url(&self) -> &str {
        &self.predict_url
    }

    /// Call the model's `:predict` method once.
    pub async fn predict(
        &self,
        request: &PredictRequest,
        token: &AccessToken,
    ) -> Result<PredictResponse> {
        let start = Instant::now();

        let response = self
            .http_client
            .post(&self.predict_url)
            .header("Authorization", token.bearer())
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| self.transport_error(e, start))?;

        let status = response.status();
        let response_text = response
            .text()
            .await
            .map_err(|e| self.transport_error(e, start))?;

        crate::metrics::record_upstream_call(status.as_str(), start.elapsed().as_secs_f64());

        // Only a plain 200 carries predictions; any other status is relayed as-is
        if status != StatusCode::OK {
            error!(
                "Vertex AI error: HTTP {} - Response body: {}",
                status,
                crate::utils::logging::sanitize(&response_text)
            );
            return Err(ProxyError::Upstream(response_text));
        }

        debug!(
            "Vertex AI responded in {:?} ({} bytes)",
            start.elapsed(),
            response_text.len()
        );

        serde_json::from_str(&response_text).map_err(|e| {
            error!("Failed to parse Vertex AI response: {}", e);
            ProxyError::Internal(format!("Response parsing error: {}", e))
        })
    }

    fn transport_error(&self, e: reqwest::Error, start: Instant) -> ProxyError {
        let elapsed = start.elapsed().as_secs_f64();
        if e.is_timeout() {
            error!("Vertex AI call exceeded {:?}", self.timeout);
            crate::metrics::record_upstream_call("timeout", elapsed);
            ProxyError::UpstreamTimeout(self.timeout)
        } else {
            error!("Vertex AI transport error: {}", e);
            crate::metrics::record_upstream_call("error", elapsed);
            ProxyError::Internal(format!("HTTP error: {}", e))
        }
    }
}
