//! The prompt-to-image relay path.
//!
//! Each call is independent: validate the prompt, acquire a fresh token, make
//! exactly one prediction call and reshape the first prediction. Nothing
//! survives between calls.
//!
//! Author: kelexine (<https://github.com/kelexine>)

use crate::error::{ProxyError, Result};
use crate::oauth::TokenProvider;
use crate::vertex::{PredictRequest, PredictResponse, VertexClient};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Marker placed in the `error` field when safety filters withheld the image.
pub const FILTERED_MESSAGE: &str = "Image was filtered by Safety Filters";

/// Inbound body of `POST /generate-image`.
#[derive(Debug, Deserialize)]
pub struct GenerateImageRequest {
    pub prompt: String,
}

/// A validated, non-blank prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePrompt(String);

impl ImagePrompt {
    pub fn new(prompt: impl Into<String>) -> Result<Self> {
        let prompt = prompt.into();
        if prompt.trim().is_empty() {
            return Err(ProxyError::InvalidRequest(
                "prompt must be a non-empty string".to_string(),
            ));
        }
        Ok(Self(prompt))
    }

    /// Parses and validates a raw request body.
    pub fn from_body(body: &[u8]) -> Result<Self> {
        let request: GenerateImageRequest = serde_json::from_slice(body)
            .map_err(|e| ProxyError::InvalidRequest(format!("Invalid request body: {}", e)))?;
        Self::new(request.prompt)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

/// Outcome of a prediction that reached the model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PredictionResult {
    Image(String),
    Filtered { reason: Option<String> },
}

impl PredictionResult {
    /// Interprets the first prediction of an upstream response.
    pub fn from_response(response: PredictResponse) -> Result<Self> {
        let prediction = response.predictions.into_iter().next().ok_or_else(|| {
            ProxyError::Internal("Upstream response contained no predictions".to_string())
        })?;

        if let Some(mime_type) = &prediction.mime_type {
            debug!("Upstream returned {}", mime_type);
        }

        Ok(match prediction.bytes_base64_encoded {
            Some(image) => PredictionResult::Image(image),
            None => PredictionResult::Filtered {
                reason: prediction.rai_filtered_reason,
            },
        })
    }
}

/// JSON body returned to the caller on a 200.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ImageReply {
    Generated { image_base64: String },
    Filtered { error: String, reason: Option<String> },
}

impl From<PredictionResult> for ImageReply {
    fn from(result: PredictionResult) -> Self {
        match result {
            PredictionResult::Image(image_base64) => ImageReply::Generated { image_base64 },
            PredictionResult::Filtered { reason } => ImageReply::Filtered {
                error: FILTERED_MESSAGE.to_string(),
                reason,
            },
        }
    }
}

impl ImageReply {
    /// Metrics label for the reply.
    pub fn outcome(&self) -> &'static str {
        match self {
            ImageReply::Generated { .. } => "generated",
            ImageReply::Filtered { .. } => "filtered",
        }
    }
}

/// Ties a token source to the prediction client.
pub struct ImageRelay {
    tokens: Arc<dyn TokenProvider>,
    client: VertexClient,
}

impl ImageRelay {
    pub fn new(tokens: Arc<dyn TokenProvider>, client: VertexClient) -> Self {
        Self { tokens, client }
    }

    /// Runs one prompt through the model.
    ///
    /// A token failure is logged with its cause and surfaced only as
    /// [`ProxyError::Authentication`]; the upstream is never called without a token.
    pub async fn generate_image(&self, prompt: ImagePrompt) -> Result<ImageReply> {
        let token = match self.tokens.acquire_token().await {
            Ok(token) => token,
            Err(e) => {
                error!("Failed to get access token: {}", e);
                return Err(ProxyError::Authentication);
            }
        };

        let request = PredictRequest::for_prompt(prompt.into_inner());
        debug!("Sending prediction request to {}", self.client.predict_url());

        let response = self.client.predict(&request, &token).await?;
        let result = PredictionResult::from_response(response)?;

        match &result {
            PredictionResult::Image(image) => {
                info!("Image generated ({} base64 chars)", image.len());
            }
            PredictionResult::Filtered { reason } => {
                warn!("Image withheld by safety filters: {:?}", reason);
            }
        }

        Ok(result.into())
    }
}
