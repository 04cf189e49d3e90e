// Vertex AI Imagen client module
// Author: kelexine (https://github.com/kelexine)

mod client;

pub use client::VertexClient;

use serde::{Deserialize, Serialize};

/// Body of a `:predict` call.
#[derive(Debug, Clone, Serialize)]
pub struct PredictRequest {
    pub instances: Vec<Instance>,
    pub parameters: PredictParameters,
}

#[derive(Debug, Clone, Serialize)]
pub struct Instance {
    pub prompt: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictParameters {
    pub sample_count: u32,
    pub aspect_ratio: String,
}

impl Default for PredictParameters {
    fn default() -> Self {
        Self {
            sample_count: 1,
            aspect_ratio: "1:1".to_string(),
        }
    }
}

impl PredictRequest {
    /// A single-image, square request for one prompt.
    pub fn for_prompt(prompt: impl Into<String>) -> Self {
        Self {
            instances: vec![Instance {
                prompt: prompt.into(),
            }],
            parameters: PredictParameters::default(),
        }
    }
}

/// Body returned by a successful `:predict` call.
#[derive(Debug, Clone, Deserialize)]
pub struct PredictResponse {
    #[serde(default)]
    pub predictions: Vec<Prediction>,
}

/// One generated item. Imagen omits the image bytes when safety filters block it.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prediction {
    #[serde(default)]
    pub bytes_base64_encoded: Option<String>,
    #[serde(default)]
    pub mime_type: Option<String>,
    #[serde(default)]
    pub rai_filtered_reason: Option<String>,
}
