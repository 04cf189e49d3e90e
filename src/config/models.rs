//! Configuration data structures for the image relay.
//!
//! This module defines the schema for the application settings, including
//! server parameters, the Vertex AI deployment coordinates, and how
//! credentials are resolved.
//!
//! Author: kelexine (<https://github.com/kelexine>)

use serde::{Deserialize, Serialize};

/// OAuth scope required for Vertex AI prediction calls.
pub const CLOUD_PLATFORM_SCOPE: &str = "https://www.googleapis.com/auth/cloud-platform";

/// The root configuration object for the application.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    /// HTTP server settings (host, port, body limit).
    #[serde(default)]
    pub server: ServerConfig,

    /// Upstream Vertex AI settings.
    #[serde(default)]
    pub vertex: VertexConfig,

    /// Application Default Credentials settings.
    #[serde(default)]
    pub credentials: CredentialsConfig,

    /// Logging and observability settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Settings for the built-in HTTP server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The IP address or hostname the server should bind to.
    /// Default: `0.0.0.0`
    #[serde(default = "default_host")]
    pub host: String,

    /// The port number the server should listen on.
    /// Default: `8080`
    #[serde(default = "default_port")]
    pub port: u16,

    /// Largest accepted request body in bytes.
    /// Default: `1048576` (1 MiB)
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

/// Deployment coordinates of the Imagen model.
///
/// These are fixed for the lifetime of the process; nothing in a request can
/// change which model is called.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VertexConfig {
    /// Google Cloud project that owns the Vertex AI quota.
    #[serde(default)]
    pub project_id: String,

    /// Vertex AI region.
    /// Default: `us-central1`
    #[serde(default = "default_location")]
    pub location: String,

    /// Publisher model identifier.
    /// Default: `imagen-4.0-generate-001`
    #[serde(default = "default_model")]
    pub model: String,

    /// Overrides `https://{location}-aiplatform.googleapis.com`.
    #[serde(default)]
    pub api_endpoint: Option<String>,

    /// Upper bound for one prediction call in seconds.
    /// Default: `90`
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

/// Settings for Application Default Credentials resolution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CredentialsConfig {
    /// OAuth scope requested for every token.
    #[serde(default = "default_scope")]
    pub scope: String,

    /// Explicit credentials file; takes precedence over
    /// `GOOGLE_APPLICATION_CREDENTIALS`.
    #[serde(default)]
    pub credentials_path: Option<String>,

    /// Host of the compute metadata server.
    /// Default: `metadata.google.internal`
    #[serde(default = "default_metadata_host")]
    pub metadata_host: String,

    /// Timeout for token endpoint calls in seconds.
    /// Default: `10`
    #[serde(default = "default_token_timeout")]
    pub timeout_seconds: u64,
}

/// Settings for application logging and output format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Minimum log level (`trace`, `debug`, `info`, `warn`, `error`).
    /// Default: `info`
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format for logs (`pretty`, `json`, `compact`).
    /// Default: `pretty`
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

impl Default for VertexConfig {
    fn default() -> Self {
        Self {
            project_id: String::new(),
            location: default_location(),
            model: default_model(),
            api_endpoint: None,
            timeout_seconds: default_timeout(),
        }
    }
}

impl Default for CredentialsConfig {
    fn default() -> Self {
        Self {
            scope: default_scope(),
            credentials_path: None,
            metadata_host: default_metadata_host(),
            timeout_seconds: default_token_timeout(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl VertexConfig {
    /// Full URL of the model's `:predict` method.
    pub fn predict_url(&self) -> String {
        let base = match &self.api_endpoint {
            Some(endpoint) => endpoint.trim_end_matches('/').to_string(),
            None => format!("https://{}-aiplatform.googleapis.com", self.location),
        };
        format!(
            "{}/v1/projects/{}/locations/{}/publishers/google/models/{}:predict",
            base, self.project_id, self.location, self.model
        )
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_max_body_bytes() -> usize {
    1024 * 1024
}

fn default_location() -> String {
    "us-central1".to_string()
}

fn default_model() -> String {
    "imagen-4.0-generate-001".to_string()
}

fn default_timeout() -> u64 {
    90
}

fn default_scope() -> String {
    CLOUD_PLATFORM_SCOPE.to_string()
}

fn default_metadata_host() -> String {
    "metadata.google.internal".to_string()
}

fn default_token_timeout() -> u64 {
    10
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}
