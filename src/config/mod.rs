// Configuration module
// Author: kelexine (https://github.com/kelexine)

mod models;

pub use models::*;

use crate::error::{ProxyError, Result};
use config::{Config, Environment, File};
use std::path::PathBuf;

impl AppConfig {
    /// Load configuration from multiple sources with precedence:
    /// 1. Environment variables (highest)
    /// 2. Config file
    /// 3. Defaults (lowest)
    ///
    /// CLI overrides are applied by the caller afterwards.
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        let path = config_path
            .map(str::to_string)
            .unwrap_or_else(Self::default_config_path);

        let config = Config::builder()
            // Start with defaults
            .add_source(Config::try_from(&Self::default())?)
            // An explicitly named file must exist; the default one is optional
            .add_source(File::with_name(&path).required(config_path.is_some()))
            // Override with environment variables (e.g. IMAGEN_RELAY__VERTEX__PROJECT_ID)
            .add_source(
                Environment::with_prefix("IMAGEN_RELAY")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| ProxyError::Config(e.to_string()))?;

        let config: Self = config
            .try_deserialize()
            .map_err(|e| ProxyError::Config(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    /// Reject settings that would make every relay call fail.
    pub fn validate(&self) -> Result<()> {
        if self.vertex.project_id.trim().is_empty() {
            return Err(ProxyError::Config(
                "vertex.project_id is required (set IMAGEN_RELAY__VERTEX__PROJECT_ID)".to_string(),
            ));
        }
        if self.vertex.location.trim().is_empty() {
            return Err(ProxyError::Config("vertex.location must not be empty".to_string()));
        }
        if self.vertex.model.trim().is_empty() {
            return Err(ProxyError::Config("vertex.model must not be empty".to_string()));
        }
        if self.vertex.timeout_seconds == 0 || self.credentials.timeout_seconds == 0 {
            return Err(ProxyError::Config("timeouts must be at least one second".to_string()));
        }
        Ok(())
    }

    fn default_config_path() -> String {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".imagen-relay")
            .join("config.toml")
            .to_string_lossy()
            .to_string()
    }
}
