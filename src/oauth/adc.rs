//! Application Default Credentials.
//!
//! Resolves credentials the same way Google's client libraries do: an explicit
//! credentials file, then the gcloud well-known file, then the compute
//! metadata server. Nothing is cached; every call to
//! [`ApplicationDefaultCredentials::acquire_token`] resolves and exchanges anew.

// Author: kelexine (https://github.com/kelexine)

use super::jwt::{sign_assertion, AssertionClaims};
use super::{AccessToken, TokenProvider};
use crate::config::CredentialsConfig;
use crate::error::{ProxyError, Result};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// Google's OAuth2 token endpoint.
pub const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

/// On-disk credential formats understood by ADC.
#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CredentialsFile {
    /// Written by `gcloud auth application-default login`.
    AuthorizedUser {
        client_id: String,
        client_secret: String,
        refresh_token: String,
        #[serde(default)]
        token_uri: Option<String>,
    },
    /// A downloaded service-account key.
    ServiceAccount {
        client_email: String,
        private_key: String,
        #[serde(default)]
        private_key_id: Option<String>,
        #[serde(default)]
        token_uri: Option<String>,
    },
}

// Custom Debug impl that never logs secrets
impl std::fmt::Debug for CredentialsFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CredentialsFile::AuthorizedUser { client_id, .. } => f
                .debug_struct("AuthorizedUser")
                .field("client_id", client_id)
                .field("client_secret", &"[REDACTED]")
                .field("refresh_token", &"[REDACTED]")
                .finish(),
            CredentialsFile::ServiceAccount { client_email, .. } => f
                .debug_struct("ServiceAccount")
                .field("client_email", client_email)
                .field("private_key", &"[REDACTED]")
                .finish(),
        }
    }
}

impl CredentialsFile {
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            ProxyError::Credentials(format!(
                "Failed to read credentials file {}: {}",
                path.display(),
                e
            ))
        })?;

        serde_json::from_str(&contents).map_err(|e| {
            ProxyError::Credentials(format!("Invalid credentials file {}: {}", path.display(), e))
        })
    }
}

#[derive(Debug)]
enum CredentialSource {
    File(PathBuf),
    MetadataServer,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    expires_in: Option<i64>,
}

/// [`TokenProvider`] backed by Application Default Credentials.
#[derive(Clone)]
pub struct ApplicationDefaultCredentials {
    http_client: Client,
    config: CredentialsConfig,
}

impl ApplicationDefaultCredentials {
    pub fn new(config: &CredentialsConfig) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .connect_timeout(Duration::from_secs(config.timeout_seconds.min(5)))
            .use_rustls_tls()
            .build()
            .map_err(|e| ProxyError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            config: config.clone(),
        })
    }

    /// Picks the first available credential source.
    fn resolve_source(&self) -> CredentialSource {
        if let Some(path) = &self.config.credentials_path {
            return CredentialSource::File(PathBuf::from(path));
        }

        if let Some(path) = std::env::var_os("GOOGLE_APPLICATION_CREDENTIALS") {
            if !path.is_empty() {
                return CredentialSource::File(PathBuf::from(path));
            }
        }

        if let Some(path) = well_known_file() {
            if path.exists() {
                return CredentialSource::File(path);
            }
        }

        CredentialSource::MetadataServer
    }

    async fn token_from_file(&self, path: &Path) -> Result<AccessToken> {
        match CredentialsFile::load(path)? {
            CredentialsFile::AuthorizedUser {
                client_id,
                client_secret,
                refresh_token,
                token_uri,
            } => {
                let url = token_uri.as_deref().unwrap_or(GOOGLE_TOKEN_URL);
                let params = [
                    ("client_id", client_id.as_str()),
                    ("client_secret", client_secret.as_str()),
                    ("refresh_token", refresh_token.as_str()),
                    ("grant_type", "refresh_token"),
                ];
                self.exchange(self.http_client.post(url).form(&params), "refresh-token grant")
                    .await
            }
            CredentialsFile::ServiceAccount {
                client_email,
                private_key,
                private_key_id,
                token_uri,
            } => {
                let url = token_uri.as_deref().unwrap_or(GOOGLE_TOKEN_URL);
                let assertion = sign_assertion(
                    &private_key,
                    &AssertionClaims {
                        issuer: &client_email,
                        scope: &self.config.scope,
                        audience: url,
                        key_id: private_key_id.as_deref(),
                        issued_at: chrono::Utc::now().timestamp(),
                    },
                )?;
                let params = [
                    ("grant_type", JWT_BEARER_GRANT),
                    ("assertion", assertion.as_str()),
                ];
                self.exchange(self.http_client.post(url).form(&params), "service-account grant")
                    .await
            }
        }
    }

    async fn token_from_metadata_server(&self) -> Result<AccessToken> {
        let url = format!(
            "http://{}/computeMetadata/v1/instance/service-accounts/default/token",
            self.config.metadata_host
        );
        let request = self
            .http_client
            .get(url)
            .header("Metadata-Flavor", "Google")
            .query(&[("scopes", self.config.scope.as_str())]);

        self.exchange(request, "metadata server").await
    }

    /// Sends a token request and parses the OAuth2 token response.
    async fn exchange(&self, request: RequestBuilder, source: &str) -> Result<AccessToken> {
        let response = request.send().await.map_err(|e| {
            ProxyError::Credentials(format!("Token request via {} failed: {}", source, e))
        })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown".to_string());
            return Err(ProxyError::Credentials(format!(
                "Token request via {} returned HTTP {}: {}",
                source,
                status.as_u16(),
                crate::utils::logging::sanitize(&error_text)
            )));
        }

        let token: TokenResponse = response.json().await.map_err(|e| {
            ProxyError::Credentials(format!("Malformed token response from {}: {}", source, e))
        })?;

        let access_token = token.access_token.filter(|t| !t.is_empty()).ok_or_else(|| {
            ProxyError::Credentials(format!("Missing access_token in response from {}", source))
        })?;

        let token = AccessToken::new(access_token, token.expires_in);
        debug!(
            "Obtained access token from {} (expires in {:?}s)",
            source,
            token.expires_in_seconds()
        );
        Ok(token)
    }
}

#[async_trait]
impl TokenProvider for ApplicationDefaultCredentials {
    async fn acquire_token(&self) -> Result<AccessToken> {
        let source = self.resolve_source();
        debug!("Resolving access token via {:?}", source);

        let result = match &source {
            CredentialSource::File(path) => self.token_from_file(path).await,
            CredentialSource::MetadataServer => self.token_from_metadata_server().await,
        };

        crate::metrics::record_token_acquisition(result.is_ok());
        result
    }
}

/// `<config dir>/gcloud/application_default_credentials.json`
fn well_known_file() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| {
        dir.join("gcloud")
            .join("application_default_credentials.json")
    })
}
