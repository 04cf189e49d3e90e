//! RS256 assertions for the service-account `jwt-bearer` grant.
//!
//! Author: kelexine (<https://github.com/kelexine>)

use crate::error::{ProxyError, Result};
use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use base64::Engine;
use ring::rand::SystemRandom;
use ring::signature::{RsaKeyPair, RSA_PKCS1_SHA256};
use serde_json::json;

/// Assertion lifetime accepted by Google's token endpoint.
const ASSERTION_LIFETIME_SECS: i64 = 3600;

/// Claims carried by a service-account assertion.
pub(crate) struct AssertionClaims<'a> {
    pub issuer: &'a str,
    pub scope: &'a str,
    pub audience: &'a str,
    pub key_id: Option<&'a str>,
    pub issued_at: i64,
}

/// Builds and signs `header.claims.signature` with the PEM-encoded PKCS#8 key.
pub(crate) fn sign_assertion(private_key_pem: &str, claims: &AssertionClaims<'_>) -> Result<String> {
    let der = pem_to_der(private_key_pem)?;
    let key_pair = RsaKeyPair::from_pkcs8(&der)
        .map_err(|e| ProxyError::Credentials(format!("Invalid service account key: {}", e)))?;

    let mut header = json!({ "alg": "RS256", "typ": "JWT" });
    if let Some(kid) = claims.key_id {
        header["kid"] = json!(kid);
    }
    let payload = json!({
        "iss": claims.issuer,
        "scope": claims.scope,
        "aud": claims.audience,
        "iat": claims.issued_at,
        "exp": claims.issued_at + ASSERTION_LIFETIME_SECS,
    });

    let signing_input = format!(
        "{}.{}",
        URL_SAFE_NO_PAD.encode(serde_json::to_vec(&header)?),
        URL_SAFE_NO_PAD.encode(serde_json::to_vec(&payload)?),
    );

    let mut signature = vec![0u8; key_pair.public().modulus_len()];
    key_pair
        .sign(
            &RSA_PKCS1_SHA256,
            &SystemRandom::new(),
            signing_input.as_bytes(),
            &mut signature,
        )
        .map_err(|_| ProxyError::Credentials("Failed to sign JWT assertion".to_string()))?;

    Ok(format!("{}.{}", signing_input, URL_SAFE_NO_PAD.encode(signature)))
}

fn pem_to_der(pem: &str) -> Result<Vec<u8>> {
    let body: String = pem
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with("-----"))
        .collect();

    if body.is_empty() {
        return Err(ProxyError::Credentials("Service account key is empty".to_string()));
    }

    STANDARD
        .decode(body)
        .map_err(|e| ProxyError::Credentials(format!("Malformed PEM private key: {}", e)))
}
