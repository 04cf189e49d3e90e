//! Structured logging and security-focused trace utilities.
//!
//! This module configures the `tracing` ecosystem for the relay,
//! supporting multiple output formats and providing utilities to prevent
//! sensitive data (like API tokens) from leaking into logs.
//!
//! Author: kelexine (<https://github.com/kelexine>)

use crate::config::LoggingConfig;
use crate::error::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initializes the global tracing subscriber for the application.
///
/// Supports three output formats:
/// - `json`: Structured JSON logs for Cloud Logging ingestion.
/// - `compact`: Single-line human-readable output.
/// - `pretty` (default): Human-readable, colorized output for development.
///
/// Log levels are controlled via the `RUST_LOG` environment variable or
/// the provided `LoggingConfig`.
pub fn init(config: &LoggingConfig) -> Result<()> {
    // Configure filter from environment or config file
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.level));

    match config.format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        "compact" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().compact())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
    }

    Ok(())
}

/// Sanitizes sensitive information from log messages.
///
/// This function scans strings for common Google Cloud credential patterns
/// (like `ya29.` access tokens) and replaces them with a `\[REDACTED\]` placeholder.
/// This prevents sensitive secrets from being persisted in log sinks.
///
/// # Arguments
///
/// * `input` - The raw string that may contain sensitive data.
///
/// # Returns
///
/// A new string where all detected secrets have been replaced.
pub fn sanitize(input: &str) -> String {
    let mut result = input.to_string();
    
    // Pattern 1: Google OAuth2 Access Tokens
    // These typically start with "ya29."
    redact_all(&mut result, "ya29.", "[REDACTED_ACCESS_TOKEN]");

    // Pattern 2: Google Refresh Tokens
    // These typically start with "1//0"
    redact_all(&mut result, "1//0", "[REDACTED_REFRESH_TOKEN]");

    result
}

/// Replaces every token starting with `prefix` up to the next delimiter.
fn redact_all(input: &mut String, prefix: &str, replacement: &str) {
    let mut from = 0;
    while let Some(pos) = input[from..].find(prefix) {
        let start = from + pos;
        // Search for the end of the token (delimiter or end of string)
        let end = input[start..]
            .find(|c: char| c.is_whitespace() || c == '"' || c == '\'' || c == ',')
            .map(|i| start + i)
            .unwrap_or(input.len());
        input.replace_range(start..end, replacement);
        from = start + replacement.len();
    }
}
