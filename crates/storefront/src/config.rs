//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `AIRTABLE_PERSONAL_TOKEN` - Personal access token for the record base
//! - `AIRTABLE_BASE_ID` - Base id (e.g., `appXXXXXXXXXXXXXX`)
//!
//! ## Optional
//! - `VELORA_HOST` - Bind address (default: 127.0.0.1)
//! - `VELORA_PORT` - Listen port (default: 3000)
//! - `AIRTABLE_API_URL` - API endpoint override (default: `https://api.airtable.com`)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Tracing sample rate (default: 0.0)

use std::net::{IpAddr, SocketAddr};

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use url::Url;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "xxx",
    "todo",
    "fixme",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Record service configuration
    pub airtable: AirtableConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate
    pub sentry_sample_rate: f32,
    /// Sentry tracing sample rate
    pub sentry_traces_sample_rate: f32,
}

/// Record service (Airtable) configuration.
///
/// Implements `Debug` manually to redact the token.
#[derive(Clone)]
pub struct AirtableConfig {
    /// API endpoint; overridable so tests can point at a local mock.
    pub api_url: Url,
    /// Base id (e.g., `appXXXXXXXXXXXXXX`)
    pub base_id: String,
    /// Personal access token (server-side only)
    pub token: SecretString,
}

impl std::fmt::Debug for AirtableConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AirtableConfig")
            .field("api_url", &self.api_url.as_str())
            .field("base_id", &self.base_id)
            .field("token", &"[REDACTED]")
            .finish()
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid, or
    /// if the token fails placeholder validation.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = get_env_or_default("VELORA_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("VELORA_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("VELORA_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("VELORA_PORT".to_string(), e.to_string()))?;

        let airtable = AirtableConfig::from_env()?;

        let sentry_dsn = get_optional_env("SENTRY_DSN");
        let sentry_environment = get_optional_env("SENTRY_ENVIRONMENT");
        let sentry_sample_rate = parse_rate("SENTRY_SAMPLE_RATE", 1.0)?;
        let sentry_traces_sample_rate = parse_rate("SENTRY_TRACES_SAMPLE_RATE", 0.0)?;

        Ok(Self {
            host,
            port,
            airtable,
            sentry_dsn,
            sentry_environment,
            sentry_sample_rate,
            sentry_traces_sample_rate,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl AirtableConfig {
    /// Load just the record service configuration from the environment.
    ///
    /// Used directly by the CLI tools, which have no need for the server
    /// bind address or Sentry settings.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_url = get_env_or_default("AIRTABLE_API_URL", "https://api.airtable.com");
        let api_url = Url::parse(&api_url).map_err(|e| {
            ConfigError::InvalidEnvVar("AIRTABLE_API_URL".to_string(), e.to_string())
        })?;

        let base_id = get_required_env("AIRTABLE_BASE_ID")?;
        if !base_id.starts_with("app") {
            return Err(ConfigError::InvalidEnvVar(
                "AIRTABLE_BASE_ID".to_string(),
                "base ids start with 'app'".to_string(),
            ));
        }

        let token = get_validated_secret("AIRTABLE_PERSONAL_TOKEN")?;

        Ok(Self {
            api_url,
            base_id,
            token,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse an optional sample rate, clamped to `[0, 1]`.
fn parse_rate(key: &str, default: f32) -> Result<f32, ConfigError> {
    match std::env::var(key) {
        Err(_) => Ok(default),
        Ok(raw) => raw
            .parse::<f32>()
            .map(|rate| rate.clamp(0.0, 1.0))
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string())),
    }
}

/// Get a required secret, rejecting empty values and common placeholders.
fn get_validated_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;

    if value.trim().is_empty() {
        return Err(ConfigError::InsecureSecret(
            key.to_string(),
            "value is empty".to_string(),
        ));
    }

    let lowered = value.to_lowercase();
    for pattern in PLACEHOLDER_PATTERNS {
        if lowered.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                key.to_string(),
                format!("value looks like a placeholder (contains '{pattern}')"),
            ));
        }
    }

    Ok(SecretString::from(value))
}

/// Expose the token for the Authorization header.
///
/// Narrow accessor so `expose_secret` call sites stay greppable.
#[must_use]
pub fn bearer_token(config: &AirtableConfig) -> String {
    format!("Bearer {}", config.token.expose_secret())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_token_rejected() {
        // Safe in tests; the workspace only forbids unsafe in non-test builds.
        unsafe {
            std::env::set_var("TEST_PLACEHOLDER_TOKEN", "your-token-here");
        }
        let result = get_validated_secret("TEST_PLACEHOLDER_TOKEN");
        assert!(matches!(result, Err(ConfigError::InsecureSecret(_, _))));
    }

    #[test]
    fn test_rate_clamped() {
        unsafe {
            std::env::set_var("TEST_RATE_CLAMP", "3.5");
        }
        let rate = parse_rate("TEST_RATE_CLAMP", 1.0).expect("parse");
        assert!((rate - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_missing_rate_uses_default() {
        let rate = parse_rate("TEST_RATE_ABSENT", 0.25).expect("parse");
        assert!((rate - 0.25).abs() < f32::EPSILON);
    }
}
