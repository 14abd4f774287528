//! Admin configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `DRYKLIN_API_BASE_URL` - Root of the DryKlin REST API (e.g. `https://api.dryklin.com/api/v1`)
//! - `DRYKLIN_STORAGE_SECRET` - Key material for encrypting stored tokens (min 32 chars, high entropy)
//!
//! ## Optional
//! - `DRYKLIN_SESSION_FILE` - Session store path (default: .dryklin-session.json)
//! - `DRYKLIN_HTTP_TIMEOUT_SECS` - Request timeout (default: 30)
//! - `DRYKLIN_CONFIRM_RETRIES` - Retries for order confirmation (default: 1)
//! - `DRYKLIN_RETRY_DELAY_MS` - Pause between confirmation attempts (default: 1000)
//! - `DRYKLIN_LOG_JSON` - Emit JSON logs when `true` or `1`
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Sentry error sample rate (default: 1.0)

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use url::Url;

use crate::http::{ClientSettings, RetryPolicy};

const MIN_STORAGE_SECRET_LENGTH: usize = 32;
const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;
const DEFAULT_SESSION_FILE: &str = ".dryklin-session.json";
const DEFAULT_TIMEOUT_SECS: &str = "30";
const DEFAULT_RETRY_DELAY_MS: &str = "1000";

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
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

/// Admin client configuration.
///
/// Implements `Debug` manually to redact the storage secret.
#[derive(Clone)]
pub struct AdminConfig {
    /// Root of the REST API
    pub api_base_url: Url,
    /// Key material for the token cipher
    pub storage_secret: SecretString,
    /// Where the file-backed session store lives
    pub session_file: PathBuf,
    /// Per-request timeout
    pub http_timeout: Duration,
    /// Retry count and delay for order confirmation
    pub confirm_retry: RetryPolicy,
    /// Emit logs as JSON lines
    pub log_json: bool,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "development", "staging", "production")
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate (0.0 to 1.0)
    pub sentry_sample_rate: f32,
}

impl std::fmt::Debug for AdminConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminConfig")
            .field("api_base_url", &self.api_base_url.as_str())
            .field("storage_secret", &"[REDACTED]")
            .field("session_file", &self.session_file)
            .field("http_timeout", &self.http_timeout)
            .field("confirm_retry", &self.confirm_retry)
            .field("log_json", &self.log_json)
            .field("sentry_dsn", &self.sentry_dsn.as_ref().map(|_| "[REDACTED]"))
            .field("sentry_environment", &self.sentry_environment)
            .field("sentry_sample_rate", &self.sentry_sample_rate)
            .finish()
    }
}

impl AdminConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if the storage secret fails validation (placeholder detection, entropy
    /// check, length).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// See [`AdminConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = Env(lookup);

        let raw_base_url = env.required("DRYKLIN_API_BASE_URL")?;
        let api_base_url = Url::parse(&raw_base_url).map_err(|e| {
            ConfigError::InvalidEnvVar("DRYKLIN_API_BASE_URL".to_string(), e.to_string())
        })?;
        if !matches!(api_base_url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidEnvVar(
                "DRYKLIN_API_BASE_URL".to_string(),
                format!("unsupported scheme '{}'", api_base_url.scheme()),
            ));
        }

        let storage_secret = env.validated_secret("DRYKLIN_STORAGE_SECRET")?;
        validate_secret_length(&storage_secret, "DRYKLIN_STORAGE_SECRET")?;

        let session_file = PathBuf::from(env.or_default("DRYKLIN_SESSION_FILE", DEFAULT_SESSION_FILE));
        let http_timeout = Duration::from_secs(env.parsed("DRYKLIN_HTTP_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?);
        let retries = env.parsed("DRYKLIN_CONFIRM_RETRIES", "1")?;
        let delay = Duration::from_millis(env.parsed("DRYKLIN_RETRY_DELAY_MS", DEFAULT_RETRY_DELAY_MS)?);
        let log_json = env
            .optional("DRYKLIN_LOG_JSON")
            .is_some_and(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"));

        let sentry_dsn = env.optional("SENTRY_DSN").filter(|s| !s.is_empty());
        let sentry_environment = env.optional("SENTRY_ENVIRONMENT");
        let sentry_sample_rate = env
            .optional("SENTRY_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);

        Ok(Self {
            api_base_url,
            storage_secret,
            session_file,
            http_timeout,
            confirm_retry: RetryPolicy::new(retries, delay),
            log_json,
            sentry_dsn,
            sentry_environment,
            sentry_sample_rate,
        })
    }

    /// Settings for building an [`crate::http::ApiClient`].
    #[must_use]
    pub fn client_settings(&self) -> ClientSettings {
        ClientSettings::new(self.api_base_url.clone()).with_timeout(self.http_timeout)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

struct Env<F>(F);

impl<F: Fn(&str) -> Option<String>> Env<F> {
    /// Get an optional variable.
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key)
    }

    /// Get a required variable; blank counts as missing.
    fn required(&self, key: &str) -> Result<String, ConfigError> {
        self.optional(key)
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
    }

    /// Get a variable with a default value.
    fn or_default(&self, key: &str, default: &str) -> String {
        self.optional(key).unwrap_or_else(|| default.to_string())
    }

    /// Parse a variable, falling back to `default` when unset.
    fn parsed<T>(&self, key: &str, default: &str) -> Result<T, ConfigError>
    where
        T: std::str::FromStr,
        T::Err: std::fmt::Display,
    {
        self.or_default(key, default)
            .trim()
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
    }

    /// Load and validate a secret.
    fn validated_secret(&self, key: &str) -> Result<SecretString, ConfigError> {
        let value = self.required(key)?;
        validate_secret_strength(&value, key)?;
        Ok(SecretString::from(value))
    }
}

/// Validate that a secret meets minimum length requirements.
fn validate_secret_length(secret: &SecretString, var_name: &str) -> Result<(), ConfigError> {
    let value = secret.expose_secret();
    if value.len() < MIN_STORAGE_SECRET_LENGTH {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "must be at least {} characters (got {})",
                MIN_STORAGE_SECRET_LENGTH,
                value.len()
            ),
        ));
    }
    Ok(())
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.chars().count() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)]
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use a randomly generated secret."
            ),
        ));
    }

    Ok(())
}
