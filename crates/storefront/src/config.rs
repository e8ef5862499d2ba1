//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required (when `ORDER_STORE=sanity`, the default)
//! - `SANITY_PROJECT_ID` - CMS project ID
//! - `SANITY_DATASET` - CMS dataset (e.g., production)
//! - `SANITY_AUTH_TOKEN` - Write token for the dataset
//!
//! The `NEXT_PUBLIC_SANITY_*` spellings of these three are accepted as
//! fallbacks so an existing `.env` keeps working.
//!
//! ## Optional
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `SANITY_API_VERSION` - Data API version (default: 2021-06-07)
//! - `ORDER_STORE` - `sanity` or `memory` (default: sanity)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment tag
//! - `SENTRY_SAMPLE_RATE` - Error sample rate, 0.0-1.0 (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Transaction sample rate, 0.0-1.0 (default: 0.0)

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};

use secrecy::SecretString;
use thiserror::Error;

const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

/// Default CMS data API version.
pub const DEFAULT_SANITY_API_VERSION: &str = "2021-06-07";

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

/// Which document store backs order creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrderStoreKind {
    /// Hosted CMS over HTTPS.
    #[default]
    Sanity,
    /// In-process store; orders are lost on restart.
    Memory,
}

impl std::str::FromStr for OrderStoreKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sanity" => Ok(Self::Sanity),
            "memory" => Ok(Self::Memory),
            other => Err(format!("expected 'sanity' or 'memory', got '{other}'")),
        }
    }
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Order store backend
    pub order_store: OrderStoreKind,
    /// CMS connection (present when `order_store` is `Sanity`)
    pub sanity: Option<SanityConfig>,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment tag
    pub sentry_environment: Option<String>,
    /// Fraction of errors sent to Sentry
    pub sentry_sample_rate: f32,
    /// Fraction of requests traced to Sentry
    pub sentry_traces_sample_rate: f32,
}

/// CMS data API configuration.
///
/// Implements `Debug` manually to redact the token.
#[derive(Clone)]
pub struct SanityConfig {
    /// Project ID (first label of the API host)
    pub project_id: String,
    /// Dataset name
    pub dataset: String,
    /// Data API version, without the leading `v`
    pub api_version: String,
    /// Token with write access to the dataset
    pub token: SecretString,
}

impl std::fmt::Debug for SanityConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SanityConfig")
            .field("project_id", &self.project_id)
            .field("dataset", &self.dataset)
            .field("api_version", &self.api_version)
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
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if the CMS token fails validation (placeholder detection, entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Same as [`StorefrontConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = Env(lookup);

        let host = env
            .get_or_default("STOREFRONT_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOREFRONT_HOST".to_string(), e.to_string())
            })?;
        let port = env
            .get_or_default("STOREFRONT_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOREFRONT_PORT".to_string(), e.to_string())
            })?;
        let order_store = env
            .get_or_default("ORDER_STORE", "sanity")
            .parse::<OrderStoreKind>()
            .map_err(|e| ConfigError::InvalidEnvVar("ORDER_STORE".to_string(), e))?;

        let sanity = match order_store {
            OrderStoreKind::Sanity => Some(SanityConfig::from_env(&env)?),
            OrderStoreKind::Memory => None,
        };

        Ok(Self {
            host,
            port,
            order_store,
            sanity,
            sentry_dsn: env.get_optional("SENTRY_DSN"),
            sentry_environment: env.get_optional("SENTRY_ENVIRONMENT"),
            sentry_sample_rate: env.get_rate("SENTRY_SAMPLE_RATE", 1.0)?,
            sentry_traces_sample_rate: env.get_rate("SENTRY_TRACES_SAMPLE_RATE", 0.0)?,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl SanityConfig {
    fn from_env<F>(env: &Env<F>) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_version = env.get_or_default("SANITY_API_VERSION", DEFAULT_SANITY_API_VERSION);
        let api_version = api_version.trim_start_matches('v').to_string();

        Ok(Self {
            project_id: env.get_required_with_fallback(
                "SANITY_PROJECT_ID",
                "NEXT_PUBLIC_SANITY_PROJECT_ID",
            )?,
            dataset: env.get_required_with_fallback("SANITY_DATASET", "NEXT_PUBLIC_SANITY_DATASET")?,
            api_version,
            token: env.get_validated_secret("SANITY_AUTH_TOKEN", "NEXT_PUBLIC_SANITY_AUTH_TOKEN")?,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Variable lookup with the typed accessors used above.
struct Env<F>(F);

impl<F> Env<F>
where
    F: Fn(&str) -> Option<String>,
{
    /// Get an optional environment variable. Empty values count as unset.
    fn get_optional(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|value| !value.trim().is_empty())
    }

    /// Get an environment variable with a default value.
    fn get_or_default(&self, key: &str, default: &str) -> String {
        self.get_optional(key)
            .unwrap_or_else(|| default.to_string())
    }

    /// Get a required variable, falling back to a legacy name.
    fn get_required_with_fallback(&self, key: &str, fallback: &str) -> Result<String, ConfigError> {
        self.get_optional(key)
            .or_else(|| self.get_optional(fallback))
            .ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
    }

    /// Load and validate a secret.
    fn get_validated_secret(&self, key: &str, fallback: &str) -> Result<SecretString, ConfigError> {
        let value = self.get_required_with_fallback(key, fallback)?;
        validate_secret_strength(&value, key)?;
        Ok(SecretString::from(value))
    }

    /// Parse a sample rate in `0.0..=1.0`.
    fn get_rate(&self, key: &str, default: f32) -> Result<f32, ConfigError> {
        let Some(raw) = self.get_optional(key) else {
            return Ok(default);
        };
        let rate = raw
            .parse::<f32>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
        if !(0.0..=1.0).contains(&rate) {
            return Err(ConfigError::InvalidEnvVar(
                key.to_string(),
                format!("must be between 0.0 and 1.0 (got {rate})"),
            ));
        }
        Ok(rate)
    }
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

    if let Some(pattern) = PLACEHOLDER_PATTERNS.iter().find(|p| lower.contains(*p)) {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!("appears to be a placeholder (contains '{pattern}')"),
        ));
    }

    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use the token generated by the CMS."
            ),
        ));
    }

    Ok(())
}
