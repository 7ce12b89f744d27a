//! Admin configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `CATALOG_API_URL` - Base URL of the catalog backend (categories, products, Shopify push)
//! - `REPORT_API_URL` - Base URL of the daily changed-products report service
//!
//! ## Optional
//! - `AUTH_API_URL` - Base URL of the login service (default: `REPORT_API_URL`)
//! - `ADMIN_HOST` - Bind address (default: 127.0.0.1)
//! - `ADMIN_PORT` - Listen port (default: 3001)
//! - `ADMIN_BASE_URL` - Public URL for the admin panel (default: derived from host/port)
//! - `DETAIL_STRATEGY` - `lazy` (fetch per click) or `prefetch` (bulk fetch per table) (default: lazy)
//! - `BACKEND_TIMEOUT_SECS` - Per-request timeout for backend calls (default: 30)
//! - `BULK_TIMEOUT_SECS` - Timeout for the bulk Shopify create call, which
//!   creates products one by one on the backend (default: 600)
//! - `SESSION_HOURS` - Login lifetime in hours (default: 8)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` / `SENTRY_TRACES_SAMPLE_RATE` - Sample rates (default: 1.0)
//!
//! ## Optional (TLS)
//! - `ADMIN_TLS_CERT` - PEM-encoded certificate chain
//! - `ADMIN_TLS_KEY` - PEM-encoded private key

use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_BULK_TIMEOUT_SECS: u64 = 600;
const DEFAULT_SESSION_HOURS: i64 = 8;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// How the detail viewer sources a product's extended record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DetailStrategy {
    /// One `GET /api/product/{id}` per click.
    #[default]
    Lazy,
    /// One bulk `POST /api/products` per rendered table, looked up per click.
    Prefetch,
}

impl FromStr for DetailStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lazy" => Ok(Self::Lazy),
            "prefetch" => Ok(Self::Prefetch),
            other => Err(format!("expected `lazy` or `prefetch`, got `{other}`")),
        }
    }
}

/// Base URLs of the backend services the panel talks to.
///
/// The catalog and report services have been deployed on different hosts,
/// so each is configured on its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendUrls {
    /// Categories, products and Shopify push endpoints
    pub catalog: String,
    /// Daily changed-products report
    pub report: String,
    /// Operator login
    pub auth: String,
}

/// Admin application configuration.
#[derive(Debug, Clone)]
pub struct AdminConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the admin panel
    pub base_url: String,
    /// Backend service base URLs (no trailing slash)
    pub backends: BackendUrls,
    /// Detail viewer data sourcing
    pub detail_strategy: DetailStrategy,
    /// Per-request timeout for backend calls
    pub backend_timeout: Duration,
    /// Timeout for the bulk Shopify create call
    pub bulk_timeout: Duration,
    /// Lifetime of a login, in hours
    pub session_hours: i64,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "development", "staging", "production")
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate (0.0 to 1.0)
    pub sentry_sample_rate: f32,
    /// Sentry traces sample rate for performance monitoring (0.0 to 1.0)
    pub sentry_traces_sample_rate: f32,
    /// TLS configuration for HTTPS (optional)
    pub tls: Option<TlsConfig>,
}

/// TLS configuration for HTTPS.
#[derive(Clone)]
pub struct TlsConfig {
    /// PEM-encoded certificate chain
    pub cert_pem: String,
    /// PEM-encoded private key
    pub key_pem: SecretString,
}

impl std::fmt::Debug for TlsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TlsConfig")
            .field("cert_pem", &"[CERTIFICATE]")
            .field("key_pem", &"[REDACTED]")
            .finish()
    }
}

impl TlsConfig {
    fn from_lookup(env: &Env<'_>) -> Result<Option<Self>, ConfigError> {
        match (env.optional("ADMIN_TLS_CERT"), env.optional("ADMIN_TLS_KEY")) {
            (Some(cert), Some(key)) => Ok(Some(Self {
                cert_pem: cert,
                key_pem: SecretString::from(key),
            })),
            (None, None) => Ok(None),
            _ => Err(ConfigError::InvalidEnvVar(
                "ADMIN_TLS_*".to_string(),
                "Both ADMIN_TLS_CERT and ADMIN_TLS_KEY must be set together".to_string(),
            )),
        }
    }
}

impl AdminConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = Env(&lookup);

        let host = env.parsed("ADMIN_HOST", "127.0.0.1")?;
        let port = env.parsed("ADMIN_PORT", "3001")?;
        let base_url = match env.optional("ADMIN_BASE_URL") {
            Some(url) => normalize_url("ADMIN_BASE_URL", &url)?,
            None => format!("http://{}", SocketAddr::new(host, port)),
        };

        let catalog = normalize_url("CATALOG_API_URL", &env.required("CATALOG_API_URL")?)?;
        let report = normalize_url("REPORT_API_URL", &env.required("REPORT_API_URL")?)?;
        let auth = match env.optional("AUTH_API_URL") {
            Some(url) => normalize_url("AUTH_API_URL", &url)?,
            None => report.clone(),
        };

        let detail_strategy = env.parsed("DETAIL_STRATEGY", "lazy")?;
        let timeout_secs = env.positive_secs("BACKEND_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?;
        let bulk_timeout_secs = env.positive_secs("BULK_TIMEOUT_SECS", DEFAULT_BULK_TIMEOUT_SECS)?;
        let session_hours: i64 = env.parsed("SESSION_HOURS", &DEFAULT_SESSION_HOURS.to_string())?;
        if session_hours <= 0 {
            return Err(ConfigError::InvalidEnvVar(
                "SESSION_HOURS".to_string(),
                "must be a positive number of hours".to_string(),
            ));
        }

        let sentry_dsn = env.optional("SENTRY_DSN");
        let sentry_environment = env.optional("SENTRY_ENVIRONMENT");
        let sentry_sample_rate = env
            .optional("SENTRY_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);
        let sentry_traces_sample_rate = env
            .optional("SENTRY_TRACES_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);
        let tls = TlsConfig::from_lookup(&env)?;

        Ok(Self {
            host,
            port,
            base_url,
            backends: BackendUrls {
                catalog,
                report,
                auth,
            },
            detail_strategy,
            backend_timeout: Duration::from_secs(timeout_secs),
            bulk_timeout: Duration::from_secs(bulk_timeout_secs),
            session_hours,
            sentry_dsn,
            sentry_environment,
            sentry_sample_rate,
            sentry_traces_sample_rate,
            tls,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether the panel is served over HTTPS.
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

struct Env<'a>(&'a dyn Fn(&str) -> Option<String>);

impl Env<'_> {
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|s| !s.trim().is_empty())
    }

    fn required(&self, key: &str) -> Result<String, ConfigError> {
        self.optional(key)
            .ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
    }

    fn parsed<T>(&self, key: &str, default: &str) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        self.optional(key)
            .unwrap_or_else(|| default.to_string())
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
    }

    fn positive_secs(&self, key: &str, default: u64) -> Result<u64, ConfigError> {
        let secs: u64 = self.parsed(key, &default.to_string())?;
        if secs == 0 {
            return Err(ConfigError::InvalidEnvVar(
                key.to_string(),
                "must be a positive number of seconds".to_string(),
            ));
        }
        Ok(secs)
    }
}

/// Validate an http(s) URL and strip any trailing slash.
fn normalize_url(key: &str, raw: &str) -> Result<String, ConfigError> {
    let parsed = url::Url::parse(raw.trim())
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("unsupported scheme `{}`", parsed.scheme()),
        ));
    }

    Ok(parsed.as_str().trim_end_matches('/').to_string())
}
