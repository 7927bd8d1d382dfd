//! Configuration management for the student records service

use anyhow::{Context, Result};
use std::env;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server host
    pub http_host: String,
    /// HTTP server port
    pub http_port: u16,
    /// Deployment environment (`production` hides the Swagger UI)
    pub environment: String,
    /// Database configuration
    pub database: DatabaseConfig,
    /// Identity gateway used to validate bearer tokens
    pub oauth: OAuthGatewayConfig,
    /// Logging and metrics
    pub telemetry: TelemetryConfig,
    /// Allowed CORS origins. Empty means permissive outside production.
    pub cors_allowed_origins: Vec<String>,
    /// Per-request timeout
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_secs: u64,
}

#[derive(Debug, Clone)]
pub struct OAuthGatewayConfig {
    /// Gateway base URL, e.g. `http://oauth:8000`
    pub base_url: String,
    pub timeout_secs: u64,
}

impl OAuthGatewayConfig {
    pub fn validate_url(&self) -> String {
        format!("{}/api/v1/validate", self.base_url.trim_end_matches('/'))
    }
}

#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// `json` for structured logs, anything else for human-readable output
    pub log_format: String,
    pub metrics_enabled: bool,
}

impl TelemetryConfig {
    pub fn json_logs(&self) -> bool {
        self.log_format.eq_ignore_ascii_case("json")
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let oauth_base_url = match lookup("OAUTH_GATEWAY_URL") {
            Some(url) => url,
            None => format!(
                "{}://{}:{}",
                var("OAUTH_INTERNAL_PROTOCOL", "http"),
                var("OAUTH_INTERNAL_HOST", "oauth"),
                var("OAUTH_INTERNAL_API_PORT", "8000"),
            ),
        };
        url::Url::parse(&oauth_base_url)
            .with_context(|| format!("Invalid OAuth gateway URL: {}", oauth_base_url))?;

        Ok(Self {
            http_host: var("HTTP_HOST", "0.0.0.0"),
            http_port: var("HTTP_PORT", "8080")
                .parse()
                .context("Invalid HTTP_PORT")?,
            environment: var("APP_ENV", "development"),
            database: DatabaseConfig {
                url: lookup("DATABASE_URL").context("DATABASE_URL is required")?,
                max_connections: var("DATABASE_MAX_CONNECTIONS", "10").parse().unwrap_or(10),
                min_connections: var("DATABASE_MIN_CONNECTIONS", "2").parse().unwrap_or(2),
                acquire_timeout_secs: var("DATABASE_ACQUIRE_TIMEOUT_SECS", "5")
                    .parse()
                    .unwrap_or(5),
            },
            oauth: OAuthGatewayConfig {
                base_url: oauth_base_url,
                timeout_secs: var("OAUTH_TIMEOUT_SECS", "10").parse().unwrap_or(10),
            },
            telemetry: TelemetryConfig {
                log_format: var("LOG_FORMAT", "text"),
                metrics_enabled: var("METRICS_ENABLED", "true")
                    .parse()
                    .context("Invalid METRICS_ENABLED")?,
            },
            cors_allowed_origins: var("CORS_ALLOWED_ORIGINS", "")
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            request_timeout_secs: var("REQUEST_TIMEOUT_SECS", "30")
                .parse()
                .context("Invalid REQUEST_TIMEOUT_SECS")?,
        })
    }

    /// Get HTTP server address
    pub fn http_addr(&self) -> String {
        format!("{}:{}", self.http_host, self.http_port)
    }

    pub fn is_production(&self) -> bool {
        self.environment.eq_ignore_ascii_case("production")
    }
}
