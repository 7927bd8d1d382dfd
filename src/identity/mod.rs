//! Bearer token validation against the identity gateway

use crate::config::OAuthGatewayConfig;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Identity resolved from a valid bearer token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    pub id: String,
    pub username: String,
    pub email: String,
    pub roles: Vec<String>,
}

/// Resolves a bearer token to a user. Every failure collapses to `None`.
#[async_trait]
pub trait TokenValidator: Send + Sync {
    async fn validate(&self, token: &str) -> Option<AuthenticatedUser>;
}

#[derive(Debug, Default, Deserialize)]
struct RealmAccess {
    #[serde(default)]
    roles: Vec<String>,
}

/// Body returned by `POST /api/v1/validate`
#[derive(Debug, Deserialize)]
struct ValidateResponse {
    #[serde(default)]
    active: bool,
    #[serde(default)]
    sub: Option<String>,
    #[serde(default)]
    username: Option<String>,
    #[serde(default)]
    preferred_username: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    realm_access: Option<RealmAccess>,
}

impl From<ValidateResponse> for AuthenticatedUser {
    fn from(body: ValidateResponse) -> Self {
        Self {
            id: body.sub.unwrap_or_default(),
            username: body
                .username
                .or(body.preferred_username)
                .unwrap_or_default(),
            email: body.email.unwrap_or_default(),
            roles: body.realm_access.unwrap_or_default().roles,
        }
    }
}

#[derive(Debug, Error)]
enum GatewayError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("gateway responded {0}")]
    Status(reqwest::StatusCode),
    #[error("undecodable response body: {0}")]
    Decode(reqwest::Error),
    #[error("token is not active")]
    Inactive,
}

impl GatewayError {
    fn outcome(&self) -> &'static str {
        match self {
            GatewayError::Transport(_) => "unreachable",
            GatewayError::Status(_) => "rejected",
            GatewayError::Decode(_) => "malformed",
            GatewayError::Inactive => "inactive",
        }
    }
}

/// HTTP client for the identity gateway's token validation endpoint
#[derive(Clone)]
pub struct GatewayTokenValidator {
    http_client: Client,
    validate_url: String,
}

impl GatewayTokenValidator {
    pub fn new(config: &OAuthGatewayConfig) -> anyhow::Result<Self> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http_client,
            validate_url: config.validate_url(),
        })
    }

    async fn introspect(&self, token: &str) -> Result<AuthenticatedUser, GatewayError> {
        let response = self
            .http_client
            .post(&self.validate_url)
            .bearer_auth(token)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(GatewayError::Status(response.status()));
        }

        let body: ValidateResponse = response.json().await.map_err(GatewayError::Decode)?;
        if !body.active {
            return Err(GatewayError::Inactive);
        }
        Ok(body.into())
    }
}

#[async_trait]
impl TokenValidator for GatewayTokenValidator {
    async fn validate(&self, token: &str) -> Option<AuthenticatedUser> {
        let token = strip_bearer(token);
        if token.is_empty() {
            return None;
        }

        match self.introspect(token).await {
            Ok(user) => {
                metrics::counter!("students_token_validations_total", "outcome" => "valid")
                    .increment(1);
                Some(user)
            }
            Err(e) => {
                metrics::counter!("students_token_validations_total", "outcome" => e.outcome())
                    .increment(1);
                match e {
                    GatewayError::Transport(_) | GatewayError::Decode(_) => {
                        tracing::warn!("Token validation failed: {}", e)
                    }
                    _ => tracing::debug!("Token rejected: {}", e),
                }
                None
            }
        }
    }
}

/// Drop a leading `Bearer ` scheme if the caller forwarded the raw header value.
fn strip_bearer(token: &str) -> &str {
    let token = token.trim();
    match token.get(..7) {
        Some(scheme) if scheme.eq_ignore_ascii_case("bearer ") => token[7..].trim_start(),
        _ => token,
    }
}
