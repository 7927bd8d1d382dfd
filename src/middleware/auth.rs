//! Bearer token authentication extractor

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::identity::{AuthenticatedUser, TokenValidator};
use crate::state::HasServices;

/// Message returned for every authentication failure, whatever the cause
pub const UNAUTHORIZED_MESSAGE: &str = "Missing or invalid bearer token";

/// Authenticated caller, resolved through the configured [`TokenValidator`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthUser {
    pub user_id: String,
    pub username: String,
    pub email: String,
    pub roles: Vec<String>,
}

impl From<AuthenticatedUser> for AuthUser {
    fn from(user: AuthenticatedUser) -> Self {
        Self {
            user_id: user.id,
            username: user.username,
            email: user.email,
            roles: user.roles,
        }
    }
}

/// Authentication failures. All variants render the same 401 body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// No Authorization header present
    MissingToken,
    /// Header is not valid `Bearer <token>`
    InvalidHeader,
    /// Validator did not accept the token
    InvalidToken,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        tracing::debug!(reason = ?self, "Rejecting unauthenticated request");
        AppError::Unauthorized(UNAUTHORIZED_MESSAGE.to_string()).into_response()
    }
}

/// Extract the token from an `Authorization: Bearer <token>` header
fn extract_bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let auth_header = headers
        .get(AUTHORIZATION)
        .ok_or(AuthError::MissingToken)?
        .to_str()
        .map_err(|_| AuthError::InvalidHeader)?;

    // The scheme name is case-insensitive.
    let token = match auth_header.get(..7) {
        Some(scheme) if scheme.eq_ignore_ascii_case("bearer ") => auth_header[7..].trim(),
        _ => return Err(AuthError::InvalidHeader),
    };

    if token.is_empty() {
        return Err(AuthError::InvalidHeader);
    }
    Ok(token)
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: HasServices + Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = extract_bearer_token(&parts.headers)?;

        state
            .token_validator()
            .validate(token)
            .await
            .map(AuthUser::from)
            .ok_or(AuthError::InvalidToken)
    }
}
