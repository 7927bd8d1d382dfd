//! HTTP middleware
//!
//! - `AuthUser` extractor backed by the token validator
//! - request id propagation and HTTP metrics
//! - JSON normalization of framework error responses
//! - log-safe request spans

pub mod auth;
pub mod error_response;
pub mod metrics;
pub mod trace;

pub use auth::AuthUser;
pub use error_response::normalize_error_response;
pub use metrics::ObservabilityLayer;
pub use trace::SanitizedMakeSpan;
