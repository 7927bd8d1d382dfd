//! Error response normalization middleware
//!
//! Framework rejections (malformed JSON, bad path parameters, unknown
//! methods) come back as `text/plain`. This rewrites every non-JSON 4xx/5xx
//! into the same `{ "error", "message" }` body `AppError` produces, without
//! echoing parser details.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// Paths that render their own bodies and are left untouched.
const PASSTHROUGH_PATHS: &[&str] = &["/health", "/ready", "/metrics"];

pub async fn normalize_error_response(request: Request<Body>, next: Next) -> Response {
    let passthrough = PASSTHROUGH_PATHS.contains(&request.uri().path());
    let response = next.run(request).await;

    let status = response.status();
    if passthrough || !(status.is_client_error() || status.is_server_error()) {
        return response;
    }

    let is_json = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.contains("application/json"));

    if is_json {
        return response;
    }

    generic_error_response(status)
}

fn generic_error_response(status: StatusCode) -> Response {
    let (error_type, message) = match status {
        StatusCode::BAD_REQUEST => ("bad_request", "Invalid request"),
        StatusCode::UNAUTHORIZED => ("unauthorized", "Authentication required"),
        StatusCode::NOT_FOUND => ("not_found", "Not found"),
        StatusCode::METHOD_NOT_ALLOWED => ("method_not_allowed", "Method not allowed"),
        StatusCode::CONFLICT => ("conflict", "Resource conflict"),
        StatusCode::PAYLOAD_TOO_LARGE => ("payload_too_large", "Request body too large"),
        StatusCode::UNSUPPORTED_MEDIA_TYPE => {
            ("unsupported_media_type", "Expected application/json")
        }
        StatusCode::UNPROCESSABLE_ENTITY => (
            "validation",
            "Request body does not match the expected shape",
        ),
        StatusCode::REQUEST_TIMEOUT => ("timeout", "Request timed out"),
        _ if status.is_client_error() => ("client_error", "Client error"),
        _ => ("internal_error", "An internal error occurred"),
    };

    let body = json!({
        "error": error_type,
        "message": message,
    });

    (status, axum::Json(body)).into_response()
}
