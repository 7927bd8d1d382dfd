//! REST API handlers and shared response helpers

pub mod health;
pub mod phone_number;
pub mod student;

use axum::http::{header, HeaderMap, HeaderValue};

/// Prefix shared by every versioned route
pub const API_PREFIX: &str = "/api/v1";

/// Build a `Location` header for a created resource.
pub(crate) fn location(path: String) -> HeaderMap {
    let mut headers = HeaderMap::new();
    if let Ok(value) = HeaderValue::from_str(&path) {
        headers.insert(header::LOCATION, value);
    }
    headers
}

pub(crate) fn student_path(id: impl std::fmt::Display) -> String {
    format!("{}/students/{}", API_PREFIX, id)
}
