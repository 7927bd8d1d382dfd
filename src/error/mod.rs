//! Unified error handling for the student records service

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Application-wide result type
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    /// Phone number position outside `[0, len)` of the owning student.
    #[error("Phone number index {index} out of range (len {len})")]
    IndexOutOfRange { index: i64, len: usize },

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Invalid input: {0}")]
    InvalidInput(#[from] validator::ValidationErrors),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// Error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let mut details = None;
        let (status, error_type, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg.clone()),
            AppError::IndexOutOfRange { .. } => (
                StatusCode::NOT_FOUND,
                "not_found",
                "Phone number not found".to_string(),
            ),
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "unauthorized", msg.clone()),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, "conflict", msg.clone()),
            AppError::InvalidInput(errors) => {
                details = Some(field_details(errors));
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "validation",
                    "One or more fields are invalid".to_string(),
                )
            }
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "database_error",
                    "A database error occurred".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = Json(ErrorResponse {
            error: error_type.to_string(),
            message,
            details,
        });

        (status, body).into_response()
    }
}

/// Flatten validator output into `{ "field": ["message", ...] }`, keyed by
/// the camelCase name the field has on the wire.
fn field_details(errors: &validator::ValidationErrors) -> serde_json::Value {
    let mut map = serde_json::Map::new();
    for (field, errs) in errors.field_errors() {
        let messages: Vec<serde_json::Value> = errs
            .iter()
            .map(|e| {
                let text = e
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| e.code.to_string());
                serde_json::Value::String(text)
            })
            .collect();
        map.insert(wire_name(&field), serde_json::Value::Array(messages));
    }
    serde_json::Value::Object(map)
}

fn wire_name(field: &str) -> String {
    let mut name = String::with_capacity(field.len());
    let mut upper = false;
    for c in field.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            name.push(c.to_ascii_uppercase());
            upper = false;
        } else {
            name.push(c);
        }
    }
    name
}

/// Translate a MySQL duplicate-key failure (error 1062) into `Conflict`,
/// naming the unique column when it can be recognised from the index name.
pub fn map_conflict_if_duplicate(error: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_err) = &error {
        if db_err.code().as_deref() == Some("1062") {
            let message = db_err.message();
            let field = if message.contains("enrollment") {
                "enrollment"
            } else if message.contains("email") {
                "email"
            } else {
                "unique field"
            };
            return AppError::Conflict(format!("A student with this {} already exists", field));
        }
    }
    AppError::Database(error)
}
