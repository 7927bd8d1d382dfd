//! Phone number sub-resource handlers
//!
//! Phone numbers have no identity of their own; `{index}` is the zero-based
//! position in the student's list at request time.

use crate::api::{location, student_path};
use crate::domain::{PatchPhoneNumberInput, PhoneNumber, StringUuid};
use crate::error::Result;
use crate::middleware::auth::AuthUser;
use crate::state::HasServices;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

#[utoipa::path(
    post,
    path = "/api/v1/students/{id}/phone-numbers",
    tag = "Phone Numbers",
    params(("id" = String, Path, description = "Student id")),
    request_body = PhoneNumber,
    responses(
        (status = 201, description = "Appended; Location points at the new index", body = PhoneNumber),
        (status = 404, description = "Student not found")
    )
)]
/// Append a phone number
pub async fn add<S: HasServices>(
    State(state): State<S>,
    _auth: AuthUser,
    Path(student_id): Path<StringUuid>,
    Json(phone): Json<PhoneNumber>,
) -> Result<impl IntoResponse> {
    let (index, phone) = state
        .student_service()
        .add_phone_number(student_id, phone)
        .await?;

    let path = format!("{}/phone-numbers/{}", student_path(student_id), index);
    Ok((StatusCode::CREATED, location(path), Json(phone)))
}

#[utoipa::path(
    get,
    path = "/api/v1/students/{id}/phone-numbers",
    tag = "Phone Numbers",
    params(("id" = String, Path, description = "Student id")),
    responses(
        (status = 200, description = "Phone numbers in order", body = Vec<PhoneNumber>),
        (status = 404, description = "Student not found")
    )
)]
/// List a student's phone numbers
pub async fn list<S: HasServices>(
    State(state): State<S>,
    _auth: AuthUser,
    Path(student_id): Path<StringUuid>,
) -> Result<impl IntoResponse> {
    let phones = state
        .student_service()
        .list_phone_numbers(student_id)
        .await?;
    Ok(Json(phones))
}

#[utoipa::path(
    get,
    path = "/api/v1/students/{id}/phone-numbers/{index}",
    tag = "Phone Numbers",
    params(
        ("id" = String, Path, description = "Student id"),
        ("index" = i64, Path, description = "Zero-based position")
    ),
    responses(
        (status = 200, description = "Phone number", body = PhoneNumber),
        (status = 404, description = "Student or position not found")
    )
)]
/// Get the phone number at a position
pub async fn get<S: HasServices>(
    State(state): State<S>,
    _auth: AuthUser,
    Path((student_id, index)): Path<(StringUuid, i64)>,
) -> Result<impl IntoResponse> {
    let phone = state
        .student_service()
        .get_phone_number(student_id, index)
        .await?;
    Ok(Json(phone))
}

#[utoipa::path(
    put,
    path = "/api/v1/students/{id}/phone-numbers/{index}",
    tag = "Phone Numbers",
    params(
        ("id" = String, Path, description = "Student id"),
        ("index" = i64, Path, description = "Zero-based position")
    ),
    request_body = PhoneNumber,
    responses(
        (status = 200, description = "Replaced", body = PhoneNumber),
        (status = 404, description = "Student or position not found")
    )
)]
/// Replace the phone number at a position
pub async fn replace<S: HasServices>(
    State(state): State<S>,
    _auth: AuthUser,
    Path((student_id, index)): Path<(StringUuid, i64)>,
    Json(phone): Json<PhoneNumber>,
) -> Result<impl IntoResponse> {
    let phone = state
        .student_service()
        .replace_phone_number(student_id, index, phone)
        .await?;
    Ok(Json(phone))
}

#[utoipa::path(
    patch,
    path = "/api/v1/students/{id}/phone-numbers/{index}",
    tag = "Phone Numbers",
    params(
        ("id" = String, Path, description = "Student id"),
        ("index" = i64, Path, description = "Zero-based position")
    ),
    request_body = PatchPhoneNumberInput,
    responses(
        (status = 200, description = "Merged; zero or omitted ddd/number keep their value", body = PhoneNumber),
        (status = 404, description = "Student or position not found")
    )
)]
/// Merge a partial update into the phone number at a position
pub async fn merge<S: HasServices>(
    State(state): State<S>,
    _auth: AuthUser,
    Path((student_id, index)): Path<(StringUuid, i64)>,
    Json(patch): Json<PatchPhoneNumberInput>,
) -> Result<impl IntoResponse> {
    let phone = state
        .student_service()
        .merge_phone_number(student_id, index, patch)
        .await?;
    Ok(Json(phone))
}

#[utoipa::path(
    delete,
    path = "/api/v1/students/{id}/phone-numbers/{index}",
    tag = "Phone Numbers",
    params(
        ("id" = String, Path, description = "Student id"),
        ("index" = i64, Path, description = "Zero-based position")
    ),
    responses(
        (status = 204, description = "Removed; later positions shift down"),
        (status = 404, description = "Student or position not found")
    )
)]
/// Remove the phone number at a position
pub async fn remove<S: HasServices>(
    State(state): State<S>,
    _auth: AuthUser,
    Path((student_id, index)): Path<(StringUuid, i64)>,
) -> Result<impl IntoResponse> {
    state
        .student_service()
        .remove_phone_number(student_id, index)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
