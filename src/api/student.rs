//! Student API handlers

use crate::api::{location, student_path};
use crate::domain::{CreateStudentInput, StringUuid, Student, StudentFilter, UpdateStudentInput};
use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::state::HasServices;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use tracing::info;
use validator::Validate;

#[utoipa::path(
    post,
    path = "/api/v1/students",
    tag = "Students",
    request_body = CreateStudentInput,
    responses(
        (status = 201, description = "Student created", body = Student),
        (status = 401, description = "Missing or invalid bearer token"),
        (status = 409, description = "Enrollment or email already in use"),
        (status = 422, description = "Invalid fields")
    )
)]
/// Create a student
pub async fn create<S: HasServices>(
    State(state): State<S>,
    auth: AuthUser,
    Json(input): Json<CreateStudentInput>,
) -> Result<impl IntoResponse> {
    input.validate()?;
    let student = state.student_service().create(input).await?;
    info!(student_id = %student.id, actor = %auth.user_id, "Student created");

    Ok((
        StatusCode::CREATED,
        location(student_path(student.id)),
        Json(student),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/students",
    tag = "Students",
    params(StudentFilter),
    responses(
        (status = 200, description = "Matching students", body = Vec<Student>),
        (status = 401, description = "Missing or invalid bearer token")
    )
)]
/// List students, optionally filtered by name substring, enrollment or email
pub async fn list<S: HasServices>(
    State(state): State<S>,
    _auth: AuthUser,
    Query(filter): Query<StudentFilter>,
) -> Result<impl IntoResponse> {
    let students = state.student_service().list(filter).await?;
    Ok(Json(students))
}

#[utoipa::path(
    get,
    path = "/api/v1/students/{id}",
    tag = "Students",
    params(("id" = String, Path, description = "Student id")),
    responses(
        (status = 200, description = "Student", body = Student),
        (status = 404, description = "Student not found")
    )
)]
/// Get a student by id
pub async fn get<S: HasServices>(
    State(state): State<S>,
    _auth: AuthUser,
    Path(id): Path<StringUuid>,
) -> Result<impl IntoResponse> {
    let student = state.student_service().get(id).await?;
    Ok(Json(student))
}

#[utoipa::path(
    put,
    path = "/api/v1/students/{id}",
    tag = "Students",
    params(("id" = String, Path, description = "Student id")),
    request_body = UpdateStudentInput,
    responses(
        (status = 204, description = "Updated, or nothing to update"),
        (status = 409, description = "Enrollment or email already in use"),
        (status = 422, description = "Invalid fields")
    )
)]
/// Update a student. Omitted or null fields keep their value; an unknown id is ignored.
pub async fn update<S: HasServices>(
    State(state): State<S>,
    _auth: AuthUser,
    Path(id): Path<StringUuid>,
    Json(input): Json<UpdateStudentInput>,
) -> Result<impl IntoResponse> {
    input.validate()?;
    state.student_service().update(id, input).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    patch,
    path = "/api/v1/students/{id}",
    tag = "Students",
    params(("id" = String, Path, description = "Student id")),
    request_body = UpdateStudentInput,
    responses(
        (status = 204, description = "Updated"),
        (status = 404, description = "Student not found"),
        (status = 409, description = "Enrollment or email already in use"),
        (status = 422, description = "Invalid fields")
    )
)]
/// Partially update a student, reporting an unknown id
pub async fn patch<S: HasServices>(
    State(state): State<S>,
    _auth: AuthUser,
    Path(id): Path<StringUuid>,
    Json(input): Json<UpdateStudentInput>,
) -> Result<impl IntoResponse> {
    input.validate()?;
    state
        .student_service()
        .update(id, input)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Student {} not found", id)))?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    delete,
    path = "/api/v1/students/{id}",
    tag = "Students",
    params(("id" = String, Path, description = "Student id")),
    responses(
        (status = 204, description = "Deleted, or already absent")
    )
)]
/// Delete a student
pub async fn delete<S: HasServices>(
    State(state): State<S>,
    auth: AuthUser,
    Path(id): Path<StringUuid>,
) -> Result<impl IntoResponse> {
    state.student_service().delete(id).await?;
    info!(student_id = %id, actor = %auth.user_id, "Student deleted");
    Ok(StatusCode::NO_CONTENT)
}
