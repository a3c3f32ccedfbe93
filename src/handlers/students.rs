//! # Students API Handlers

use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
};

use crate::auth::CurrentUser;
use crate::error::{ApiError, ApiJson, ApiPath};
use crate::server::AppState;
use crate::services::StudentService;
use crate::services::students::{StudentRequest, StudentResponse};

/// List the company's students, newest first
#[utoipa::path(
    get,
    path = "/api/students",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Students of the caller's company", body = [StudentResponse]),
        (status = 401, description = "Unauthorized", body = ApiError)
    ),
    tag = "students"
)]
pub async fn list_students(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<StudentResponse>>, ApiError> {
    let students = StudentService::new(&state.db).list(user.company_id).await?;
    Ok(Json(students))
}

#[utoipa::path(
    post,
    path = "/api/students",
    security(("bearer_auth" = [])),
    request_body = StudentRequest,
    responses(
        (status = 201, description = "Student created", body = StudentResponse),
        (status = 400, description = "Invalid input or roll number already exists", body = ApiError),
        (status = 401, description = "Unauthorized", body = ApiError)
    ),
    tag = "students"
)]
pub async fn create_student(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ApiJson(request): ApiJson<StudentRequest>,
) -> Result<(StatusCode, Json<StudentResponse>), ApiError> {
    let student = StudentService::new(&state.db)
        .create(user.company_id, request)
        .await?;
    Ok((StatusCode::CREATED, Json(student)))
}

#[utoipa::path(
    put,
    path = "/api/students/{id}",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Student id")),
    request_body = StudentRequest,
    responses(
        (status = 200, description = "Student updated", body = StudentResponse),
        (status = 400, description = "Invalid input or roll number already exists", body = ApiError),
        (status = 401, description = "Unauthorized", body = ApiError),
        (status = 404, description = "Student not found", body = ApiError)
    ),
    tag = "students"
)]
pub async fn update_student(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ApiPath(id): ApiPath<i32>,
    ApiJson(request): ApiJson<StudentRequest>,
) -> Result<Json<StudentResponse>, ApiError> {
    let student = StudentService::new(&state.db)
        .update(user.company_id, id, request)
        .await?;
    Ok(Json(student))
}

#[utoipa::path(
    delete,
    path = "/api/students/{id}",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Student id")),
    responses(
        (status = 204, description = "Student deleted"),
        (status = 401, description = "Unauthorized", body = ApiError),
        (status = 404, description = "Student not found", body = ApiError)
    ),
    tag = "students"
)]
pub async fn delete_student(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ApiPath(id): ApiPath<i32>,
) -> Result<StatusCode, ApiError> {
    StudentService::new(&state.db)
        .delete(user.company_id, id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
