//! # Departments API Handlers
//!
//! Any member of a company may list departments; only admins change them.

use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
};

use crate::auth::{AdminUser, CurrentUser};
use crate::error::{ApiError, ApiJson, ApiPath};
use crate::server::AppState;
use crate::services::DepartmentService;
use crate::services::departments::{DepartmentRequest, DepartmentResponse};

#[utoipa::path(
    get,
    path = "/api/departments",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Departments, alphabetical", body = [DepartmentResponse]),
        (status = 401, description = "Unauthorized", body = ApiError)
    ),
    tag = "departments"
)]
pub async fn list_departments(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<DepartmentResponse>>, ApiError> {
    let departments = DepartmentService::new(&state.db)
        .list(user.company_id)
        .await?;
    Ok(Json(departments))
}

#[utoipa::path(
    post,
    path = "/api/departments",
    security(("bearer_auth" = [])),
    request_body = DepartmentRequest,
    responses(
        (status = 201, description = "Department created", body = DepartmentResponse),
        (status = 400, description = "Invalid input or department already exists", body = ApiError),
        (status = 401, description = "Unauthorized", body = ApiError),
        (status = 403, description = "Admin access required", body = ApiError)
    ),
    tag = "departments"
)]
pub async fn create_department(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    ApiJson(request): ApiJson<DepartmentRequest>,
) -> Result<(StatusCode, Json<DepartmentResponse>), ApiError> {
    let department = DepartmentService::new(&state.db)
        .create(admin.company_id, request)
        .await?;
    Ok((StatusCode::CREATED, Json(department)))
}

#[utoipa::path(
    put,
    path = "/api/departments/{id}",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Department id")),
    request_body = DepartmentRequest,
    responses(
        (status = 200, description = "Department renamed", body = DepartmentResponse),
        (status = 400, description = "Invalid input or name already exists", body = ApiError),
        (status = 401, description = "Unauthorized", body = ApiError),
        (status = 403, description = "Admin access required", body = ApiError),
        (status = 404, description = "Department not found", body = ApiError)
    ),
    tag = "departments"
)]
pub async fn update_department(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    ApiPath(id): ApiPath<i32>,
    ApiJson(request): ApiJson<DepartmentRequest>,
) -> Result<Json<DepartmentResponse>, ApiError> {
    let department = DepartmentService::new(&state.db)
        .update(admin.company_id, id, request)
        .await?;
    Ok(Json(department))
}

/// Delete a department; its students and users are kept without one
#[utoipa::path(
    delete,
    path = "/api/departments/{id}",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Department id")),
    responses(
        (status = 204, description = "Department deleted"),
        (status = 401, description = "Unauthorized", body = ApiError),
        (status = 403, description = "Admin access required", body = ApiError),
        (status = 404, description = "Department not found", body = ApiError)
    ),
    tag = "departments"
)]
pub async fn delete_department(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    ApiPath(id): ApiPath<i32>,
) -> Result<StatusCode, ApiError> {
    DepartmentService::new(&state.db)
        .delete(admin.company_id, id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
