//! # Employees API Handlers
//!
//! Admin-only management of employee accounts.

use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
};

use crate::auth::AdminUser;
use crate::error::{ApiError, ApiJson, ApiPath};
use crate::server::AppState;
use crate::services::EmployeeService;
use crate::services::employees::{EmployeeRequest, EmployeeResponse};

#[utoipa::path(
    get,
    path = "/api/employees",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Employees, newest first", body = [EmployeeResponse]),
        (status = 401, description = "Unauthorized", body = ApiError),
        (status = 403, description = "Admin access required", body = ApiError)
    ),
    tag = "employees"
)]
pub async fn list_employees(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
) -> Result<Json<Vec<EmployeeResponse>>, ApiError> {
    let employees = EmployeeService::new(&state.db, &state.credentials)
        .list(admin.company_id)
        .await?;
    Ok(Json(employees))
}

/// Create an employee; the response carries the generated password once
#[utoipa::path(
    post,
    path = "/api/employees",
    security(("bearer_auth" = [])),
    request_body = EmployeeRequest,
    responses(
        (status = 201, description = "Employee created", body = EmployeeResponse),
        (status = 400, description = "Invalid input, unknown department or email in use", body = ApiError),
        (status = 401, description = "Unauthorized", body = ApiError),
        (status = 403, description = "Admin access required", body = ApiError)
    ),
    tag = "employees"
)]
pub async fn create_employee(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    ApiJson(request): ApiJson<EmployeeRequest>,
) -> Result<(StatusCode, Json<EmployeeResponse>), ApiError> {
    let employee = EmployeeService::new(&state.db, &state.credentials)
        .create(admin.company_id, request)
        .await?;
    Ok((StatusCode::CREATED, Json(employee)))
}

#[utoipa::path(
    delete,
    path = "/api/employees/{id}",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Employee user id")),
    responses(
        (status = 204, description = "Employee deleted"),
        (status = 401, description = "Unauthorized", body = ApiError),
        (status = 403, description = "Admin access required", body = ApiError),
        (status = 404, description = "Employee not found", body = ApiError)
    ),
    tag = "employees"
)]
pub async fn delete_employee(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    ApiPath(id): ApiPath<i32>,
) -> Result<StatusCode, ApiError> {
    EmployeeService::new(&state.db, &state.credentials)
        .delete(admin.company_id, id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
