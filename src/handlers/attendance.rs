//! # Attendance API Handlers

use axum::{
    extract::{Query, State, rejection::QueryRejection},
    http::StatusCode,
    response::Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::IntoParams;

use crate::auth::CurrentUser;
use crate::error::{ApiError, ApiJson, rejected_input};
use crate::server::AppState;
use crate::services::AttendanceService;
use crate::services::attendance::{AttendanceResponse, MarkAttendanceRequest};

/// Query parameters for attendance listing
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AttendanceQuery {
    /// Only records for this day (`YYYY-MM-DD`); all days when omitted
    #[param(value_type = Option<String>, format = Date)]
    pub date: Option<NaiveDate>,
}

/// Replace the roster for a day
#[utoipa::path(
    post,
    path = "/api/attendance",
    security(("bearer_auth" = [])),
    request_body = MarkAttendanceRequest,
    responses(
        (status = 201, description = "Roster stored", body = [AttendanceResponse]),
        (status = 400, description = "Invalid input or student listed twice", body = ApiError),
        (status = 401, description = "Unauthorized", body = ApiError),
        (status = 404, description = "A student does not exist in this company", body = ApiError)
    ),
    tag = "attendance"
)]
pub async fn mark_attendance(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ApiJson(request): ApiJson<MarkAttendanceRequest>,
) -> Result<(StatusCode, Json<Vec<AttendanceResponse>>), ApiError> {
    let records = AttendanceService::new(&state.db)
        .mark_bulk(user.company_id, request)
        .await?;
    Ok((StatusCode::CREATED, Json(records)))
}

#[utoipa::path(
    get,
    path = "/api/attendance",
    security(("bearer_auth" = [])),
    params(AttendanceQuery),
    responses(
        (status = 200, description = "Attendance records, newest date first", body = [AttendanceResponse]),
        (status = 400, description = "Invalid date", body = ApiError),
        (status = 401, description = "Unauthorized", body = ApiError)
    ),
    tag = "attendance"
)]
pub async fn list_attendance(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    query: Result<Query<AttendanceQuery>, QueryRejection>,
) -> Result<Json<Vec<AttendanceResponse>>, ApiError> {
    let Query(query) = query.map_err(|rejection| {
        rejected_input("query", &format!("Invalid query: {}", rejection.body_text()))
    })?;

    let records = AttendanceService::new(&state.db)
        .list(user.company_id, query.date)
        .await?;
    Ok(Json(records))
}

/// The 200 most recent records
#[utoipa::path(
    get,
    path = "/api/attendance/history",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Recent attendance records, newest first", body = [AttendanceResponse]),
        (status = 401, description = "Unauthorized", body = ApiError)
    ),
    tag = "attendance"
)]
pub async fn attendance_history(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<AttendanceResponse>>, ApiError> {
    let records = AttendanceService::new(&state.db)
        .history(user.company_id)
        .await?;
    Ok(Json(records))
}
