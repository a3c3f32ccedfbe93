//! # Dashboard API Handlers
//!
//! "Today" is the server's local date.

use axum::{extract::State, response::Json};
use chrono::Local;

use crate::auth::CurrentUser;
use crate::error::ApiError;
use crate::server::AppState;
use crate::services::DashboardService;
use crate::services::dashboard::{DashboardStats, WeeklyEntry};

#[utoipa::path(
    get,
    path = "/api/dashboard/stats",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Today's attendance figures", body = DashboardStats),
        (status = 401, description = "Unauthorized", body = ApiError)
    ),
    tag = "dashboard"
)]
pub async fn stats(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<DashboardStats>, ApiError> {
    let today = Local::now().date_naive();
    let stats = DashboardService::new(&state.db)
        .stats_for(user.company_id, today)
        .await?;
    Ok(Json(stats))
}

#[utoipa::path(
    get,
    path = "/api/dashboard/weekly",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Seven days ending today, oldest first", body = [WeeklyEntry]),
        (status = 401, description = "Unauthorized", body = ApiError)
    ),
    tag = "dashboard"
)]
pub async fn weekly(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<WeeklyEntry>>, ApiError> {
    let today = Local::now().date_naive();
    let weekly = DashboardService::new(&state.db)
        .weekly_for(user.company_id, today)
        .await?;
    Ok(Json(weekly))
}
