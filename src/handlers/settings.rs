//! # Settings API Handlers

use axum::{extract::State, response::Json};

use crate::auth::{AdminUser, CurrentUser};
use crate::error::{ApiError, ApiJson};
use crate::server::AppState;
use crate::services::SettingsService;
use crate::services::settings::{SettingsResponse, SettingsUpdateRequest};

#[utoipa::path(
    get,
    path = "/api/settings",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Company theme and labels", body = SettingsResponse),
        (status = 401, description = "Unauthorized", body = ApiError)
    ),
    tag = "settings"
)]
pub async fn get_settings(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<SettingsResponse>, ApiError> {
    let settings = SettingsService::new(&state.db).get(user.company_id).await?;
    Ok(Json(settings))
}

/// Partially update theme and labels
#[utoipa::path(
    put,
    path = "/api/settings",
    security(("bearer_auth" = [])),
    request_body = SettingsUpdateRequest,
    responses(
        (status = 200, description = "Updated settings", body = SettingsResponse),
        (status = 400, description = "Unknown theme or malformed labels", body = ApiError),
        (status = 401, description = "Unauthorized", body = ApiError),
        (status = 403, description = "Admin access required", body = ApiError)
    ),
    tag = "settings"
)]
pub async fn update_settings(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    ApiJson(request): ApiJson<SettingsUpdateRequest>,
) -> Result<Json<SettingsResponse>, ApiError> {
    let settings = SettingsService::new(&state.db)
        .update(admin.company_id, request)
        .await?;
    Ok(Json(settings))
}
