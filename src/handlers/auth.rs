//! # Auth API Handlers

use axum::{extract::State, http::StatusCode, response::Json};

use crate::auth::CurrentUser;
use crate::error::{ApiError, ApiJson};
use crate::server::AppState;
use crate::services::AuthService;
use crate::services::auth::{LoginRequest, SignupRequest, TokenResponse, UserProfile};

/// Register a company and its first admin
#[utoipa::path(
    post,
    path = "/api/auth/signup",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "Company registered; admin token issued", body = TokenResponse),
        (status = 400, description = "Invalid input, company name or email already registered", body = ApiError)
    ),
    tag = "auth"
)]
pub async fn signup(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<SignupRequest>,
) -> Result<(StatusCode, Json<TokenResponse>), ApiError> {
    let response = AuthService::new(&state.db, &state.credentials)
        .signup(request)
        .await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// Log in to a company
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Token issued", body = TokenResponse),
        (status = 400, description = "Malformed request body", body = ApiError),
        (status = 401, description = "Invalid credentials", body = ApiError)
    ),
    tag = "auth"
)]
pub async fn login(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<LoginRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let response = AuthService::new(&state.db, &state.credentials)
        .login(request)
        .await?;
    Ok(Json(response))
}

/// Profile of the authenticated caller
#[utoipa::path(
    get,
    path = "/api/auth/me",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Caller profile", body = UserProfile),
        (status = 401, description = "Unauthorized", body = ApiError)
    ),
    tag = "auth"
)]
pub async fn me(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<UserProfile>, ApiError> {
    let profile = AuthService::new(&state.db, &state.credentials)
        .me(user)
        .await?;
    Ok(Json(profile))
}
