//! # Authentication and Authorization
//!
//! Resolves the caller from a bearer token and gates admin-only routes.
//! Every protected route sits behind [`auth_middleware`]; handlers then take
//! [`CurrentUser`] or [`AdminUser`] and derive the tenant scope from it.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{HeaderMap, header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::Response,
};
use sea_orm::ConnectionTrait;

use crate::credentials::CredentialService;
use crate::error::{ApiError, ServiceError, ServiceResult, unauthorized};
use crate::models::user;
use crate::repositories::UserRepository;
use crate::server::AppState;

/// The authenticated caller, inserted into request extensions by [`auth_middleware`].
#[derive(Debug, Clone)]
pub struct CurrentUser(pub user::Model);

/// An authenticated caller with the admin role.
#[derive(Debug, Clone)]
pub struct AdminUser(pub user::Model);

/// Load the account a token was issued for.
///
/// Fails with `Authentication` if the token is invalid, expired, or names a
/// user that no longer exists.
pub async fn resolve_identity<C: ConnectionTrait>(
    db: &C,
    credentials: &CredentialService,
    token: &str,
) -> ServiceResult<user::Model> {
    let user_id = credentials.validate_token(token).map_err(|error| {
        tracing::debug!(%error, "Rejected bearer token");
        ServiceError::Authentication
    })?;

    UserRepository::new(db)
        .find_by_id(user_id)
        .await?
        .ok_or_else(|| {
            tracing::debug!(user_id, "Token subject no longer exists");
            ServiceError::Authentication
        })
}

/// Pass `user` through only if it is an admin.
pub fn require_admin(user: user::Model) -> ServiceResult<user::Model> {
    if user.is_admin() {
        Ok(user)
    } else {
        Err(ServiceError::Authorization)
    }
}

fn extract_bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();

    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

/// Authentication middleware: resolves the caller or answers 401.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_bearer_token(request.headers()).ok_or_else(unauthorized)?;
    let user = resolve_identity(&state.db, &state.credentials, token).await?;

    tracing::debug!(
        user_id = user.id,
        company_id = user.company_id,
        "Authenticated request"
    );
    request.extensions_mut().insert(CurrentUser(user));

    Ok(next.run(request).await)
}

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or_else(unauthorized)
    }
}

impl<S> FromRequestParts<S> for AdminUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let CurrentUser(user) = CurrentUser::from_request_parts(parts, state).await?;
        Ok(AdminUser(require_admin(user)?))
    }
}
