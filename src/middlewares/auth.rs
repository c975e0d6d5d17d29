use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::Response,
};

use crate::error::AppError;
use crate::services::AuthService;
use crate::state::AppState;

/// Caller identity established from a bearer token
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: i64,
    pub email: String,
    pub admin: bool,
}

/// `async fn handler(user: AuthUser, ...)` picks up the identity set by `auth_middleware`
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .ok_or(AppError::Unauthorized)
    }
}

/// Validates the bearer token and checks that its user still exists and is active
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or(AppError::Unauthorized)?;

    let claims = AuthService::verify_token(token, &state.config)?;

    let user = state
        .stores
        .users
        .find_by_id(claims.sub)
        .await?
        .filter(|u| u.active)
        .ok_or_else(|| {
            tracing::debug!(user_id = claims.sub, "Token for unknown or inactive user");
            AppError::Unauthorized
        })?;

    request.extensions_mut().insert(AuthUser {
        id: user.id,
        email: user.email,
        admin: user.admin,
    });

    Ok(next.run(request).await)
}
