use axum::extract::{FromRequestParts, OptionalFromRequestParts};
use axum::http::request::Parts;
use sea_orm::EntityTrait;

use crate::auth::jwt::{self, TokenKind};
use crate::entities::user;
use crate::error::AppError;
use crate::permissions;
use crate::state::AppState;

/// Authenticated, active user extracted from the `Authorization: Bearer <token>` header.
///
/// ```ignore
/// async fn handler(AuthUser(user): AuthUser) -> impl IntoResponse { ... }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser(pub user::Model);

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::Unauthorized("Missing authorization header.".to_string()))?;

        let token = header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::Unauthorized("Invalid authorization header format.".to_string())
        })?;

        let claims = jwt::decode_token(token, &state.config.jwt_secret, TokenKind::Access)
            .map_err(|_| AppError::Unauthorized("Invalid or expired token.".to_string()))?;

        let user_model = user::Entity::find_by_id(claims.sub)
            .one(&state.db)
            .await?
            .ok_or_else(|| AppError::Unauthorized("User not found.".to_string()))?;

        if !user_model.is_active {
            return Err(AppError::Forbidden("Account is not active.".to_string()));
        }

        Ok(Self(user_model))
    }
}

/// `Option<AuthUser>`: anonymous when no `Authorization` header is sent, but a header
/// that is present must still be valid.
impl OptionalFromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Option<Self>, Self::Rejection> {
        if !parts.headers.contains_key("authorization") {
            return Ok(None);
        }
        <Self as FromRequestParts<AppState>>::from_request_parts(parts, state)
            .await
            .map(Some)
    }
}

/// Requires a staff member or superuser; anyone else is sent to their landing page.
#[derive(Debug, Clone)]
pub struct StaffUser(pub user::Model);

impl FromRequestParts<AppState> for StaffUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let AuthUser(user_model) =
            <AuthUser as FromRequestParts<AppState>>::from_request_parts(parts, state).await?;

        if !user_model.is_privileged() {
            return Err(permissions::deny(
                &user_model,
                "You don't have permission to access the administration area.",
            ));
        }

        Ok(Self(user_model))
    }
}

/// Requires a superuser.
#[derive(Debug, Clone)]
pub struct Superuser(pub user::Model);

impl FromRequestParts<AppState> for Superuser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let AuthUser(user_model) =
            <AuthUser as FromRequestParts<AppState>>::from_request_parts(parts, state).await?;

        if !user_model.is_superuser {
            return Err(permissions::deny(
                &user_model,
                "Only a superuser can do that.",
            ));
        }

        Ok(Self(user_model))
    }
}
