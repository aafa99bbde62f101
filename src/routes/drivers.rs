use axum::extract::State;
use axum::routing::{get, patch};
use axum::{Json, Router};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};

use crate::auth::middleware::AuthUser;
use crate::entities::{driver_profile, user};
use crate::error::AppError;
use crate::extract::ValidatedJson;
use crate::forms::AvailabilityForm;
use crate::permissions;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/me", get(me))
        .route("/me/availability", patch(set_availability))
}

/// The caller's driver profile, or a redirect for anyone who is not a driver.
async fn own_profile(
    db: &DatabaseConnection,
    user_model: &user::Model,
) -> Result<driver_profile::Model, AppError> {
    driver_profile::Entity::find()
        .filter(driver_profile::Column::UserId.eq(user_model.id))
        .one(db)
        .await?
        .ok_or_else(|| permissions::deny(user_model, "Only drivers have a driver profile."))
}

/// `GET /api/v1/drivers/me`
async fn me(
    State(state): State<AppState>,
    AuthUser(user_model): AuthUser,
) -> Result<Json<driver_profile::Model>, AppError> {
    Ok(Json(own_profile(&state.db, &user_model).await?))
}

/// `PATCH /api/v1/drivers/me/availability`
async fn set_availability(
    State(state): State<AppState>,
    AuthUser(user_model): AuthUser,
    ValidatedJson(form): ValidatedJson<AvailabilityForm>,
) -> Result<Json<driver_profile::Model>, AppError> {
    let profile = own_profile(&state.db, &user_model).await?;

    if form.is_available && !profile.is_approved() {
        return Err(AppError::Forbidden(
            "Only approved drivers can become available.".to_string(),
        ));
    }

    let mut active: driver_profile::ActiveModel = profile.into();
    active.is_available = Set(form.is_available);
    active.updated_at = Set(Utc::now().fixed_offset());
    let profile = active.update(&state.db).await?;

    tracing::info!(user_id = %user_model.id, is_available = profile.is_available, "driver availability changed");
    Ok(Json(profile))
}
