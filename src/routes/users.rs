use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use serde::Serialize;

use crate::auth::middleware::AuthUser;
use crate::entities::{driver_profile, restaurant_profile, user, user_profile};
use crate::error::AppError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/me", get(me))
}

#[derive(Serialize)]
pub struct MeResponse {
    pub user: user::Model,
    pub profile: Option<user_profile::Model>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub restaurant_profile: Option<restaurant_profile::Model>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub driver_profile: Option<driver_profile::Model>,
}

/// `GET /api/v1/users/me`
async fn me(
    State(state): State<AppState>,
    AuthUser(user_model): AuthUser,
) -> Result<Json<MeResponse>, AppError> {
    let profile = user_profile::Entity::find()
        .filter(user_profile::Column::UserId.eq(user_model.id))
        .one(&state.db)
        .await?;
    let restaurant_profile = restaurant_profile::Entity::find()
        .filter(restaurant_profile::Column::UserId.eq(user_model.id))
        .one(&state.db)
        .await?;
    let driver_profile = driver_profile::Entity::find()
        .filter(driver_profile::Column::UserId.eq(user_model.id))
        .one(&state.db)
        .await?;

    Ok(Json(MeResponse {
        user: user_model,
        profile,
        restaurant_profile,
        driver_profile,
    }))
}
