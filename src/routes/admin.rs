use std::collections::BTreeMap;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{delete, get, patch};
use axum::{Json, Router};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::middleware::{StaffUser, Superuser};
use crate::entities::choices::{ApprovalStatus, RestaurantStatus};
use crate::entities::{driver_profile, restaurant, restaurant_profile, user};
use crate::error::AppError;
use crate::extract::{QueryParams, ValidatedJson};
use crate::forms::ApprovalForm;
use crate::pagination::{Page, paginate};
use crate::state::AppState;

/// Build the administration route group: `/admin/...`
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/overview", get(overview))
        .route("/restaurant-profiles", get(list_restaurant_profiles))
        .route("/restaurant-profiles/{id}", patch(review_restaurant_profile))
        .route("/driver-profiles", get(list_driver_profiles))
        .route("/driver-profiles/{id}", patch(review_driver_profile))
        .route("/users/{id}", delete(delete_user))
}

#[derive(Debug, Default, Deserialize)]
pub struct ReviewQuery {
    pub status: Option<String>,
    pub page: Option<String>,
}

#[derive(Serialize)]
pub struct OverviewResponse {
    pub total_users: u64,
    pub pending_restaurant_profiles: u64,
    pub pending_driver_profiles: u64,
    pub restaurants_by_status: BTreeMap<&'static str, u64>,
}

fn approval_status(raw: &str) -> ApprovalStatus {
    ApprovalStatus::parse(raw).unwrap_or(ApprovalStatus::Pending)
}

/// `GET /api/v1/admin/overview`
async fn overview(
    State(state): State<AppState>,
    StaffUser(_staff): StaffUser,
) -> Result<Json<OverviewResponse>, AppError> {
    let pending = ApprovalStatus::Pending.as_str();

    let total_users = user::Entity::find().count(&state.db).await?;
    let pending_restaurant_profiles = restaurant_profile::Entity::find()
        .filter(restaurant_profile::Column::Status.eq(pending))
        .count(&state.db)
        .await?;
    let pending_driver_profiles = driver_profile::Entity::find()
        .filter(driver_profile::Column::Status.eq(pending))
        .count(&state.db)
        .await?;

    let mut restaurants_by_status = BTreeMap::new();
    for status in RestaurantStatus::ALL {
        let count = restaurant::Entity::find()
            .filter(restaurant::Column::Status.eq(status.as_str()))
            .count(&state.db)
            .await?;
        restaurants_by_status.insert(status.as_str(), count);
    }

    Ok(Json(OverviewResponse {
        total_users,
        pending_restaurant_profiles,
        pending_driver_profiles,
        restaurants_by_status,
    }))
}

/// `GET /api/v1/admin/restaurant-profiles`
async fn list_restaurant_profiles(
    State(state): State<AppState>,
    StaffUser(_staff): StaffUser,
    QueryParams(query): QueryParams<ReviewQuery>,
) -> Result<Json<Page<restaurant_profile::Model>>, AppError> {
    let mut select = restaurant_profile::Entity::find();
    if let Some(status) = query.status.as_deref().filter(|s| !s.is_empty()) {
        select = select.filter(restaurant_profile::Column::Status.eq(status));
    }
    let select = select
        .order_by_desc(restaurant_profile::Column::CreatedAt)
        .order_by_asc(restaurant_profile::Column::Id);

    Ok(Json(paginate(&state.db, select, query.page.as_deref()).await?))
}

/// `PATCH /api/v1/admin/restaurant-profiles/{id}`
async fn review_restaurant_profile(
    State(state): State<AppState>,
    StaffUser(staff): StaffUser,
    Path(id): Path<Uuid>,
    ValidatedJson(form): ValidatedJson<ApprovalForm>,
) -> Result<Json<restaurant_profile::Model>, AppError> {
    let profile = restaurant_profile::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Restaurant profile not found.".to_string()))?;

    let status = approval_status(&form.status);
    let mut active: restaurant_profile::ActiveModel = profile.into();
    active.status = Set(status.as_str().to_string());
    active.updated_at = Set(Utc::now().fixed_offset());
    let profile = active.update(&state.db).await?;

    tracing::info!(profile_id = %profile.id, %status, reviewed_by = %staff.id, "restaurant profile reviewed");
    Ok(Json(profile))
}

/// `GET /api/v1/admin/driver-profiles`
async fn list_driver_profiles(
    State(state): State<AppState>,
    StaffUser(_staff): StaffUser,
    QueryParams(query): QueryParams<ReviewQuery>,
) -> Result<Json<Page<driver_profile::Model>>, AppError> {
    let mut select = driver_profile::Entity::find();
    if let Some(status) = query.status.as_deref().filter(|s| !s.is_empty()) {
        select = select.filter(driver_profile::Column::Status.eq(status));
    }
    let select = select
        .order_by_desc(driver_profile::Column::CreatedAt)
        .order_by_asc(driver_profile::Column::Id);

    Ok(Json(paginate(&state.db, select, query.page.as_deref()).await?))
}

/// `PATCH /api/v1/admin/driver-profiles/{id}`
///
/// A driver who is no longer approved is taken off duty.
async fn review_driver_profile(
    State(state): State<AppState>,
    StaffUser(staff): StaffUser,
    Path(id): Path<Uuid>,
    ValidatedJson(form): ValidatedJson<ApprovalForm>,
) -> Result<Json<driver_profile::Model>, AppError> {
    let profile = driver_profile::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Driver profile not found.".to_string()))?;

    let status = approval_status(&form.status);
    let mut active: driver_profile::ActiveModel = profile.into();
    active.status = Set(status.as_str().to_string());
    if status != ApprovalStatus::Approved {
        active.is_available = Set(false);
    }
    active.updated_at = Set(Utc::now().fixed_offset());
    let profile = active.update(&state.db).await?;

    tracing::info!(profile_id = %profile.id, %status, reviewed_by = %staff.id, "driver profile reviewed");
    Ok(Json(profile))
}

/// `DELETE /api/v1/admin/users/{id}`
async fn delete_user(
    State(state): State<AppState>,
    Superuser(admin): Superuser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if id == admin.id {
        return Err(AppError::BadRequest(
            "You cannot delete your own account.".to_string(),
        ));
    }

    let result = user::Entity::delete_by_id(id).exec(&state.db).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound("User not found.".to_string()));
    }

    tracing::info!(user_id = %id, deleted_by = %admin.id, "user deleted");
    Ok(StatusCode::NO_CONTENT)
}
