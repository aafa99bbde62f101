use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use chrono::{NaiveTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::middleware::{AuthUser, StaffUser};
use crate::entities::choices::RestaurantStatus;
use crate::entities::{menu_item, restaurant, user};
use crate::error::{AppError, FieldErrors};
use crate::extract::{JsonBody, QueryParams, ValidatedJson, validate};
use crate::forms::{CreateRestaurantForm, UpdateRestaurantForm, parse_time};
use crate::pagination::{Page, paginate};
use crate::permissions::{self, Access};
use crate::search::any_contains;
use crate::state::AppState;

const RECENT_ITEMS: u64 = 5;

/// Build the restaurant route group: `/restaurants/...`
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_restaurants).post(create_restaurant))
        .route("/mine", get(my_restaurants))
        .route(
            "/{id}",
            get(get_restaurant)
                .patch(update_restaurant)
                .delete(delete_restaurant),
        )
        .route("/{id}/dashboard", get(restaurant_dashboard))
}

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub search: Option<String>,
    pub category: Option<String>,
    pub page: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
}

#[derive(Serialize)]
pub struct DashboardResponse {
    pub restaurant: restaurant::Model,
    pub total_items: u64,
    pub available_items: u64,
    pub vegetarian_items: u64,
    pub recent_items: Vec<menu_item::Model>,
}

/// Load a restaurant or answer 404.
pub(super) async fn find_restaurant(
    db: &DatabaseConnection,
    id: Uuid,
) -> Result<restaurant::Model, AppError> {
    restaurant::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Restaurant not found.".to_string()))
}

fn time_field(value: &str, field: &str) -> Result<NaiveTime, AppError> {
    parse_time(value).ok_or_else(|| {
        let mut errors = FieldErrors::new();
        errors.add(field, "Enter a valid time (HH:MM or HH:MM:SS).");
        AppError::Validation(errors)
    })
}

fn website_field(value: Option<String>) -> Option<String> {
    value.map(|w| w.trim().to_string()).filter(|w| !w.is_empty())
}

/// `GET /api/v1/restaurants`
async fn list_restaurants(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<ListQuery>,
) -> Result<Json<Page<restaurant::Model>>, AppError> {
    let mut select = restaurant::Entity::find()
        .filter(restaurant::Column::Status.eq(RestaurantStatus::Active.as_str()));

    if let Some(condition) = any_contains(
        [
            restaurant::Column::Name,
            restaurant::Column::Description,
            restaurant::Column::Address,
        ],
        query.search.as_deref(),
    ) {
        select = select.filter(condition);
    }
    if let Some(category) = query.category.as_deref().filter(|c| !c.is_empty()) {
        select = select.filter(restaurant::Column::Category.eq(category));
    }

    let select = select
        .order_by_desc(restaurant::Column::Rating)
        .order_by_desc(restaurant::Column::CreatedAt)
        .order_by_asc(restaurant::Column::Id);

    Ok(Json(paginate(&state.db, select, query.page.as_deref()).await?))
}

/// `POST /api/v1/restaurants`
async fn create_restaurant(
    State(state): State<AppState>,
    StaffUser(staff): StaffUser,
    ValidatedJson(form): ValidatedJson<CreateRestaurantForm>,
) -> Result<impl IntoResponse, AppError> {
    let owner_id = match form.owner_id {
        Some(owner_id) => {
            let exists = user::Entity::find_by_id(owner_id).count(&state.db).await? > 0;
            if !exists {
                let mut errors = FieldErrors::new();
                errors.add("owner_id", "Select a valid user.");
                return Err(AppError::Validation(errors));
            }
            owner_id
        }
        None => staff.id,
    };

    let opening_time = time_field(&form.opening_time, "opening_time")?;
    let closing_time = time_field(&form.closing_time, "closing_time")?;
    let status = form
        .status
        .as_deref()
        .and_then(RestaurantStatus::parse)
        .unwrap_or(RestaurantStatus::Pending);
    let now = Utc::now().fixed_offset();

    let created = restaurant::ActiveModel {
        id: Set(Uuid::new_v4()),
        owner_id: Set(owner_id),
        name: Set(form.name),
        description: Set(form.description),
        category: Set(form.category),
        address: Set(form.address),
        phone: Set(form.phone),
        email: Set(form.email),
        website: Set(website_field(form.website)),
        status: Set(status.as_str().to_string()),
        opening_time: Set(opening_time),
        closing_time: Set(closing_time),
        is_delivery_available: Set(form.is_delivery_available),
        delivery_fee_cents: Set(form.delivery_fee_cents),
        minimum_order_cents: Set(form.minimum_order_cents),
        rating: Set(0.0),
        total_reviews: Set(0),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(&state.db)
    .await?;

    tracing::info!(restaurant_id = %created.id, %owner_id, created_by = %staff.id, "restaurant created");
    Ok((StatusCode::CREATED, Json(created)))
}

/// `GET /api/v1/restaurants/mine`
async fn my_restaurants(
    State(state): State<AppState>,
    AuthUser(user_model): AuthUser,
    QueryParams(query): QueryParams<PageQuery>,
) -> Result<Json<Page<restaurant::Model>>, AppError> {
    let mut select = restaurant::Entity::find();
    if !user_model.is_superuser {
        select = select.filter(restaurant::Column::OwnerId.eq(user_model.id));
    }
    let select = select
        .order_by_desc(restaurant::Column::CreatedAt)
        .order_by_asc(restaurant::Column::Id);

    Ok(Json(paginate(&state.db, select, query.page.as_deref()).await?))
}

/// `GET /api/v1/restaurants/{id}`
///
/// Active restaurants are public. Others exist only for the people who manage them.
async fn get_restaurant(
    State(state): State<AppState>,
    viewer: Option<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<restaurant::Model>, AppError> {
    let found = find_restaurant(&state.db, id).await?;

    let visible = found.status == RestaurantStatus::Active.as_str()
        || viewer.is_some_and(|AuthUser(u)| permissions::check(&u, &found) == Access::Allow);
    if !visible {
        return Err(AppError::NotFound("Restaurant not found.".to_string()));
    }

    Ok(Json(found))
}

/// `PATCH /api/v1/restaurants/{id}`
async fn update_restaurant(
    State(state): State<AppState>,
    AuthUser(user_model): AuthUser,
    Path(id): Path<Uuid>,
    JsonBody(form): JsonBody<UpdateRestaurantForm>,
) -> Result<Json<restaurant::Model>, AppError> {
    let found = find_restaurant(&state.db, id).await?;
    permissions::ensure(
        &user_model,
        &found,
        "You don't have permission to edit this restaurant.",
    )?;
    validate(&form)?;
    if form.status.is_some() && !user_model.is_privileged() {
        return Err(permissions::deny(
            &user_model,
            "Only staff can change a restaurant's status.",
        ));
    }

    let mut active: restaurant::ActiveModel = found.into();
    if let Some(name) = form.name {
        active.name = Set(name);
    }
    if let Some(description) = form.description {
        active.description = Set(description);
    }
    if let Some(category) = form.category {
        active.category = Set(category);
    }
    if let Some(address) = form.address {
        active.address = Set(address);
    }
    if let Some(phone) = form.phone {
        active.phone = Set(phone);
    }
    if let Some(email) = form.email {
        active.email = Set(email);
    }
    if form.website.is_some() {
        active.website = Set(website_field(form.website));
    }
    if let Some(opening_time) = form.opening_time {
        active.opening_time = Set(time_field(&opening_time, "opening_time")?);
    }
    if let Some(closing_time) = form.closing_time {
        active.closing_time = Set(time_field(&closing_time, "closing_time")?);
    }
    if let Some(is_delivery_available) = form.is_delivery_available {
        active.is_delivery_available = Set(is_delivery_available);
    }
    if let Some(delivery_fee_cents) = form.delivery_fee_cents {
        active.delivery_fee_cents = Set(delivery_fee_cents);
    }
    if let Some(minimum_order_cents) = form.minimum_order_cents {
        active.minimum_order_cents = Set(minimum_order_cents);
    }
    if let Some(status) = form.status.as_deref().and_then(RestaurantStatus::parse) {
        active.status = Set(status.as_str().to_string());
    }
    active.updated_at = Set(Utc::now().fixed_offset());

    let updated = active.update(&state.db).await?;
    tracing::info!(restaurant_id = %updated.id, updated_by = %user_model.id, "restaurant updated");
    Ok(Json(updated))
}

/// `DELETE /api/v1/restaurants/{id}`
async fn delete_restaurant(
    State(state): State<AppState>,
    AuthUser(user_model): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let found = find_restaurant(&state.db, id).await?;
    permissions::ensure(
        &user_model,
        &found,
        "You don't have permission to delete this restaurant.",
    )?;

    restaurant::Entity::delete_by_id(found.id)
        .exec(&state.db)
        .await?;

    tracing::info!(restaurant_id = %found.id, deleted_by = %user_model.id, "restaurant deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// `GET /api/v1/restaurants/{id}/dashboard`
async fn restaurant_dashboard(
    State(state): State<AppState>,
    AuthUser(user_model): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<DashboardResponse>, AppError> {
    let found = find_restaurant(&state.db, id).await?;
    permissions::ensure(
        &user_model,
        &found,
        "You don't have permission to view this restaurant's dashboard.",
    )?;

    let items = || menu_item::Entity::find().filter(menu_item::Column::RestaurantId.eq(found.id));

    let total_items = items().count(&state.db).await?;
    let available_items = items()
        .filter(menu_item::Column::IsAvailable.eq(true))
        .count(&state.db)
        .await?;
    let vegetarian_items = items()
        .filter(menu_item::Column::IsVegetarian.eq(true))
        .count(&state.db)
        .await?;
    let recent_items = items()
        .order_by_desc(menu_item::Column::CreatedAt)
        .order_by_desc(menu_item::Column::Id)
        .limit(RECENT_ITEMS)
        .all(&state.db)
        .await?;

    Ok(Json(DashboardResponse {
        restaurant: found,
        total_items,
        available_items,
        vegetarian_items,
        recent_items,
    }))
}
