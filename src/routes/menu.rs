use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, patch};
use axum::{Json, Router};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use serde::Deserialize;
use uuid::Uuid;

use super::restaurants::find_restaurant;
use crate::auth::middleware::AuthUser;
use crate::entities::{menu_item, restaurant, user};
use crate::error::AppError;
use crate::extract::{JsonBody, QueryParams, validate};
use crate::forms::{CreateMenuItemForm, UpdateMenuItemForm};
use crate::pagination::{Page, paginate};
use crate::permissions;
use crate::search::any_contains;
use crate::state::AppState;

const MANAGE_DENIED: &str = "You don't have permission to manage this menu.";

/// Menu routes, nested under `/restaurants`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{id}/menu", get(list_menu).post(create_item))
        .route("/{id}/menu/{item_id}", patch(update_item).delete(delete_item))
}

#[derive(Debug, Default, Deserialize)]
pub struct MenuQuery {
    pub search: Option<String>,
    pub category: Option<String>,
    pub page: Option<String>,
}

/// Load the restaurant and check the caller may manage it.
async fn managed_restaurant(
    db: &DatabaseConnection,
    user_model: &user::Model,
    id: Uuid,
) -> Result<restaurant::Model, AppError> {
    let found = find_restaurant(db, id).await?;
    permissions::ensure(user_model, &found, MANAGE_DENIED)?;
    Ok(found)
}

async fn find_item(
    db: &DatabaseConnection,
    restaurant_id: Uuid,
    item_id: Uuid,
) -> Result<menu_item::Model, AppError> {
    menu_item::Entity::find_by_id(item_id)
        .filter(menu_item::Column::RestaurantId.eq(restaurant_id))
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Menu item not found.".to_string()))
}

/// `GET /api/v1/restaurants/{id}/menu`
async fn list_menu(
    State(state): State<AppState>,
    AuthUser(user_model): AuthUser,
    Path(id): Path<Uuid>,
    QueryParams(query): QueryParams<MenuQuery>,
) -> Result<Json<Page<menu_item::Model>>, AppError> {
    let found = managed_restaurant(&state.db, &user_model, id).await?;

    let mut select =
        menu_item::Entity::find().filter(menu_item::Column::RestaurantId.eq(found.id));
    if let Some(condition) = any_contains(
        [menu_item::Column::Name, menu_item::Column::Description],
        query.search.as_deref(),
    ) {
        select = select.filter(condition);
    }
    if let Some(category) = query.category.as_deref().filter(|c| !c.is_empty()) {
        select = select.filter(menu_item::Column::Category.eq(category));
    }
    let select = select
        .order_by_asc(menu_item::Column::Category)
        .order_by_asc(menu_item::Column::Name)
        .order_by_asc(menu_item::Column::Id);

    Ok(Json(paginate(&state.db, select, query.page.as_deref()).await?))
}

/// `POST /api/v1/restaurants/{id}/menu`
async fn create_item(
    State(state): State<AppState>,
    AuthUser(user_model): AuthUser,
    Path(id): Path<Uuid>,
    JsonBody(form): JsonBody<CreateMenuItemForm>,
) -> Result<impl IntoResponse, AppError> {
    let found = managed_restaurant(&state.db, &user_model, id).await?;
    validate(&form)?;
    let now = Utc::now().fixed_offset();

    let item = menu_item::ActiveModel {
        id: Set(Uuid::new_v4()),
        restaurant_id: Set(found.id),
        name: Set(form.name),
        description: Set(form.description),
        price_cents: Set(form.price_cents),
        category: Set(form.category),
        is_available: Set(form.is_available),
        is_vegetarian: Set(form.is_vegetarian),
        is_vegan: Set(form.is_vegan),
        preparation_time: Set(form.preparation_time),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(&state.db)
    .await?;

    tracing::info!(restaurant_id = %found.id, item_id = %item.id, "menu item added");
    Ok((StatusCode::CREATED, Json(item)))
}

/// `PATCH /api/v1/restaurants/{id}/menu/{item_id}`
async fn update_item(
    State(state): State<AppState>,
    AuthUser(user_model): AuthUser,
    Path((id, item_id)): Path<(Uuid, Uuid)>,
    JsonBody(form): JsonBody<UpdateMenuItemForm>,
) -> Result<Json<menu_item::Model>, AppError> {
    let found = managed_restaurant(&state.db, &user_model, id).await?;
    validate(&form)?;
    let item = find_item(&state.db, found.id, item_id).await?;

    let mut active: menu_item::ActiveModel = item.into();
    if let Some(name) = form.name {
        active.name = Set(name);
    }
    if let Some(description) = form.description {
        active.description = Set(description);
    }
    if let Some(price_cents) = form.price_cents {
        active.price_cents = Set(price_cents);
    }
    if let Some(category) = form.category {
        active.category = Set(category);
    }
    if let Some(is_available) = form.is_available {
        active.is_available = Set(is_available);
    }
    if let Some(is_vegetarian) = form.is_vegetarian {
        active.is_vegetarian = Set(is_vegetarian);
    }
    if let Some(is_vegan) = form.is_vegan {
        active.is_vegan = Set(is_vegan);
    }
    if let Some(preparation_time) = form.preparation_time {
        active.preparation_time = Set(preparation_time);
    }
    active.updated_at = Set(Utc::now().fixed_offset());

    Ok(Json(active.update(&state.db).await?))
}

/// `DELETE /api/v1/restaurants/{id}/menu/{item_id}`
async fn delete_item(
    State(state): State<AppState>,
    AuthUser(user_model): AuthUser,
    Path((id, item_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, AppError> {
    let found = managed_restaurant(&state.db, &user_model, id).await?;
    let item = find_item(&state.db, found.id, item_id).await?;

    menu_item::Entity::delete_by_id(item.id)
        .exec(&state.db)
        .await?;

    tracing::info!(restaurant_id = %found.id, item_id = %item.id, "menu item deleted");
    Ok(StatusCode::NO_CONTENT)
}
