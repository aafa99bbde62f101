mod common;

use axum::http::StatusCode;

use veats_api::entities::choices::Role;

async fn landing(role: Role, is_staff: bool, is_superuser: bool) -> Option<String> {
    let app = common::test_app().await;
    let (_, token) = common::create_user(&app, "someone", role, is_staff, is_superuser).await;

    let response = common::get_with_auth(&app, "/api/v1/dashboard", &token).await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.body["redirect"].as_str(), response.location.as_deref());
    response.location
}

#[tokio::test]
async fn superuser_lands_on_admin_overview() {
    assert_eq!(
        landing(Role::Superuser, false, true).await.as_deref(),
        Some("/api/v1/admin/overview")
    );
}

#[tokio::test]
async fn staff_lands_on_admin_overview_whatever_the_role() {
    assert_eq!(
        landing(Role::Customer, true, false).await.as_deref(),
        Some("/api/v1/admin/overview")
    );
}

#[tokio::test]
async fn admin_role_lands_on_admin_overview() {
    assert_eq!(
        landing(Role::Admin, false, false).await.as_deref(),
        Some("/api/v1/admin/overview")
    );
}

#[tokio::test]
async fn restaurant_lands_on_own_restaurants() {
    assert_eq!(
        landing(Role::Restaurant, false, false).await.as_deref(),
        Some("/api/v1/restaurants/mine")
    );
}

#[tokio::test]
async fn driver_lands_on_driver_profile() {
    assert_eq!(
        landing(Role::Driver, false, false).await.as_deref(),
        Some("/api/v1/drivers/me")
    );
}

#[tokio::test]
async fn customer_lands_on_restaurant_list() {
    assert_eq!(
        landing(Role::Customer, false, false).await.as_deref(),
        Some("/api/v1/restaurants")
    );
}

#[tokio::test]
async fn dashboard_requires_login() {
    let app = common::test_app().await;
    let response = common::get(&app, "/api/v1/dashboard").await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}
