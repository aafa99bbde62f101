#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use chrono::{Duration, NaiveTime, Utc};
use http_body_util::BodyExt;
use migration::{Migrator, MigratorTrait};
use sea_orm::ActiveValue::Set;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use serde_json::{Value, json};
use tower::ServiceExt;
use uuid::Uuid;

use veats_api::auth::password;
use veats_api::config::{Config, Environment, VerificationSettings};
use veats_api::entities::choices::{MenuCategory, RestaurantCategory, RestaurantStatus, Role};
use veats_api::entities::{menu_item, restaurant, user, user_profile};
use veats_api::state::AppState;

pub const PASSWORD: &str = "tasty-Noodles-42";

/// Router plus a handle on the same in-memory database.
pub struct TestApp {
    pub router: Router,
    pub db: DatabaseConnection,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub location: Option<String>,
    pub body: Value,
}

pub fn test_config() -> Config {
    Config {
        database_url: String::new(),
        server_host: std::net::IpAddr::from([127, 0, 0, 1]),
        server_port: 0,
        environment: Environment::Development,
        log_level: "warn".to_string(),
        jwt_secret: "test-secret-key-for-testing-only-32chars".to_string(),
        jwt_access_expiration_secs: 900,
        jwt_refresh_expiration_secs: 604_800,
        frontend_url: "http://localhost:3001".to_string(),
        verification: VerificationSettings::default(),
        admin_seed: None,
    }
}

/// Build the app router backed by an in-memory `SQLite` database with migrations.
pub async fn test_app() -> TestApp {
    let db = veats_api::db::connect("sqlite::memory:")
        .await
        .unwrap_or_default();
    Migrator::up(&db, None).await.unwrap_or_default();

    let state = AppState {
        db: db.clone(),
        config: test_config(),
    };

    TestApp {
        router: veats_api::routes::router().with_state(state),
        db,
    }
}

// ──────────────────────────────────────────────────────────────────────────────
// Requests
// ──────────────────────────────────────────────────────────────────────────────

pub async fn send(
    app: &TestApp,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<&Value>,
) -> TestResponse {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => builder.body(Body::empty()),
    }
    .unwrap_or_default();

    let response = app.router.clone().oneshot(request).await.unwrap_or_default();

    let status = response.status();
    let location = response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let bytes = response
        .into_body()
        .collect()
        .await
        .map(http_body_util::Collected::to_bytes)
        .unwrap_or_default();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

    TestResponse {
        status,
        location,
        body,
    }
}

pub async fn get(app: &TestApp, uri: &str) -> TestResponse {
    send(app, "GET", uri, None, None).await
}

pub async fn get_with_auth(app: &TestApp, uri: &str, token: &str) -> TestResponse {
    send(app, "GET", uri, Some(token), None).await
}

pub async fn post_json(app: &TestApp, uri: &str, body: &Value) -> TestResponse {
    send(app, "POST", uri, None, Some(body)).await
}

pub async fn post_json_with_auth(
    app: &TestApp,
    uri: &str,
    body: &Value,
    token: &str,
) -> TestResponse {
    send(app, "POST", uri, Some(token), Some(body)).await
}

pub async fn patch_json_with_auth(
    app: &TestApp,
    uri: &str,
    body: &Value,
    token: &str,
) -> TestResponse {
    send(app, "PATCH", uri, Some(token), Some(body)).await
}

pub async fn delete_with_auth(app: &TestApp, uri: &str, token: &str) -> TestResponse {
    send(app, "DELETE", uri, Some(token), None).await
}

// ──────────────────────────────────────────────────────────────────────────────
// Registration payloads
// ──────────────────────────────────────────────────────────────────────────────

pub fn account_payload(username: &str) -> Value {
    json!({
        "username": username,
        "email": format!("{username}@example.com"),
        "first_name": "Test",
        "last_name": "User",
        "phone": "5550100",
        "address": "12 Market Street",
        "password1": PASSWORD,
        "password2": PASSWORD,
    })
}

pub fn restaurant_payload(username: &str, license: &str) -> Value {
    let mut payload = account_payload(username);
    payload["business_name"] = json!(format!("{username} Kitchen"));
    payload["business_license"] = json!(license);
    payload["business_address"] = json!("99 Harbour Road");
    payload["business_phone"] = json!("5550199");
    payload["business_email"] = json!(format!("biz-{username}@example.com"));
    payload
}

pub fn driver_payload(username: &str, license: &str) -> Value {
    let mut payload = account_payload(username);
    payload["license_number"] = json!(license);
    payload["vehicle_type"] = json!("scooter");
    payload["vehicle_plate"] = json!("VE-1234");
    payload
}

/// The code currently stored for `user_id`, if any.
pub async fn stored_code(db: &DatabaseConnection, user_id: Uuid) -> Option<String> {
    user_profile::Entity::find()
        .filter(user_profile::Column::UserId.eq(user_id))
        .one(db)
        .await
        .ok()
        .flatten()
        .and_then(|p| p.verification_code)
}

pub fn user_id_of(response: &TestResponse) -> Uuid {
    response.body["user"]["id"]
        .as_str()
        .and_then(|s| Uuid::parse_str(s).ok())
        .unwrap_or_default()
}

/// Register through the API, verify with the stored code and log in. Returns `(user_id, token)`.
pub async fn register_verified(app: &TestApp, kind: &str, payload: &Value) -> (Uuid, String) {
    let created = post_json(app, &format!("/api/v1/auth/register/{kind}"), payload).await;
    assert_eq!(created.status, StatusCode::CREATED, "register failed: {}", created.body);
    let user_id = user_id_of(&created);

    let code = stored_code(&app.db, user_id).await.unwrap_or_default();
    let verified = post_json(
        app,
        &format!("/api/v1/auth/verify/{user_id}"),
        &json!({ "code": code }),
    )
    .await;
    assert_eq!(verified.status, StatusCode::OK, "verify failed: {}", verified.body);

    let username = payload["username"].as_str().unwrap_or_default();
    (user_id, login(app, username).await)
}

pub async fn login(app: &TestApp, username: &str) -> String {
    let response = post_json(
        app,
        "/api/v1/auth/login",
        &json!({ "username": username, "password": PASSWORD }),
    )
    .await;
    assert_eq!(response.status, StatusCode::OK, "login failed: {}", response.body);
    response.body["token"].as_str().unwrap_or_default().to_string()
}

// ──────────────────────────────────────────────────────────────────────────────
// Direct fixtures
// ──────────────────────────────────────────────────────────────────────────────

/// Insert an active account without going through registration. Returns `(user_id, token)`.
pub async fn create_user(
    app: &TestApp,
    username: &str,
    role: Role,
    is_staff: bool,
    is_superuser: bool,
) -> (Uuid, String) {
    let now = Utc::now().fixed_offset();
    let id = Uuid::new_v4();
    let result = user::ActiveModel {
        id: Set(id),
        username: Set(username.to_string()),
        email: Set(format!("{username}@example.com")),
        first_name: Set("Test".to_string()),
        last_name: Set("User".to_string()),
        password_hash: Set(password::hash_password(PASSWORD).unwrap_or_default()),
        role: Set(role.as_str().to_string()),
        is_active: Set(true),
        is_staff: Set(is_staff),
        is_superuser: Set(is_superuser),
        email_verified: Set(true),
        last_login_at: Set(None),
        last_login_ip: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(&app.db)
    .await;
    assert!(result.is_ok(), "user insert failed: {result:?}");

    (id, login(app, username).await)
}

/// Insert a restaurant directly so rating and age can be controlled.
pub async fn insert_restaurant(
    db: &DatabaseConnection,
    owner_id: Uuid,
    name: &str,
    category: RestaurantCategory,
    status: RestaurantStatus,
    rating: f64,
    minutes_ago: i64,
) -> Uuid {
    let created = (Utc::now() - Duration::minutes(minutes_ago)).fixed_offset();
    let id = Uuid::new_v4();
    let result = restaurant::ActiveModel {
        id: Set(id),
        owner_id: Set(owner_id),
        name: Set(name.to_string()),
        description: Set(format!("{name} serves food")),
        category: Set(category.as_str().to_string()),
        address: Set("1 Food Court".to_string()),
        phone: Set("5550111".to_string()),
        email: Set("hello@example.com".to_string()),
        website: Set(None),
        status: Set(status.as_str().to_string()),
        opening_time: Set(NaiveTime::from_hms_opt(9, 0, 0).unwrap_or_default()),
        closing_time: Set(NaiveTime::from_hms_opt(22, 0, 0).unwrap_or_default()),
        is_delivery_available: Set(true),
        delivery_fee_cents: Set(299),
        minimum_order_cents: Set(1000),
        rating: Set(rating),
        total_reviews: Set(0),
        created_at: Set(created),
        updated_at: Set(created),
    }
    .insert(db)
    .await;
    assert!(result.is_ok(), "restaurant insert failed: {result:?}");
    id
}

pub async fn insert_menu_item(
    db: &DatabaseConnection,
    restaurant_id: Uuid,
    name: &str,
    category: MenuCategory,
    is_vegetarian: bool,
) -> Uuid {
    let now = Utc::now().fixed_offset();
    let id = Uuid::new_v4();
    let result = menu_item::ActiveModel {
        id: Set(id),
        restaurant_id: Set(restaurant_id),
        name: Set(name.to_string()),
        description: Set(String::new()),
        price_cents: Set(899),
        category: Set(category.as_str().to_string()),
        is_available: Set(true),
        is_vegetarian: Set(is_vegetarian),
        is_vegan: Set(false),
        preparation_time: Set(15),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await;
    assert!(result.is_ok(), "menu item insert failed: {result:?}");
    id
}
