mod common;

use axum::http::StatusCode;
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};
use serde_json::{Value, json};
use uuid::Uuid;

use veats_api::entities::choices::{MenuCategory, RestaurantCategory, RestaurantStatus, Role};
use veats_api::entities::{menu_item, restaurant};

fn names(body: &Value) -> Vec<String> {
    body["data"]
        .as_array()
        .map(|rows| {
            rows.iter()
                .filter_map(|r| r["name"].as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

async fn stored(app: &common::TestApp, id: Uuid) -> Option<restaurant::Model> {
    restaurant::Entity::find_by_id(id)
        .one(&app.db)
        .await
        .unwrap_or_default()
}

// ──────────────────────────────────────────────────────────────────────────────
// Public listing
// ──────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn list_shows_only_active_restaurants() {
    let app = common::test_app().await;
    let (owner, _) = common::create_user(&app, "owner", Role::Restaurant, false, false).await;
    common::insert_restaurant(&app.db, owner, "Open", RestaurantCategory::Cafe, RestaurantStatus::Active, 4.0, 1).await;
    common::insert_restaurant(&app.db, owner, "Waiting", RestaurantCategory::Cafe, RestaurantStatus::Pending, 5.0, 1).await;
    common::insert_restaurant(&app.db, owner, "Closed", RestaurantCategory::Cafe, RestaurantStatus::Inactive, 5.0, 1).await;

    let response = common::get(&app, "/api/v1/restaurants").await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(names(&response.body), vec!["Open"]);
    assert_eq!(response.body["total"], 1);
    assert_eq!(response.body["page"], 1);
}

#[tokio::test]
async fn category_filter_orders_by_rating_then_newest() {
    let app = common::test_app().await;
    let (owner, _) = common::create_user(&app, "owner", Role::Restaurant, false, false).await;
    let active = RestaurantStatus::Active;
    common::insert_restaurant(&app.db, owner, "Old Good", RestaurantCategory::Bakery, active, 4.5, 30).await;
    common::insert_restaurant(&app.db, owner, "New Good", RestaurantCategory::Bakery, active, 4.5, 5).await;
    common::insert_restaurant(&app.db, owner, "Best", RestaurantCategory::Bakery, active, 4.9, 60).await;
    common::insert_restaurant(&app.db, owner, "Meh", RestaurantCategory::Bakery, active, 2.0, 1).await;
    common::insert_restaurant(&app.db, owner, "Burgers", RestaurantCategory::FastFood, active, 5.0, 1).await;

    let response = common::get(&app, "/api/v1/restaurants?category=bakery").await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        names(&response.body),
        vec!["Best", "New Good", "Old Good", "Meh"]
    );
    let all_bakeries = response.body["data"]
        .as_array()
        .is_some_and(|rows| rows.iter().all(|r| r["category"] == "bakery"));
    assert!(all_bakeries);
}

#[tokio::test]
async fn search_is_case_insensitive_across_fields() {
    let app = common::test_app().await;
    let (owner, _) = common::create_user(&app, "owner", Role::Restaurant, false, false).await;
    let active = RestaurantStatus::Active;
    common::insert_restaurant(&app.db, owner, "Pho Palace", RestaurantCategory::Casual, active, 4.0, 1).await;
    common::insert_restaurant(&app.db, owner, "Taco Town", RestaurantCategory::Casual, active, 4.0, 2).await;

    let response = common::get(&app, "/api/v1/restaurants?search=PHO").await;
    assert_eq!(names(&response.body), vec!["Pho Palace"]);

    // Description is "<name> serves food" and address is shared.
    let response = common::get(&app, "/api/v1/restaurants?search=food%20court").await;
    assert_eq!(response.body["total"], 2);

    let response = common::get(&app, "/api/v1/restaurants?search=%25").await;
    assert_eq!(response.body["total"], 0);
}

#[tokio::test]
async fn pagination_is_forgiving() {
    let app = common::test_app().await;
    let (owner, _) = common::create_user(&app, "owner", Role::Restaurant, false, false).await;
    for i in 0..14 {
        common::insert_restaurant(
            &app.db,
            owner,
            &format!("Place {i:02}"),
            RestaurantCategory::Other,
            RestaurantStatus::Active,
            3.0,
            i,
        )
        .await;
    }

    let first = common::get(&app, "/api/v1/restaurants?page=abc").await;
    assert_eq!(first.body["page"], 1);
    assert_eq!(first.body["data"].as_array().map(Vec::len), Some(12));
    assert_eq!(first.body["num_pages"], 2);
    assert_eq!(first.body["has_next"], true);

    let past_end = common::get(&app, "/api/v1/restaurants?page=99").await;
    assert_eq!(past_end.status, StatusCode::OK);
    assert_eq!(past_end.body["page"], 2);
    assert_eq!(past_end.body["data"].as_array().map(Vec::len), Some(2));
    assert_eq!(past_end.body["has_previous"], true);
}

// ──────────────────────────────────────────────────────────────────────────────
// Create
// ──────────────────────────────────────────────────────────────────────────────

fn new_restaurant() -> Value {
    json!({
        "name": "Noodle Bar",
        "description": "Hand-pulled noodles",
        "category": "casual",
        "address": "3 Lantern Lane",
        "phone": "5550123",
        "email": "noodles@example.com",
        "opening_time": "11:00",
        "closing_time": "23:30",
        "delivery_fee_cents": 250,
        "minimum_order_cents": 1500,
    })
}

#[tokio::test]
async fn staff_creates_pending_restaurant_for_owner() {
    let app = common::test_app().await;
    let (_, staff_token) = common::create_user(&app, "staffer", Role::Admin, true, false).await;
    let (owner, _) = common::create_user(&app, "owner", Role::Restaurant, false, false).await;

    let mut body = new_restaurant();
    body["owner_id"] = json!(owner);
    body["rating"] = json!(5.0);
    let response =
        common::post_json_with_auth(&app, "/api/v1/restaurants", &body, &staff_token).await;

    assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);
    assert_eq!(response.body["status"], "pending");
    assert_eq!(response.body["owner_id"], owner.to_string());
    assert_eq!(response.body["opening_time"], "11:00:00");
    assert_eq!(response.body["rating"], 0.0);
    assert_eq!(response.body["delivery_fee_cents"], 250);
}

#[tokio::test]
async fn non_staff_cannot_create_restaurants() {
    let app = common::test_app().await;
    let (_, token) = common::create_user(&app, "owner", Role::Restaurant, false, false).await;

    let response =
        common::post_json_with_auth(&app, "/api/v1/restaurants", &new_restaurant(), &token).await;

    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location.as_deref(), Some("/api/v1/restaurants/mine"));
    assert!(response.body["message"].is_string());
    assert_eq!(
        restaurant::Entity::find().count(&app.db).await.unwrap_or_default(),
        0
    );
}

#[tokio::test]
async fn create_rejects_bad_fields() {
    let app = common::test_app().await;
    let (_, token) = common::create_user(&app, "root", Role::Superuser, false, true).await;

    let mut body = new_restaurant();
    body["category"] = json!("street_food");
    body["opening_time"] = json!("25:00");
    body["delivery_fee_cents"] = json!(-1);
    body["owner_id"] = json!(Uuid::new_v4());
    let response = common::post_json_with_auth(&app, "/api/v1/restaurants", &body, &token).await;

    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    let fields = &response.body["error"]["fields"];
    for field in ["category", "opening_time", "delivery_fee_cents"] {
        assert!(fields[field].is_array(), "missing error for {field}: {fields}");
    }
}

// ──────────────────────────────────────────────────────────────────────────────
// Read / update / delete
// ──────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn inactive_restaurant_is_hidden_from_strangers() {
    let app = common::test_app().await;
    let (owner, owner_token) =
        common::create_user(&app, "owner", Role::Restaurant, false, false).await;
    let (_, stranger_token) =
        common::create_user(&app, "stranger", Role::Customer, false, false).await;
    let id = common::insert_restaurant(&app.db, owner, "Soon", RestaurantCategory::Cafe, RestaurantStatus::Pending, 0.0, 1).await;
    let uri = format!("/api/v1/restaurants/{id}");

    assert_eq!(common::get(&app, &uri).await.status, StatusCode::NOT_FOUND);
    assert_eq!(
        common::get_with_auth(&app, &uri, &stranger_token).await.status,
        StatusCode::NOT_FOUND
    );
    let own = common::get_with_auth(&app, &uri, &owner_token).await;
    assert_eq!(own.status, StatusCode::OK);
    assert_eq!(own.body["name"], "Soon");
}

#[tokio::test]
async fn non_owner_edit_is_redirected_and_changes_nothing() {
    let app = common::test_app().await;
    let (owner, _) = common::create_user(&app, "owner", Role::Restaurant, false, false).await;
    let (_, other_token) = common::create_user(&app, "rival", Role::Restaurant, false, false).await;
    let id = common::insert_restaurant(&app.db, owner, "Mine", RestaurantCategory::Cafe, RestaurantStatus::Active, 4.0, 1).await;
    let before = stored(&app, id).await;

    let response = common::patch_json_with_auth(
        &app,
        &format!("/api/v1/restaurants/{id}"),
        &json!({ "name": "Stolen" }),
        &other_token,
    )
    .await;

    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location.as_deref(), Some("/api/v1/restaurants/mine"));
    assert_eq!(response.body["redirect"], "/api/v1/restaurants/mine");
    assert_eq!(stored(&app, id).await, before);

    let response = common::delete_with_auth(&app, &format!("/api/v1/restaurants/{id}"), &other_token).await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert!(stored(&app, id).await.is_some());
}

#[tokio::test]
async fn owner_updates_descriptive_fields_but_not_status() {
    let app = common::test_app().await;
    let (owner, token) = common::create_user(&app, "owner", Role::Restaurant, false, false).await;
    let id = common::insert_restaurant(&app.db, owner, "Mine", RestaurantCategory::Cafe, RestaurantStatus::Pending, 0.0, 1).await;
    let uri = format!("/api/v1/restaurants/{id}");

    let response = common::patch_json_with_auth(
        &app,
        &uri,
        &json!({ "name": "Mine Renamed", "website": "https://mine.example.com", "closing_time": "21:00" }),
        &token,
    )
    .await;
    assert_eq!(response.status, StatusCode::OK, "{}", response.body);
    assert_eq!(response.body["name"], "Mine Renamed");
    assert_eq!(response.body["website"], "https://mine.example.com");
    assert_eq!(response.body["closing_time"], "21:00:00");

    let response =
        common::patch_json_with_auth(&app, &uri, &json!({ "status": "active" }), &token).await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert!(stored(&app, id).await.is_some_and(|r| r.status == "pending"));
}

#[tokio::test]
async fn staff_can_activate_a_restaurant() {
    let app = common::test_app().await;
    let (owner, _) = common::create_user(&app, "owner", Role::Restaurant, false, false).await;
    let (_, staff_token) = common::create_user(&app, "staffer", Role::Admin, true, false).await;
    let id = common::insert_restaurant(&app.db, owner, "Mine", RestaurantCategory::Cafe, RestaurantStatus::Pending, 0.0, 1).await;

    let response = common::patch_json_with_auth(
        &app,
        &format!("/api/v1/restaurants/{id}"),
        &json!({ "status": "active" }),
        &staff_token,
    )
    .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "active");
    let listed = common::get(&app, "/api/v1/restaurants").await;
    assert_eq!(names(&listed.body), vec!["Mine"]);
}

#[tokio::test]
async fn delete_cascades_to_menu_items() {
    let app = common::test_app().await;
    let (owner, token) = common::create_user(&app, "owner", Role::Restaurant, false, false).await;
    let id = common::insert_restaurant(&app.db, owner, "Mine", RestaurantCategory::Cafe, RestaurantStatus::Active, 0.0, 1).await;
    common::insert_menu_item(&app.db, id, "Latte", MenuCategory::Beverage, true).await;

    let response = common::delete_with_auth(&app, &format!("/api/v1/restaurants/{id}"), &token).await;

    assert_eq!(response.status, StatusCode::NO_CONTENT);
    assert!(stored(&app, id).await.is_none());
    assert_eq!(
        menu_item::Entity::find()
            .filter(menu_item::Column::RestaurantId.eq(id))
            .count(&app.db)
            .await
            .unwrap_or_default(),
        0
    );
}

#[tokio::test]
async fn mine_lists_only_own_restaurants() {
    let app = common::test_app().await;
    let (owner, token) = common::create_user(&app, "owner", Role::Restaurant, false, false).await;
    let (other, _) = common::create_user(&app, "other", Role::Restaurant, false, false).await;
    let (_, root_token) = common::create_user(&app, "root", Role::Superuser, false, true).await;
    common::insert_restaurant(&app.db, owner, "Mine", RestaurantCategory::Cafe, RestaurantStatus::Pending, 0.0, 1).await;
    common::insert_restaurant(&app.db, other, "Theirs", RestaurantCategory::Cafe, RestaurantStatus::Active, 0.0, 1).await;

    let response = common::get_with_auth(&app, "/api/v1/restaurants/mine", &token).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(names(&response.body), vec!["Mine"]);

    let response = common::get_with_auth(&app, "/api/v1/restaurants/mine", &root_token).await;
    assert_eq!(response.body["total"], 2);
}

#[tokio::test]
async fn dashboard_counts_menu_items() {
    let app = common::test_app().await;
    let (owner, token) = common::create_user(&app, "owner", Role::Restaurant, false, false).await;
    let (_, stranger_token) = common::create_user(&app, "nosy", Role::Customer, false, false).await;
    let id = common::insert_restaurant(&app.db, owner, "Mine", RestaurantCategory::Cafe, RestaurantStatus::Active, 0.0, 1).await;
    for (name, veggie) in [("Salad", true), ("Steak", false), ("Soup", true)] {
        common::insert_menu_item(&app.db, id, name, MenuCategory::MainCourse, veggie).await;
    }
    let uri = format!("/api/v1/restaurants/{id}/dashboard");

    let response = common::get_with_auth(&app, &uri, &token).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["total_items"], 3);
    assert_eq!(response.body["available_items"], 3);
    assert_eq!(response.body["vegetarian_items"], 2);
    assert_eq!(response.body["recent_items"].as_array().map(Vec::len), Some(3));
    assert_eq!(response.body["restaurant"]["id"], id.to_string());

    let response = common::get_with_auth(&app, &uri, &stranger_token).await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location.as_deref(), Some("/api/v1/restaurants"));
}

#[tokio::test]
async fn missing_restaurant_is_404() {
    let app = common::test_app().await;
    let (_, token) = common::create_user(&app, "owner", Role::Restaurant, false, false).await;
    let response = common::patch_json_with_auth(
        &app,
        &format!("/api/v1/restaurants/{}", Uuid::new_v4()),
        &json!({ "name": "x" }),
        &token,
    )
    .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}
