use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;

use crate::auth::middleware::AuthUser;
use crate::permissions::landing_page;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/dashboard", get(dashboard))
}

/// `GET /api/v1/dashboard`: `303 See Other` to the caller's landing page.
async fn dashboard(AuthUser(user_model): AuthUser) -> impl IntoResponse {
    let location = landing_page(&user_model);
    (
        StatusCode::SEE_OTHER,
        [(header::LOCATION, location)],
        Json(json!({ "redirect": location })),
    )
}
