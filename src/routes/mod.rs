mod admin;
mod auth;
mod dashboard;
mod drivers;
mod health;
mod menu;
mod restaurants;
mod users;

use axum::Router;

use crate::state::AppState;

/// Build the complete application router.
///
/// Structure:
/// - `GET /health` lightweight liveness check
/// - `/api/v1/health` health check with database connectivity
/// - `/api/v1/auth/...` registration, verification, login, token refresh, logout
/// - `/api/v1/dashboard` redirect to the caller's landing page
/// - `/api/v1/users/me` current account
/// - `/api/v1/restaurants/...` restaurant and menu management
/// - `/api/v1/drivers/me` driver self-service
/// - `/api/v1/admin/...` staff review and account removal
pub fn router() -> Router<AppState> {
    let api_v1 = Router::new()
        .merge(health::api_router())
        .nest("/auth", auth::router())
        .merge(dashboard::router())
        .nest("/users", users::router())
        .nest("/restaurants", restaurants::router().merge(menu::router()))
        .nest("/drivers", drivers::router())
        .nest("/admin", admin::router());

    Router::new()
        .merge(health::root_router())
        .nest("/api/v1", api_v1)
}
