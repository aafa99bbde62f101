use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};
use serde::Serialize;
use uuid::Uuid;

use crate::auth::extract_client_ip;
use crate::entities::{user, user_profile};
use crate::error::AppError;
use crate::extract::{JsonBody, ValidatedJson};
use crate::forms::{
    AccountForm, DriverRegistration, LoginForm, RefreshForm, RestaurantRegistration,
    VerificationForm,
};
use crate::permissions::landing_page;
use crate::services::registration::Registered;
use crate::services::verification::ResendOutcome;
use crate::services::{AccountService, RegistrationService, RoleDetails, VerificationService};
use crate::state::AppState;

// ─────────────────────────────────────────────────────────────────────────────
// Router
// ─────────────────────────────────────────────────────────────────────────────

/// Build the auth route group: `/auth/...`
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register/customer", post(register_customer))
        .route("/register/restaurant", post(register_restaurant))
        .route("/register/driver", post(register_driver))
        .route("/verify/{user_id}", post(verify))
        .route("/verify/{user_id}/resend", post(resend))
        .route("/login", post(login))
        .route("/refresh", post(refresh))
        .route("/logout", post(logout))
}

// ─────────────────────────────────────────────────────────────────────────────
// Responses
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct RegistrationResponse {
    pub user: user::Model,
    pub profile: user_profile::Model,
    pub verification_url: String,
    pub message: &'static str,
}

#[derive(Serialize)]
pub struct VerifyResponse {
    pub user: user::Model,
    pub message: &'static str,
}

#[derive(Serialize)]
pub struct ResendResponse {
    pub success: bool,
    pub message: &'static str,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub user: user::Model,
    pub token: String,
    pub refresh_token: String,
    pub redirect: &'static str,
}

#[derive(Serialize)]
pub struct RefreshResponse {
    pub token: String,
    pub refresh_token: String,
}

fn verification_url(user_id: Uuid) -> String {
    format!("/api/v1/auth/verify/{user_id}")
}

fn registered(registration: Registered) -> impl IntoResponse {
    let url = verification_url(registration.user.id);
    (
        StatusCode::CREATED,
        Json(RegistrationResponse {
            user: registration.user,
            profile: registration.profile,
            verification_url: url,
            message: "Registration successful. Check your messages for a verification code.",
        }),
    )
}

// ─────────────────────────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────────────────────────

/// `POST /api/v1/auth/register/customer`
async fn register_customer(
    State(state): State<AppState>,
    JsonBody(form): JsonBody<AccountForm>,
) -> Result<impl IntoResponse, AppError> {
    let registration = RegistrationService::register(
        &state.db,
        &state.config.verification,
        form,
        RoleDetails::Customer,
    )
    .await?;
    Ok(registered(registration))
}

/// `POST /api/v1/auth/register/restaurant`
async fn register_restaurant(
    State(state): State<AppState>,
    JsonBody(form): JsonBody<RestaurantRegistration>,
) -> Result<impl IntoResponse, AppError> {
    let registration = RegistrationService::register(
        &state.db,
        &state.config.verification,
        form.account,
        RoleDetails::Restaurant(form.business),
    )
    .await?;
    Ok(registered(registration))
}

/// `POST /api/v1/auth/register/driver`
async fn register_driver(
    State(state): State<AppState>,
    JsonBody(form): JsonBody<DriverRegistration>,
) -> Result<impl IntoResponse, AppError> {
    let registration = RegistrationService::register(
        &state.db,
        &state.config.verification,
        form.account,
        RoleDetails::Driver(form.vehicle),
    )
    .await?;
    Ok(registered(registration))
}

/// `POST /api/v1/auth/verify/{user_id}`
async fn verify(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    ValidatedJson(form): ValidatedJson<VerificationForm>,
) -> Result<Json<VerifyResponse>, AppError> {
    let user_model =
        VerificationService::submit_code(&state.db, user_id, &form.code, &state.config.verification)
            .await?;

    Ok(Json(VerifyResponse {
        user: user_model,
        message: "Your account has been verified. You can now log in.",
    }))
}

/// `POST /api/v1/auth/verify/{user_id}/resend`
async fn resend(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let outcome =
        VerificationService::resend(&state.db, user_id, &state.config.verification).await?;

    let (status, success, message) = match outcome {
        ResendOutcome::Sent => (
            StatusCode::OK,
            true,
            "A new verification code has been sent.",
        ),
        ResendOutcome::AlreadyVerified => (
            StatusCode::BAD_REQUEST,
            false,
            "This account is already verified.",
        ),
        ResendOutcome::UnknownUser => (StatusCode::NOT_FOUND, false, "User not found."),
    };

    Ok((status, Json(ResendResponse { success, message })))
}

/// `POST /api/v1/auth/login`
async fn login(
    State(state): State<AppState>,
    headers: HeaderMap,
    ValidatedJson(form): ValidatedJson<LoginForm>,
) -> Result<Json<LoginResponse>, AppError> {
    let (user_model, pair) = AccountService::login(
        &state.db,
        &state.config,
        form.username.trim(),
        &form.password,
        extract_client_ip(&headers),
    )
    .await?;

    let redirect = landing_page(&user_model);
    Ok(Json(LoginResponse {
        user: user_model,
        token: pair.access_token,
        refresh_token: pair.refresh_token,
        redirect,
    }))
}

/// `POST /api/v1/auth/refresh`
async fn refresh(
    State(state): State<AppState>,
    JsonBody(form): JsonBody<RefreshForm>,
) -> Result<Json<RefreshResponse>, AppError> {
    let pair = AccountService::refresh(&state.db, &state.config, &form.refresh_token).await?;
    Ok(Json(RefreshResponse {
        token: pair.access_token,
        refresh_token: pair.refresh_token,
    }))
}

/// `POST /api/v1/auth/logout`
async fn logout(
    State(state): State<AppState>,
    JsonBody(form): JsonBody<RefreshForm>,
) -> Result<StatusCode, AppError> {
    AccountService::logout(&state.db, &state.config, &form.refresh_token).await?;
    Ok(StatusCode::NO_CONTENT)
}
