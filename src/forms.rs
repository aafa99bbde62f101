//! Request bodies and their field rules.
//!
//! Declarative limits live on the `validator` derives. Rules that need more than one
//! field (password confirmation) or the database (uniqueness) are checked by the
//! services, which merge everything into one [`FieldErrors`] so the client sees all
//! problems at once.

use std::borrow::Cow;

use chrono::NaiveTime;
use serde::Deserialize;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::auth::password;
use crate::entities::choices::{
    ApprovalStatus, MenuCategory, RestaurantCategory, RestaurantStatus, VehicleType,
};
use crate::error::FieldErrors;
use crate::utils::is_well_formed_code;

const REQUIRED: &str = "This field is required.";

fn invalid(code: &'static str, message: &'static str) -> ValidationError {
    ValidationError::new(code).with_message(Cow::Borrowed(message))
}

fn choice<T>(value: &str, parse: fn(&str) -> Option<T>) -> Result<(), ValidationError> {
    parse(value)
        .map(|_| ())
        .ok_or_else(|| invalid("choice", "Select a valid choice."))
}

fn username_chars(value: &str) -> Result<(), ValidationError> {
    password::validate_username(value).map_err(|msg| invalid("username", msg))
}

fn vehicle_choice(value: &str) -> Result<(), ValidationError> {
    choice(value, VehicleType::parse)
}

fn restaurant_category(value: &str) -> Result<(), ValidationError> {
    choice(value, RestaurantCategory::parse)
}

fn restaurant_status(value: &str) -> Result<(), ValidationError> {
    choice(value, RestaurantStatus::parse)
}

fn menu_category(value: &str) -> Result<(), ValidationError> {
    choice(value, MenuCategory::parse)
}

fn approval_status(value: &str) -> Result<(), ValidationError> {
    choice(value, ApprovalStatus::parse)
}

fn six_digit_code(value: &str) -> Result<(), ValidationError> {
    if is_well_formed_code(value) {
        Ok(())
    } else {
        Err(invalid("code", "Enter the 6-digit verification code."))
    }
}

fn time_of_day(value: &str) -> Result<(), ValidationError> {
    parse_time(value)
        .map(|_| ())
        .ok_or_else(|| invalid("time", "Enter a valid time (HH:MM or HH:MM:SS)."))
}

fn website_url(value: &str) -> Result<(), ValidationError> {
    let ok = value.is_empty()
        || ((value.starts_with("http://") || value.starts_with("https://"))
            && !value.contains(char::is_whitespace)
            && value.len() <= 200);
    if ok {
        Ok(())
    } else {
        Err(invalid("url", "Enter a valid URL."))
    }
}

/// `HH:MM` or `HH:MM:SS`.
#[must_use]
pub fn parse_time(value: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(value, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M"))
        .ok()
}

const fn default_true() -> bool {
    true
}

const fn default_preparation_time() -> i32 {
    15
}

fn default_opening_time() -> String {
    "09:00:00".to_string()
}

fn default_closing_time() -> String {
    "22:00:00".to_string()
}

fn default_category() -> String {
    RestaurantCategory::Other.as_str().to_string()
}

// ─────────────────────────────────────────────────────────────────────────────
// Registration
// ─────────────────────────────────────────────────────────────────────────────

/// Fields shared by every registration form.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AccountForm {
    #[validate(
        length(min = 1, max = 150, message = "Ensure this value has 1 to 150 characters."),
        custom(function = "username_chars")
    )]
    pub username: String,

    #[validate(email(message = "Enter a valid email address."))]
    pub email: String,

    #[validate(length(min = 1, max = 30, message = "Ensure this value has 1 to 30 characters."))]
    pub first_name: String,

    #[validate(length(min = 1, max = 30, message = "Ensure this value has 1 to 30 characters."))]
    pub last_name: String,

    #[validate(length(min = 1, max = 15, message = "Ensure this value has 1 to 15 characters."))]
    pub phone: String,

    #[validate(length(min = 1, message = "This field is required."))]
    pub address: String,

    pub password1: String,
    pub password2: String,
}

impl AccountForm {
    /// Every field rule, including the password checks the derive cannot express.
    #[must_use]
    pub fn field_errors(&self) -> FieldErrors {
        let mut errors = self.validate().err().map(FieldErrors::from).unwrap_or_default();

        if self.password1.is_empty() {
            errors.add("password1", REQUIRED);
        } else {
            for problem in password::password_problems(&self.password1, &self.username) {
                errors.add("password2", problem);
            }
        }
        if self.password2.is_empty() {
            errors.add("password2", REQUIRED);
        } else if self.password1 != self.password2 {
            errors.add("password2", "The two password fields didn't match.");
        }
        errors
    }
}

/// Business details captured when a restaurant owner signs up.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct BusinessForm {
    #[validate(length(min = 1, max = 200, message = "Ensure this value has 1 to 200 characters."))]
    pub business_name: String,

    #[validate(length(min = 1, max = 100, message = "Ensure this value has 1 to 100 characters."))]
    pub business_license: String,

    #[validate(length(min = 1, message = "This field is required."))]
    pub business_address: String,

    #[validate(length(min = 1, max = 15, message = "Ensure this value has 1 to 15 characters."))]
    pub business_phone: String,

    #[validate(email(message = "Enter a valid email address."))]
    pub business_email: String,
}

/// Vehicle details captured when a driver signs up.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct VehicleForm {
    #[validate(length(min = 1, max = 50, message = "Ensure this value has 1 to 50 characters."))]
    pub license_number: String,

    #[validate(custom(function = "vehicle_choice"))]
    pub vehicle_type: String,

    #[validate(length(min = 1, max = 20, message = "Ensure this value has 1 to 20 characters."))]
    pub vehicle_plate: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RestaurantRegistration {
    #[serde(flatten)]
    pub account: AccountForm,
    #[serde(flatten)]
    pub business: BusinessForm,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DriverRegistration {
    #[serde(flatten)]
    pub account: AccountForm,
    #[serde(flatten)]
    pub vehicle: VehicleForm,
}

// ─────────────────────────────────────────────────────────────────────────────
// Verification & sessions
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct VerificationForm {
    #[validate(custom(function = "six_digit_code"))]
    pub code: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginForm {
    #[validate(length(min = 1, message = "This field is required."))]
    pub username: String,
    #[validate(length(min = 1, message = "This field is required."))]
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RefreshForm {
    pub refresh_token: String,
}

// ─────────────────────────────────────────────────────────────────────────────
// Restaurants & menu
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateRestaurantForm {
    #[validate(length(min = 1, max = 200, message = "Ensure this value has 1 to 200 characters."))]
    pub name: String,

    #[serde(default)]
    pub description: String,

    #[serde(default = "default_category")]
    #[validate(custom(function = "restaurant_category"))]
    pub category: String,

    #[validate(length(min = 1, message = "This field is required."))]
    pub address: String,

    #[validate(length(min = 1, max = 20, message = "Ensure this value has 1 to 20 characters."))]
    pub phone: String,

    #[validate(email(message = "Enter a valid email address."))]
    pub email: String,

    #[validate(custom(function = "website_url"))]
    pub website: Option<String>,

    #[serde(default = "default_opening_time")]
    #[validate(custom(function = "time_of_day"))]
    pub opening_time: String,

    #[serde(default = "default_closing_time")]
    #[validate(custom(function = "time_of_day"))]
    pub closing_time: String,

    #[serde(default = "default_true")]
    pub is_delivery_available: bool,

    #[serde(default)]
    #[validate(range(min = 0, message = "Ensure this value is greater than or equal to 0."))]
    pub delivery_fee_cents: i64,

    #[serde(default)]
    #[validate(range(min = 0, message = "Ensure this value is greater than or equal to 0."))]
    pub minimum_order_cents: i64,

    #[validate(custom(function = "restaurant_status"))]
    pub status: Option<String>,

    /// Defaults to the creating staff member.
    pub owner_id: Option<Uuid>,
}

/// Partial update. Absent fields are left untouched; `rating` and `total_reviews`
/// are not accepted at all.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateRestaurantForm {
    #[validate(length(min = 1, max = 200, message = "Ensure this value has 1 to 200 characters."))]
    pub name: Option<String>,

    pub description: Option<String>,

    #[validate(custom(function = "restaurant_category"))]
    pub category: Option<String>,

    #[validate(length(min = 1, message = "This field is required."))]
    pub address: Option<String>,

    #[validate(length(min = 1, max = 20, message = "Ensure this value has 1 to 20 characters."))]
    pub phone: Option<String>,

    #[validate(email(message = "Enter a valid email address."))]
    pub email: Option<String>,

    /// An empty string clears the website.
    #[validate(custom(function = "website_url"))]
    pub website: Option<String>,

    #[validate(custom(function = "time_of_day"))]
    pub opening_time: Option<String>,

    #[validate(custom(function = "time_of_day"))]
    pub closing_time: Option<String>,

    pub is_delivery_available: Option<bool>,

    #[validate(range(min = 0, message = "Ensure this value is greater than or equal to 0."))]
    pub delivery_fee_cents: Option<i64>,

    #[validate(range(min = 0, message = "Ensure this value is greater than or equal to 0."))]
    pub minimum_order_cents: Option<i64>,

    #[validate(custom(function = "restaurant_status"))]
    pub status: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateMenuItemForm {
    #[validate(length(min = 1, max = 200, message = "Ensure this value has 1 to 200 characters."))]
    pub name: String,

    #[serde(default)]
    pub description: String,

    #[validate(range(min = 0, message = "Ensure this value is greater than or equal to 0."))]
    pub price_cents: i64,

    #[validate(custom(function = "menu_category"))]
    pub category: String,

    #[serde(default = "default_true")]
    pub is_available: bool,

    #[serde(default)]
    pub is_vegetarian: bool,

    #[serde(default)]
    pub is_vegan: bool,

    #[serde(default = "default_preparation_time")]
    #[validate(range(min = 0, message = "Ensure this value is greater than or equal to 0."))]
    pub preparation_time: i32,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateMenuItemForm {
    #[validate(length(min = 1, max = 200, message = "Ensure this value has 1 to 200 characters."))]
    pub name: Option<String>,

    pub description: Option<String>,

    #[validate(range(min = 0, message = "Ensure this value is greater than or equal to 0."))]
    pub price_cents: Option<i64>,

    #[validate(custom(function = "menu_category"))]
    pub category: Option<String>,

    pub is_available: Option<bool>,
    pub is_vegetarian: Option<bool>,
    pub is_vegan: Option<bool>,

    #[validate(range(min = 0, message = "Ensure this value is greater than or equal to 0."))]
    pub preparation_time: Option<i32>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Drivers & administration
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AvailabilityForm {
    pub is_available: bool,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ApprovalForm {
    #[validate(custom(function = "approval_status"))]
    pub status: String,
}
