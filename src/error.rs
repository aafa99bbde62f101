use std::collections::BTreeMap;

use axum::Json;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use serde_json::json;

/// Unified application error type that maps to JSON HTTP responses.
///
/// Body format: `{ "error": { "code": "...", "message": "...", "fields": { ... } } }`.
/// Permission denials are the exception: they render as a `303 See Other` towards the
/// caller's landing page with `{ "redirect": "...", "message": "..." }`.
#[derive(Debug)]
pub enum AppError {
    /// 400 Bad Request
    BadRequest(String),
    /// 401 Unauthorized
    Unauthorized(String),
    /// 403 Forbidden
    Forbidden(String),
    /// 404 Not Found
    NotFound(String),
    /// 409 Conflict
    Conflict(String),
    /// 422 Unprocessable Entity, one or more messages per field
    Validation(FieldErrors),
    /// 303 See Other with a user-visible message
    Redirect { location: String, message: String },
    /// 500 Internal Server Error (wraps any error, logs details, returns generic message)
    Internal(anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message, fields) = match self {
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg, None),
            Self::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg, None),
            Self::Forbidden(msg) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg, None),
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg, None),
            Self::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg, None),
            Self::Validation(fields) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "VALIDATION_ERROR",
                "Please correct the errors below.".to_string(),
                Some(fields),
            ),
            Self::Redirect { location, message } => {
                tracing::debug!(%location, %message, "permission denied, redirecting");
                return (
                    StatusCode::SEE_OTHER,
                    [(header::LOCATION, location.clone())],
                    Json(json!({
                        "redirect": location,
                        "message": message,
                    })),
                )
                    .into_response();
            }
            Self::Internal(err) => {
                tracing::error!("Internal server error: {err:#}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                    None,
                )
            }
        };

        let mut error = json!({
            "code": code,
            "message": message,
        });
        if let Some(fields) = fields {
            error["fields"] = json!(fields);
        }

        (status, Json(json!({ "error": error }))).into_response()
    }
}

/// Allow `?` to automatically convert any `anyhow::Error` into `AppError::Internal`.
impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self::Internal(err.into())
    }
}

/// Per-field validation messages, keyed by request field name.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    /// Fold another set of errors into this one.
    pub fn merge(&mut self, other: Self) {
        for (field, messages) in other.0 {
            self.0.entry(field).or_default().extend(messages);
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    /// `Ok(())` when no field failed, otherwise a 422 carrying every message.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] when at least one field has an error.
    pub fn into_result(self) -> Result<(), AppError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(self))
        }
    }
}

impl From<validator::ValidationErrors> for FieldErrors {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields = Self::new();
        for (field, errs) in errors.field_errors() {
            for err in errs {
                let message = err
                    .message
                    .as_ref()
                    .map_or_else(|| format!("Invalid value ({}).", err.code), ToString::to_string);
                fields.add(field.as_ref(), message);
            }
        }
        fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_errors_merge_keeps_all_messages() {
        let mut a = FieldErrors::new();
        a.add("username", "Required.");
        let mut b = FieldErrors::new();
        b.add("username", "Taken.");
        b.add("phone", "Too long.");
        a.merge(b);

        let value = serde_json::to_value(&a).unwrap_or_default();
        assert_eq!(value["username"], json!(["Required.", "Taken."]));
        assert_eq!(value["phone"], json!(["Too long."]));
    }

    #[test]
    fn test_into_result() {
        assert!(FieldErrors::new().into_result().is_ok());

        let mut errors = FieldErrors::new();
        errors.add("code", "Enter the 6-digit code.");
        assert!(matches!(errors.into_result(), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_redirect_renders_see_other() {
        let response = AppError::Redirect {
            location: "/api/v1/restaurants".to_string(),
            message: "nope".to_string(),
        }
        .into_response();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response
                .headers()
                .get(header::LOCATION)
                .and_then(|v| v.to_str().ok()),
            Some("/api/v1/restaurants")
        );
    }
}
