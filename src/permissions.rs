//! Capability checks and role-based landing pages.
//!
//! Every owner-or-staff decision in the route handlers goes through [`check`].
//! A denial is never an error page: the caller is redirected to [`landing_page`].

use uuid::Uuid;

use crate::entities::choices::Role;
use crate::entities::{restaurant, user};
use crate::error::AppError;

pub const ADMIN_LANDING: &str = "/api/v1/admin/overview";
pub const RESTAURANT_LANDING: &str = "/api/v1/restaurants/mine";
pub const DRIVER_LANDING: &str = "/api/v1/drivers/me";
pub const CUSTOMER_LANDING: &str = "/api/v1/restaurants";

/// Where a principal is sent by the dashboard and by permission denials.
#[must_use]
pub fn landing_page(principal: &user::Model) -> &'static str {
    if principal.is_privileged() {
        return ADMIN_LANDING;
    }
    match principal.role() {
        Role::Superuser | Role::Admin => ADMIN_LANDING,
        Role::Restaurant => RESTAURANT_LANDING,
        Role::Driver => DRIVER_LANDING,
        Role::Customer => CUSTOMER_LANDING,
    }
}

/// A record with a single owning user.
pub trait Owned {
    fn owner_id(&self) -> Uuid;
}

impl Owned for restaurant::Model {
    fn owner_id(&self) -> Uuid {
        self.owner_id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Allow,
    Deny,
}

/// Superusers, staff and the owner may manage a resource. Nobody else may.
#[must_use]
pub fn check(principal: &user::Model, resource: &impl Owned) -> Access {
    if principal.is_privileged() || resource.owner_id() == principal.id {
        Access::Allow
    } else {
        Access::Deny
    }
}

/// Redirect `principal` to their landing page with `message`.
#[must_use]
pub fn deny(principal: &user::Model, message: &str) -> AppError {
    AppError::Redirect {
        location: landing_page(principal).to_string(),
        message: message.to_string(),
    }
}

/// [`check`], turning a denial into a redirect.
///
/// # Errors
///
/// Returns [`AppError::Redirect`] when the principal may not manage `resource`.
pub fn ensure(principal: &user::Model, resource: &impl Owned, message: &str) -> Result<(), AppError> {
    match check(principal, resource) {
        Access::Allow => Ok(()),
        Access::Deny => {
            tracing::warn!(user_id = %principal.id, owner_id = %resource.owner_id(), "access denied");
            Err(deny(principal, message))
        }
    }
}
