pub mod accounts;
pub mod registration;
pub mod verification;

pub use accounts::AccountService;
pub use registration::{RegistrationService, RoleDetails};
pub use verification::VerificationService;

use sea_orm::DbErr;

use crate::db::is_unique_violation;
use crate::error::AppError;

/// Map a failed write: a concurrent duplicate is a 409, anything else a 500.
pub fn store_error(err: DbErr, what: &str) -> AppError {
    if is_unique_violation(&err) {
        tracing::info!(%what, "unique constraint rejected write");
        AppError::Conflict(format!("A {what} with these details already exists."))
    } else {
        AppError::Internal(err.into())
    }
}
