use chrono::{Duration, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::config::VerificationSettings;
use crate::entities::{user, user_profile};
use crate::error::AppError;
use crate::utils::generate_verification_code;

pub const INVALID_CODE: &str = "Invalid verification code.";
const TOO_MANY_ATTEMPTS: &str =
    "Invalid verification code. Too many failed attempts; request a new code.";

/// Result of a resend request, rendered as `{ success, message }`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResendOutcome {
    Sent,
    AlreadyVerified,
    UnknownUser,
}

pub struct VerificationService;

impl VerificationService {
    /// Store a fresh code on `profile`, replacing any previous one, and reset the attempt budget.
    ///
    /// The code is logged for out-of-band delivery and returned to the caller.
    ///
    /// # Errors
    ///
    /// Returns a database error if the profile cannot be updated.
    pub async fn generate_code<C: ConnectionTrait>(
        db: &C,
        profile: user_profile::Model,
        settings: &VerificationSettings,
    ) -> Result<(user_profile::Model, String), DbErr> {
        let code = generate_verification_code();
        let now = Utc::now();
        let expires_at = i64::try_from(settings.code_ttl_secs)
            .ok()
            .and_then(Duration::try_seconds)
            .and_then(|ttl| now.checked_add_signed(ttl))
            .ok_or_else(|| DbErr::Custom("verification code lifetime out of range".to_string()))?;

        let user_id = profile.user_id;
        let mut active: user_profile::ActiveModel = profile.into();
        active.verification_code = Set(Some(code.clone()));
        active.code_expires_at = Set(Some(expires_at.fixed_offset()));
        active.failed_attempts = Set(0);
        active.updated_at = Set(now.fixed_offset());
        let profile = active.update(db).await?;

        tracing::info!(
            %user_id,
            code = %code,
            expires_at = %expires_at,
            "Verification code generated (delivery not yet implemented)"
        );

        Ok((profile, code))
    }

    /// Check `code` against the account's stored code and, on a match, activate the account.
    ///
    /// A mismatch only spends one attempt; when the budget runs out the code is discarded.
    /// The consume step is conditional on the stored code, so of two concurrent correct
    /// submissions exactly one succeeds.
    ///
    /// # Errors
    ///
    /// - [`AppError::NotFound`] for an unknown account
    /// - [`AppError::BadRequest`] for a wrong, expired, exhausted or already-used code
    pub async fn submit_code(
        db: &DatabaseConnection,
        user_id: Uuid,
        code: &str,
        settings: &VerificationSettings,
    ) -> Result<user::Model, AppError> {
        let profile = Self::find_profile(db, user_id).await?;

        if profile.is_verified {
            return Err(AppError::BadRequest(
                "This account is already verified.".to_string(),
            ));
        }

        let Some(stored) = profile.verification_code.as_deref() else {
            return Err(AppError::BadRequest(
                "No active verification code. Request a new one.".to_string(),
            ));
        };

        let now = Utc::now().fixed_offset();
        if profile.code_expires_at.is_none_or(|expires_at| expires_at <= now) {
            return Err(AppError::BadRequest(
                "Verification code has expired. Request a new one.".to_string(),
            ));
        }

        if profile.failed_attempts >= settings.max_attempts {
            return Err(AppError::BadRequest(TOO_MANY_ATTEMPTS.to_string()));
        }

        if stored != code {
            return Err(Self::record_failure(db, &profile, settings).await?);
        }

        let txn = db.begin().await?;

        let consumed = user_profile::Entity::update_many()
            .col_expr(user_profile::Column::VerificationCode, Expr::value(Option::<String>::None))
            .col_expr(
                user_profile::Column::CodeExpiresAt,
                Expr::value(Option::<chrono::DateTime<chrono::FixedOffset>>::None),
            )
            .col_expr(user_profile::Column::FailedAttempts, Expr::value(0))
            .col_expr(user_profile::Column::IsVerified, Expr::value(true))
            .col_expr(user_profile::Column::UpdatedAt, Expr::value(now))
            .filter(user_profile::Column::UserId.eq(user_id))
            .filter(user_profile::Column::VerificationCode.eq(code))
            .filter(user_profile::Column::IsVerified.eq(false))
            .filter(user_profile::Column::FailedAttempts.lt(settings.max_attempts))
            .filter(user_profile::Column::CodeExpiresAt.gt(now))
            .exec(&txn)
            .await?;

        if consumed.rows_affected != 1 {
            txn.rollback().await?;
            return Err(AppError::BadRequest(INVALID_CODE.to_string()));
        }

        let user_model = user::Entity::find_by_id(user_id)
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found.".to_string()))?;

        let mut active: user::ActiveModel = user_model.into();
        active.is_active = Set(true);
        active.email_verified = Set(true);
        active.updated_at = Set(now);
        let user_model = active.update(&txn).await?;

        txn.commit().await?;

        tracing::info!(%user_id, "account verified");
        Ok(user_model)
    }

    /// Issue a new code unless the account is unknown or already verified.
    ///
    /// # Errors
    ///
    /// Returns a database error if the lookup or update fails.
    pub async fn resend(
        db: &DatabaseConnection,
        user_id: Uuid,
        settings: &VerificationSettings,
    ) -> Result<ResendOutcome, AppError> {
        let profile = match Self::find_profile(db, user_id).await {
            Ok(profile) => profile,
            Err(AppError::NotFound(_)) => return Ok(ResendOutcome::UnknownUser),
            Err(e) => return Err(e),
        };

        if profile.is_verified {
            return Ok(ResendOutcome::AlreadyVerified);
        }

        Self::generate_code(db, profile, settings).await?;
        Ok(ResendOutcome::Sent)
    }

    async fn find_profile(
        db: &DatabaseConnection,
        user_id: Uuid,
    ) -> Result<user_profile::Model, AppError> {
        user_profile::Entity::find()
            .filter(user_profile::Column::UserId.eq(user_id))
            .one(db)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found.".to_string()))
    }

    /// Spend one attempt, discarding the code once the counter reaches the budget.
    ///
    /// Both steps read the stored counter, never the copy in `profile`.
    /// Returns the error to report to the caller.
    async fn record_failure(
        db: &DatabaseConnection,
        profile: &user_profile::Model,
        settings: &VerificationSettings,
    ) -> Result<AppError, AppError> {
        let now = Utc::now().fixed_offset();

        user_profile::Entity::update_many()
            .col_expr(
                user_profile::Column::FailedAttempts,
                Expr::col(user_profile::Column::FailedAttempts).add(1),
            )
            .col_expr(user_profile::Column::UpdatedAt, Expr::value(now))
            .filter(user_profile::Column::Id.eq(profile.id))
            .filter(user_profile::Column::IsVerified.eq(false))
            .exec(db)
            .await?;

        let discarded = user_profile::Entity::update_many()
            .col_expr(user_profile::Column::VerificationCode, Expr::value(Option::<String>::None))
            .col_expr(
                user_profile::Column::CodeExpiresAt,
                Expr::value(Option::<chrono::DateTime<chrono::FixedOffset>>::None),
            )
            .filter(user_profile::Column::Id.eq(profile.id))
            .filter(user_profile::Column::IsVerified.eq(false))
            .filter(user_profile::Column::VerificationCode.is_not_null())
            .filter(user_profile::Column::FailedAttempts.gte(settings.max_attempts))
            .exec(db)
            .await?;
        let exhausted = discarded.rows_affected > 0;

        tracing::warn!(user_id = %profile.user_id, exhausted, "verification code mismatch");

        if exhausted {
            Ok(AppError::BadRequest(TOO_MANY_ATTEMPTS.to_string()))
        } else {
            Ok(AppError::BadRequest(INVALID_CODE.to_string()))
        }
    }
}
