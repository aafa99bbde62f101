use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
};
use uuid::Uuid;

use crate::auth::jwt::{self, TokenKind, TokenPair};
use crate::auth::password;
use crate::config::{AdminSeed, Config};
use crate::entities::choices::{ProfileRole, Role};
use crate::entities::{refresh_token, user, user_profile};
use crate::error::AppError;

const BAD_CREDENTIALS: &str = "Invalid username or password.";

pub struct AccountService;

impl AccountService {
    /// Check credentials, record the login and hand out a token pair.
    ///
    /// # Errors
    ///
    /// - [`AppError::Unauthorized`] for an unknown user or a wrong password
    /// - [`AppError::Forbidden`] when the account has not been verified yet
    pub async fn login(
        db: &DatabaseConnection,
        config: &Config,
        username: &str,
        password_input: &str,
        client_ip: Option<String>,
    ) -> Result<(user::Model, TokenPair), AppError> {
        let user_model = user::Entity::find()
            .filter(user::Column::Username.eq(username))
            .one(db)
            .await?
            .ok_or_else(|| AppError::Unauthorized(BAD_CREDENTIALS.to_string()))?;

        if !password::verify_password(password_input, &user_model.password_hash)? {
            tracing::info!(user_id = %user_model.id, "login rejected: wrong password");
            return Err(AppError::Unauthorized(BAD_CREDENTIALS.to_string()));
        }

        if !user_model.is_active {
            return Err(AppError::Forbidden(format!(
                "Account is not verified. Submit your code at /api/v1/auth/verify/{}.",
                user_model.id
            )));
        }

        let now = Utc::now().fixed_offset();
        let mut active: user::ActiveModel = user_model.into();
        active.last_login_at = Set(Some(now));
        active.last_login_ip = Set(client_ip);
        active.updated_at = Set(now);
        let user_model = active.update(db).await?;

        let pair = Self::issue_tokens(db, config, &user_model).await?;
        tracing::info!(user_id = %user_model.id, "user logged in");
        Ok((user_model, pair))
    }

    /// Exchange a live refresh token for a new pair. The old token is revoked.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthorized`] if the token is invalid, expired, revoked,
    /// or belongs to an inactive account.
    pub async fn refresh(
        db: &DatabaseConnection,
        config: &Config,
        token: &str,
    ) -> Result<TokenPair, AppError> {
        let claims = jwt::decode_token(token, &config.jwt_secret, TokenKind::Refresh)
            .map_err(|_| AppError::Unauthorized("Invalid or expired refresh token.".to_string()))?;

        let user_model = user::Entity::find_by_id(claims.sub)
            .one(db)
            .await?
            .filter(|u| u.is_active)
            .ok_or_else(|| AppError::Unauthorized("User not found.".to_string()))?;

        if !Self::revoke_jti(db, claims.jti).await? {
            return Err(AppError::Unauthorized(
                "Refresh token has been revoked.".to_string(),
            ));
        }

        Self::issue_tokens(db, config, &user_model).await
    }

    /// Revoke a refresh token.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthorized`] if the token does not decode.
    pub async fn logout(
        db: &DatabaseConnection,
        config: &Config,
        token: &str,
    ) -> Result<(), AppError> {
        let claims = jwt::decode_token(token, &config.jwt_secret, TokenKind::Refresh)
            .map_err(|_| AppError::Unauthorized("Invalid or expired refresh token.".to_string()))?;
        Self::revoke_jti(db, claims.jti).await?;
        tracing::info!(user_id = %claims.sub, "user logged out");
        Ok(())
    }

    /// Create the configured superuser unless that username already exists.
    ///
    /// # Errors
    ///
    /// Returns an error if hashing or any insert fails.
    pub async fn ensure_superuser(db: &DatabaseConnection, seed: &AdminSeed) -> anyhow::Result<()> {
        let existing = user::Entity::find()
            .filter(user::Column::Username.eq(&seed.username))
            .one(db)
            .await?;
        if existing.is_some() {
            tracing::debug!(username = %seed.username, "admin account already present");
            return Ok(());
        }

        let now = Utc::now().fixed_offset();
        let user_id = Uuid::new_v4();

        user::ActiveModel {
            id: Set(user_id),
            username: Set(seed.username.clone()),
            email: Set(seed.email.clone()),
            first_name: Set(String::new()),
            last_name: Set(String::new()),
            password_hash: Set(password::hash_password(&seed.password)?),
            role: Set(Role::Superuser.as_str().to_string()),
            is_active: Set(true),
            is_staff: Set(true),
            is_superuser: Set(true),
            email_verified: Set(true),
            last_login_at: Set(None),
            last_login_ip: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(db)
        .await?;

        user_profile::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            role: Set(ProfileRole::Admin.as_str().to_string()),
            phone: Set(String::new()),
            address: Set(String::new()),
            verification_code: Set(None),
            code_expires_at: Set(None),
            failed_attempts: Set(0),
            is_verified: Set(true),
            date_joined: Set(now),
            updated_at: Set(now),
        }
        .insert(db)
        .await?;

        tracing::info!(username = %seed.username, "admin account created");
        Ok(())
    }

    async fn issue_tokens(
        db: &DatabaseConnection,
        config: &Config,
        user_model: &user::Model,
    ) -> Result<TokenPair, AppError> {
        let pair = jwt::issue_token_pair(user_model.id, &user_model.role, config)?;

        refresh_token::ActiveModel {
            id: Set(pair.refresh_jti),
            user_id: Set(user_model.id),
            expires_at: Set(pair.refresh_expires_at.fixed_offset()),
            revoked_at: Set(None),
            created_at: Set(Utc::now().fixed_offset()),
        }
        .insert(db)
        .await?;

        Ok(pair)
    }

    /// Mark a live token revoked. `false` when it was unknown, expired or already revoked.
    async fn revoke_jti(db: &DatabaseConnection, jti: Uuid) -> Result<bool, AppError> {
        let now = Utc::now().fixed_offset();
        let result = refresh_token::Entity::update_many()
            .col_expr(refresh_token::Column::RevokedAt, Expr::value(Some(now)))
            .filter(refresh_token::Column::Id.eq(jti))
            .filter(refresh_token::Column::RevokedAt.is_null())
            .filter(refresh_token::Column::ExpiresAt.gt(now))
            .exec(db)
            .await?;
        Ok(result.rows_affected == 1)
    }
}
