use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    Set, TransactionTrait,
};
use uuid::Uuid;
use validator::Validate;

use crate::auth::password;
use crate::config::VerificationSettings;
use crate::entities::choices::{ApprovalStatus, Role};
use crate::entities::{driver_profile, restaurant_profile, user, user_profile};
use crate::error::{AppError, FieldErrors};
use crate::forms::{AccountForm, BusinessForm, VehicleForm};
use crate::services::{VerificationService, store_error};

/// Role-specific part of a registration.
#[derive(Debug, Clone)]
pub enum RoleDetails {
    Customer,
    Restaurant(BusinessForm),
    Driver(VehicleForm),
}

impl RoleDetails {
    const fn role(&self) -> Role {
        match self {
            Self::Customer => Role::Customer,
            Self::Restaurant(_) => Role::Restaurant,
            Self::Driver(_) => Role::Driver,
        }
    }

    fn field_errors(&self) -> FieldErrors {
        let result = match self {
            Self::Customer => Ok(()),
            Self::Restaurant(business) => business.validate(),
            Self::Driver(vehicle) => vehicle.validate(),
        };
        result.err().map(FieldErrors::from).unwrap_or_default()
    }
}

/// Records created by a successful registration.
#[derive(Debug)]
pub struct Registered {
    pub user: user::Model,
    pub profile: user_profile::Model,
}

pub struct RegistrationService;

impl RegistrationService {
    /// Validate, then create the user, its profile and the role profile in one transaction.
    ///
    /// The first verification code is issued inside the same transaction, so a
    /// failure anywhere leaves nothing behind.
    ///
    /// # Errors
    ///
    /// - [`AppError::Validation`] with every field problem, uniqueness included
    /// - [`AppError::Conflict`] when a concurrent registration wins a unique constraint
    pub async fn register(
        db: &DatabaseConnection,
        settings: &VerificationSettings,
        account: AccountForm,
        details: RoleDetails,
    ) -> Result<Registered, AppError> {
        let mut errors = account.field_errors();
        errors.merge(details.field_errors());
        errors.merge(Self::uniqueness_errors(db, &account, &details).await?);
        errors.into_result()?;

        let role = details.role();
        let password_hash = password::hash_password(&account.password1)?;
        let now = Utc::now().fixed_offset();
        let user_id = Uuid::new_v4();

        let txn = db.begin().await?;

        let user_model = user::ActiveModel {
            id: Set(user_id),
            username: Set(account.username),
            email: Set(account.email.trim().to_lowercase()),
            first_name: Set(account.first_name),
            last_name: Set(account.last_name),
            password_hash: Set(password_hash),
            role: Set(role.as_str().to_string()),
            is_active: Set(false),
            is_staff: Set(false),
            is_superuser: Set(false),
            email_verified: Set(false),
            last_login_at: Set(None),
            last_login_ip: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await
        .map_err(|e| store_error(e, "user"))?;

        let profile = user_profile::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            role: Set(role.profile_role().as_str().to_string()),
            phone: Set(account.phone),
            address: Set(account.address),
            verification_code: Set(None),
            code_expires_at: Set(None),
            failed_attempts: Set(0),
            is_verified: Set(false),
            date_joined: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await
        .map_err(|e| store_error(e, "profile"))?;

        match details {
            RoleDetails::Customer => {}
            RoleDetails::Restaurant(business) => {
                restaurant_profile::ActiveModel {
                    id: Set(Uuid::new_v4()),
                    user_id: Set(user_id),
                    business_name: Set(business.business_name),
                    business_license: Set(business.business_license),
                    business_address: Set(business.business_address),
                    business_phone: Set(business.business_phone),
                    business_email: Set(business.business_email),
                    status: Set(ApprovalStatus::Pending.as_str().to_string()),
                    created_at: Set(now),
                    updated_at: Set(now),
                }
                .insert(&txn)
                .await
                .map_err(|e| store_error(e, "restaurant profile"))?;
            }
            RoleDetails::Driver(vehicle) => {
                driver_profile::ActiveModel {
                    id: Set(Uuid::new_v4()),
                    user_id: Set(user_id),
                    license_number: Set(vehicle.license_number),
                    vehicle_type: Set(vehicle.vehicle_type),
                    vehicle_plate: Set(vehicle.vehicle_plate),
                    is_available: Set(false),
                    rating: Set(0.0),
                    total_deliveries: Set(0),
                    status: Set(ApprovalStatus::Pending.as_str().to_string()),
                    created_at: Set(now),
                    updated_at: Set(now),
                }
                .insert(&txn)
                .await
                .map_err(|e| store_error(e, "driver profile"))?;
            }
        }

        let (profile, _code) = VerificationService::generate_code(&txn, profile, settings).await?;

        txn.commit().await?;

        tracing::info!(user_id = %user_model.id, role = %role, "account registered");

        Ok(Registered {
            user: user_model,
            profile,
        })
    }

    /// Field errors for values that must be unique across the store.
    async fn uniqueness_errors(
        db: &DatabaseConnection,
        account: &AccountForm,
        details: &RoleDetails,
    ) -> Result<FieldErrors, AppError> {
        let mut errors = FieldErrors::new();

        let username_taken = user::Entity::find()
            .filter(user::Column::Username.eq(&account.username))
            .count(db)
            .await?
            > 0;
        if username_taken {
            errors.add("username", "A user with that username already exists.");
        }

        match details {
            RoleDetails::Customer => {}
            RoleDetails::Restaurant(business) => {
                let taken = restaurant_profile::Entity::find()
                    .filter(
                        restaurant_profile::Column::BusinessLicense.eq(&business.business_license),
                    )
                    .count(db)
                    .await?
                    > 0;
                if taken {
                    errors.add(
                        "business_license",
                        "A restaurant with this business license already exists.",
                    );
                }
            }
            RoleDetails::Driver(vehicle) => {
                let taken = driver_profile::Entity::find()
                    .filter(driver_profile::Column::LicenseNumber.eq(&vehicle.license_number))
                    .count(db)
                    .await?
                    > 0;
                if taken {
                    errors.add(
                        "license_number",
                        "A driver with this license number already exists.",
                    );
                }
            }
        }

        Ok(errors)
    }
}
