use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::choices::Role;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: String,
    pub is_active: bool,
    pub is_staff: bool,
    pub is_superuser: bool,
    pub email_verified: bool,
    pub last_login_at: Option<DateTimeWithTimeZone>,
    pub last_login_ip: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_one = "super::user_profile::Entity")]
    UserProfile,
    #[sea_orm(has_one = "super::restaurant_profile::Entity")]
    RestaurantProfile,
    #[sea_orm(has_one = "super::driver_profile::Entity")]
    DriverProfile,
    #[sea_orm(has_many = "super::restaurant::Entity")]
    Restaurant,
    #[sea_orm(has_many = "super::refresh_token::Entity")]
    RefreshToken,
}

impl Related<super::user_profile::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UserProfile.def()
    }
}

impl Related<super::restaurant_profile::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RestaurantProfile.def()
    }
}

impl Related<super::driver_profile::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DriverProfile.def()
    }
}

impl Related<super::restaurant::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Restaurant.def()
    }
}

impl Related<super::refresh_token::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RefreshToken.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Parsed account role. Unknown strings fall back to `Customer`.
    #[must_use]
    pub fn role(&self) -> Role {
        Role::parse(&self.role).unwrap_or(Role::Customer)
    }

    /// Staff and superusers may act on any restaurant or profile.
    #[must_use]
    pub const fn is_privileged(&self) -> bool {
        self.is_superuser || self.is_staff
    }
}
