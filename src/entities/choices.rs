//! Fixed enumerations stored as plain strings in the database.
//!
//! Each enum round-trips through `as_str` / `parse` so handlers can validate
//! incoming values and the ORM models can keep `String` columns.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! string_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $value:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $( $(#[$vmeta])* #[serde(rename = $value)] $variant ),+
        }

        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// Database / wire representation.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $value),+
                }
            }

            /// Parse the exact database / wire representation.
            #[must_use]
            pub fn parse(value: &str) -> Option<Self> {
                match value {
                    $($value => Some(Self::$variant),)+
                    _ => None,
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

string_enum! {
    /// Account role on the `user` row.
    Role {
        Superuser => "superuser",
        Admin => "admin",
        Driver => "driver",
        Restaurant => "restaurant",
        Customer => "customer",
    }
}

string_enum! {
    /// Role recorded on the `user_profile` row.
    ProfileRole {
        User => "USER",
        Restaurant => "RESTAURANT",
        Driver => "DRIVER",
        Admin => "ADMIN",
    }
}

string_enum! {
    /// Review state of restaurant and driver profiles.
    ApprovalStatus {
        Pending => "pending",
        Approved => "approved",
        Rejected => "rejected",
        Suspended => "suspended",
    }
}

string_enum! {
    VehicleType {
        Bicycle => "bicycle",
        Motorcycle => "motorcycle",
        Car => "car",
        Scooter => "scooter",
    }
}

string_enum! {
    RestaurantCategory {
        FastFood => "fast_food",
        Casual => "casual",
        FineDining => "fine_dining",
        Cafe => "cafe",
        Bakery => "bakery",
        Dessert => "dessert",
        Other => "other",
    }
}

string_enum! {
    /// Only `active` restaurants appear in the public listing.
    RestaurantStatus {
        Active => "active",
        Inactive => "inactive",
        Pending => "pending",
    }
}

string_enum! {
    MenuCategory {
        Appetizer => "appetizer",
        MainCourse => "main_course",
        Dessert => "dessert",
        Beverage => "beverage",
        Side => "side",
        Special => "special",
    }
}

impl Role {
    /// The profile role created alongside an account of this role.
    #[must_use]
    pub const fn profile_role(self) -> ProfileRole {
        match self {
            Self::Customer => ProfileRole::User,
            Self::Restaurant => ProfileRole::Restaurant,
            Self::Driver => ProfileRole::Driver,
            Self::Admin | Self::Superuser => ProfileRole::Admin,
        }
    }
}
