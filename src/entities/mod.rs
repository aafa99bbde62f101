pub mod choices;
pub mod driver_profile;
pub mod menu_item;
pub mod refresh_token;
pub mod restaurant;
pub mod restaurant_profile;
pub mod user;
pub mod user_profile;
