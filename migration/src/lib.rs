pub use sea_orm_migration::prelude::*;

mod m20260301_000001_create_user_table;
mod m20260301_000002_create_user_profile_table;
mod m20260301_000003_create_restaurant_profile_table;
mod m20260301_000004_create_driver_profile_table;
mod m20260301_000005_create_refresh_token_table;
mod m20260302_000001_create_restaurant_table;
mod m20260302_000002_create_menu_item_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260301_000001_create_user_table::Migration),
            Box::new(m20260301_000002_create_user_profile_table::Migration),
            Box::new(m20260301_000003_create_restaurant_profile_table::Migration),
            Box::new(m20260301_000004_create_driver_profile_table::Migration),
            Box::new(m20260301_000005_create_refresh_token_table::Migration),
            Box::new(m20260302_000001_create_restaurant_table::Migration),
            Box::new(m20260302_000002_create_menu_item_table::Migration),
        ]
    }
}
