use sea_orm_migration::prelude::*;

/// Creates the `restaurant_profile` table with a globally unique business license.
#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum RestaurantProfile {
    Table,
    Id,
    UserId,
    BusinessName,
    BusinessLicense,
    BusinessAddress,
    BusinessPhone,
    BusinessEmail,
    Status,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum User {
    Table,
    Id,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(RestaurantProfile::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(RestaurantProfile::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(RestaurantProfile::UserId)
                            .uuid()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(RestaurantProfile::BusinessName)
                            .string_len(200)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RestaurantProfile::BusinessLicense)
                            .string_len(100)
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(RestaurantProfile::BusinessAddress)
                            .text()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RestaurantProfile::BusinessPhone)
                            .string_len(15)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RestaurantProfile::BusinessEmail)
                            .string_len(254)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RestaurantProfile::Status)
                            .string_len(20)
                            .not_null()
                            .default("pending"),
                    )
                    .col(
                        ColumnDef::new(RestaurantProfile::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RestaurantProfile::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_restaurant_profile_user_id")
                            .from(RestaurantProfile::Table, RestaurantProfile::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(RestaurantProfile::Table).to_owned())
            .await
    }
}
