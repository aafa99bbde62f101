use sea_orm_migration::prelude::*;

/// Creates the `driver_profile` table with a globally unique license number.
#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum DriverProfile {
    Table,
    Id,
    UserId,
    LicenseNumber,
    VehicleType,
    VehiclePlate,
    IsAvailable,
    Rating,
    TotalDeliveries,
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
                    .table(DriverProfile::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(DriverProfile::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(DriverProfile::UserId)
                            .uuid()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(DriverProfile::LicenseNumber)
                            .string_len(50)
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(DriverProfile::VehicleType)
                            .string_len(20)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DriverProfile::VehiclePlate)
                            .string_len(20)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DriverProfile::IsAvailable)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(DriverProfile::Rating)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(DriverProfile::TotalDeliveries)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(DriverProfile::Status)
                            .string_len(20)
                            .not_null()
                            .default("pending"),
                    )
                    .col(
                        ColumnDef::new(DriverProfile::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DriverProfile::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_driver_profile_user_id")
                            .from(DriverProfile::Table, DriverProfile::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(DriverProfile::Table).to_owned())
            .await
    }
}
