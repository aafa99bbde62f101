use sea_orm_migration::prelude::*;

/// Creates the `restaurant` table plus the indexes backing the public listing
/// (status filter, rating/recency ordering) and the per-owner lookup.
#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum Restaurant {
    Table,
    Id,
    OwnerId,
    Name,
    Description,
    Category,
    Address,
    Phone,
    Email,
    Website,
    Status,
    OpeningTime,
    ClosingTime,
    IsDeliveryAvailable,
    DeliveryFeeCents,
    MinimumOrderCents,
    Rating,
    TotalReviews,
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
                    .table(Restaurant::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Restaurant::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Restaurant::OwnerId).uuid().not_null())
                    .col(ColumnDef::new(Restaurant::Name).string_len(200).not_null())
                    .col(ColumnDef::new(Restaurant::Description).text().not_null())
                    .col(
                        ColumnDef::new(Restaurant::Category)
                            .string_len(20)
                            .not_null()
                            .default("other"),
                    )
                    .col(ColumnDef::new(Restaurant::Address).text().not_null())
                    .col(ColumnDef::new(Restaurant::Phone).string_len(20).not_null())
                    .col(ColumnDef::new(Restaurant::Email).string_len(254).not_null())
                    .col(ColumnDef::new(Restaurant::Website).string_len(200).null())
                    .col(
                        ColumnDef::new(Restaurant::Status)
                            .string_len(20)
                            .not_null()
                            .default("pending"),
                    )
                    .col(ColumnDef::new(Restaurant::OpeningTime).time().not_null())
                    .col(ColumnDef::new(Restaurant::ClosingTime).time().not_null())
                    .col(
                        ColumnDef::new(Restaurant::IsDeliveryAvailable)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Restaurant::DeliveryFeeCents)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Restaurant::MinimumOrderCents)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Restaurant::Rating)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(Restaurant::TotalReviews)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Restaurant::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Restaurant::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_restaurant_owner_id")
                            .from(Restaurant::Table, Restaurant::OwnerId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_restaurant_owner_id")
                    .table(Restaurant::Table)
                    .col(Restaurant::OwnerId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_restaurant_status_rating")
                    .table(Restaurant::Table)
                    .col(Restaurant::Status)
                    .col(Restaurant::Rating)
                    .col(Restaurant::CreatedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Restaurant::Table).to_owned())
            .await
    }
}
