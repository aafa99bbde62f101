use sea_orm_migration::prelude::*;

/// Creates the `menu_item` table. Items are removed together with their restaurant.
#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum MenuItem {
    Table,
    Id,
    RestaurantId,
    Name,
    Description,
    PriceCents,
    Category,
    IsAvailable,
    IsVegetarian,
    IsVegan,
    PreparationTime,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Restaurant {
    Table,
    Id,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(MenuItem::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(MenuItem::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(MenuItem::RestaurantId).uuid().not_null())
                    .col(ColumnDef::new(MenuItem::Name).string_len(200).not_null())
                    .col(ColumnDef::new(MenuItem::Description).text().not_null())
                    .col(ColumnDef::new(MenuItem::PriceCents).big_integer().not_null())
                    .col(ColumnDef::new(MenuItem::Category).string_len(20).not_null())
                    .col(
                        ColumnDef::new(MenuItem::IsAvailable)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(MenuItem::IsVegetarian)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(MenuItem::IsVegan)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(MenuItem::PreparationTime)
                            .integer()
                            .not_null()
                            .default(15),
                    )
                    .col(
                        ColumnDef::new(MenuItem::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MenuItem::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_menu_item_restaurant_id")
                            .from(MenuItem::Table, MenuItem::RestaurantId)
                            .to(Restaurant::Table, Restaurant::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_menu_item_restaurant_category_name")
                    .table(MenuItem::Table)
                    .col(MenuItem::RestaurantId)
                    .col(MenuItem::Category)
                    .col(MenuItem::Name)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(MenuItem::Table).to_owned())
            .await
    }
}
