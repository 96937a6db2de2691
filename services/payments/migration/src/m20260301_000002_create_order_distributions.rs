use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(OrderDistributions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(OrderDistributions::OrderId)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(OrderDistributions::RestaurantId)
                            .uuid()
                            .not_null(),
                    )
                    .col(ColumnDef::new(OrderDistributions::DeliveryRiderId).uuid())
                    .col(
                        ColumnDef::new(OrderDistributions::TotalAmount)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(OrderDistributions::RestaurantAmount)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(OrderDistributions::DeliveryAmount)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(OrderDistributions::PlatformAmount)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(OrderDistributions::PlatformCredited)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(OrderDistributions::Status)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(OrderDistributions::OrderData)
                            .json_binary()
                            .not_null(),
                    )
                    .col(ColumnDef::new(OrderDistributions::ClaimedUntil).timestamp_with_time_zone())
                    .col(ColumnDef::new(OrderDistributions::ClaimToken).uuid())
                    .col(
                        ColumnDef::new(OrderDistributions::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(OrderDistributions::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(OrderDistributions::Table)
                    .col(OrderDistributions::Status)
                    .name("idx_order_distributions_status")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(OrderDistributions::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum OrderDistributions {
    Table,
    OrderId,
    RestaurantId,
    DeliveryRiderId,
    TotalAmount,
    RestaurantAmount,
    DeliveryAmount,
    PlatformAmount,
    PlatformCredited,
    Status,
    OrderData,
    ClaimedUntil,
    ClaimToken,
    CreatedAt,
    UpdatedAt,
}
