use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PayoutRecords::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PayoutRecords::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(PayoutRecords::ExternalPayoutId)
                            .string()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(PayoutRecords::ReferenceId)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(PayoutRecords::RecipientType)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(PayoutRecords::RecipientId).uuid().not_null())
                    .col(ColumnDef::new(PayoutRecords::OrderId).uuid().not_null())
                    .col(
                        ColumnDef::new(PayoutRecords::Amount)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(PayoutRecords::Status).string().not_null())
                    .col(ColumnDef::new(PayoutRecords::Method).string().not_null())
                    .col(
                        ColumnDef::new(PayoutRecords::OrderData)
                            .json_binary()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PayoutRecords::BankDetails)
                            .json_binary()
                            .not_null(),
                    )
                    .col(ColumnDef::new(PayoutRecords::GatewayResponse).json_binary())
                    .col(ColumnDef::new(PayoutRecords::FailureReason).string())
                    .col(ColumnDef::new(PayoutRecords::ProcessedAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(PayoutRecords::FailedAt).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(PayoutRecords::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(PayoutRecords::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(PayoutRecords::Table, PayoutRecords::OrderId)
                            .to(OrderDistributions::Table, OrderDistributions::OrderId),
                    )
                    .to_owned(),
            )
            .await?;

        // One credited payout per recipient per order.
        manager
            .create_index(
                Index::create()
                    .table(PayoutRecords::Table)
                    .col(PayoutRecords::RecipientType)
                    .col(PayoutRecords::RecipientId)
                    .col(PayoutRecords::OrderId)
                    .unique()
                    .name("idx_payout_records_recipient_order")
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .table(PayoutRecords::Table)
                    .col(PayoutRecords::Status)
                    .name("idx_payout_records_status")
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .table(PayoutRecords::Table)
                    .col(PayoutRecords::OrderId)
                    .name("idx_payout_records_order_id")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PayoutRecords::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum PayoutRecords {
    Table,
    Id,
    ExternalPayoutId,
    ReferenceId,
    RecipientType,
    RecipientId,
    OrderId,
    Amount,
    Status,
    Method,
    OrderData,
    BankDetails,
    GatewayResponse,
    FailureReason,
    ProcessedAt,
    FailedAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum OrderDistributions {
    Table,
    OrderId,
}
