use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(DistributionRetries::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(DistributionRetries::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(DistributionRetries::OrderId)
                            .uuid()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(DistributionRetries::Payload)
                            .json_binary()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DistributionRetries::Attempts)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(DistributionRetries::LastError).string())
                    .col(
                        ColumnDef::new(DistributionRetries::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DistributionRetries::NextAttemptAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(DistributionRetries::ProcessedAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(DistributionRetries::FailedAt).timestamp_with_time_zone())
                    .to_owned(),
            )
            .await?;

        // Worker poll: unprocessed, unfailed, by next_attempt_at.
        manager
            .create_index(
                Index::create()
                    .table(DistributionRetries::Table)
                    .col(DistributionRetries::NextAttemptAt)
                    .name("idx_distribution_retries_next_attempt_at")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(DistributionRetries::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum DistributionRetries {
    Table,
    Id,
    OrderId,
    Payload,
    Attempts,
    LastError,
    CreatedAt,
    NextAttemptAt,
    ProcessedAt,
    FailedAt,
}
