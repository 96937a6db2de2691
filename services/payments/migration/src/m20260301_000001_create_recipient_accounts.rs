use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(RecipientAccounts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(RecipientAccounts::RecipientType)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RecipientAccounts::RecipientId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RecipientAccounts::Balance)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(RecipientAccounts::TotalEarnings)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(RecipientAccounts::PendingAmount)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(RecipientAccounts::BankAccountNumber).string())
                    .col(ColumnDef::new(RecipientAccounts::BankIfscCode).string())
                    .col(ColumnDef::new(RecipientAccounts::BankAccountHolderName).string())
                    .col(ColumnDef::new(RecipientAccounts::BankName).string())
                    .col(
                        ColumnDef::new(RecipientAccounts::BankIsVerified)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(RecipientAccounts::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(RecipientAccounts::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .primary_key(
                        Index::create()
                            .col(RecipientAccounts::RecipientType)
                            .col(RecipientAccounts::RecipientId),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(RecipientAccounts::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum RecipientAccounts {
    Table,
    RecipientType,
    RecipientId,
    Balance,
    TotalEarnings,
    PendingAmount,
    BankAccountNumber,
    BankIfscCode,
    BankAccountHolderName,
    BankName,
    BankIsVerified,
    CreatedAt,
    UpdatedAt,
}
