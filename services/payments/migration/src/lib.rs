use sea_orm_migration::prelude::*;

mod m20260301_000001_create_recipient_accounts;
mod m20260301_000002_create_order_distributions;
mod m20260301_000003_create_payout_records;
mod m20260301_000004_create_distribution_retries;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260301_000001_create_recipient_accounts::Migration),
            Box::new(m20260301_000002_create_order_distributions::Migration),
            Box::new(m20260301_000003_create_payout_records::Migration),
            Box::new(m20260301_000004_create_distribution_retries::Migration),
        ]
    }
}
