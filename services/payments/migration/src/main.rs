use sea_orm_migration::prelude::*;

#[tokio::main]
async fn main() {
    cli::run_cli(tiffin_payments_migration::Migrator).await;
}
